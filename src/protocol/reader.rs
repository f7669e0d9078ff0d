//! CSV protocol reader.
//!
//! The first line is a column header and is discarded.  Blank lines are
//! skipped; every other line becomes one [`Row`].  Structural checks
//! (setup first, end last) belong to the interpreter, not here.

use log::debug;

use super::row::Row;
use crate::error::Result;

/// Split protocol text into normalised rows.
///
/// Row indices count data rows only (header and blank lines excluded), so
/// they match the indices the interpreter reports.
pub fn read_rows(text: &str) -> Result<Vec<Row>> {
    let rows = text
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| Row::new(index, line.split(',')))
        .collect::<Result<Vec<Row>>>()?;
    debug!("protocol reader: {} rows", rows.len());
    Ok(rows)
}
