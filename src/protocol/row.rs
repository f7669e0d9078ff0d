//! Protocol rows.
//!
//! Every row is normalised to exactly [`ROW_WIDTH`] fields.  Missing
//! trailing fields and empty cells are absent (`None`); anything past the
//! sixth field is dropped.  Cells are fixed-capacity strings: a cell longer
//! than [`CELL_CAPACITY`] bytes is a format error, not a truncation.

use heapless::{String, Vec};

use crate::error::{Error, Result};

/// Fields per row: the tag plus up to five parameters.
pub const ROW_WIDTH: usize = 6;
/// Longest cell accepted, in bytes after trimming.
pub const CELL_CAPACITY: usize = 32;

type Cell = String<CELL_CAPACITY>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    fields: Vec<Option<Cell>, ROW_WIDTH>,
}

impl Row {
    /// Build row `index` from raw cells, trimming each and padding to six
    /// fields.
    pub fn new<I, S>(index: usize, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fields: Vec<Option<Cell>, ROW_WIDTH> = Vec::new();
        for (field, cell) in cells.into_iter().take(ROW_WIDTH).enumerate() {
            let cell = cell.as_ref().trim();
            let value = if cell.is_empty() {
                None
            } else {
                let mut buf = Cell::new();
                buf.push_str(cell)
                    .map_err(|()| Error::format(index, field, "field longer than 32 characters"))?;
                Some(buf)
            };
            // take(ROW_WIDTH) keeps this within capacity
            let _ = fields.push(value);
        }
        while !fields.is_full() {
            let _ = fields.push(None);
        }
        Ok(Self { fields })
    }

    /// Field 0: the command tag.
    pub fn tag(&self) -> Option<&str> {
        self.field(0)
    }

    /// Field `index`, or `None` when absent or out of range.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).and_then(|f| f.as_deref())
    }
}
