//! Protocol model: rows handed over by the ingestion layer and the typed
//! commands they describe.
//!
//! ```text
//!   CSV text ──▶ reader::read_rows ──▶ [Row] ──▶ Command::from_row ──▶ Command
//! ```

pub mod command;
pub mod reader;
pub mod row;

pub use command::{Command, CommandKind};
pub use row::{ROW_WIDTH, Row};

use core::fmt;

use crate::error::Error;

/// One of the three pumps in a bank (LSP or peristaltic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PumpId(u8);

impl PumpId {
    pub const ALL: [PumpId; 3] = [PumpId(1), PumpId(2), PumpId(3)];

    /// The 1-based pump number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Zero-based index into a three-pump bank.
    pub fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl TryFrom<u8> for PumpId {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=3 => Ok(Self(value)),
            other => Err(Error::InvalidPumpId(other)),
        }
    }
}

impl fmt::Display for PumpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
