//! Unified error types for the AutoENZ robot.
//!
//! A single `Error` enum that every component converts into, so the
//! interpreter's failure handling stays uniform.  Every error is terminal
//! for the run: nothing in the crate retries.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A protocol row is missing, misplaced, or carries a malformed field.
    ProtocolFormat {
        /// Row index as handed over by the ingestion layer (0 = setup row).
        row: usize,
        /// Field index within the row, when a single field is at fault.
        field: Option<usize>,
        reason: &'static str,
    },
    /// A row tag the interpreter does not know how to execute.
    UnknownCommand { row: usize, tag: String },
    /// The computed travel exceeds the actuator's physical limit.
    DistanceOutOfRange { distance: f32, limit: f32 },
    /// Pump id outside {1, 2, 3} reached a dosing engine.
    InvalidPumpId(u8),
    /// A hardware capability reported a failure.
    Hardware(HardwareFault),
    /// Robot constants failed validation.
    Config(&'static str),
}

impl Error {
    pub(crate) fn format(row: usize, field: usize, reason: &'static str) -> Self {
        Self::ProtocolFormat {
            row,
            field: Some(field),
            reason,
        }
    }

    pub(crate) fn structure(row: usize, reason: &'static str) -> Self {
        Self::ProtocolFormat {
            row,
            field: None,
            reason,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProtocolFormat {
                row,
                field: Some(field),
                reason,
            } => write!(f, "protocol format: row {row}, field {field}: {reason}"),
            Self::ProtocolFormat {
                row,
                field: None,
                reason,
            } => write!(f, "protocol format: row {row}: {reason}"),
            Self::UnknownCommand { row, tag } => {
                write!(f, "unknown command '{tag}' at row {row}")
            }
            Self::DistanceOutOfRange { distance, limit } => write!(
                f,
                "attempted travel of {distance} mm exceeds limit of {limit} mm"
            ),
            Self::InvalidPumpId(id) => write!(f, "invalid pump id {id} (expected 1, 2 or 3)"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Hardware faults
// ---------------------------------------------------------------------------

/// Failure reported by an actuator, pump, or duty-controller capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardwareFault(pub &'static str);

impl fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl From<HardwareFault> for Error {
    fn from(e: HardwareFault) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
