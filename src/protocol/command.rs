//! Typed protocol commands.
//!
//! | tag      | fields (1..5)                                  |
//! |----------|------------------------------------------------|
//! | setup    | edge_to_well, well_pitch, lsp1, lsp2, lsp3     |
//! | dispense | pump_id, well, volume (uL)                     |
//! | wash     | pump_id, well, volume (mL)                     |
//! | dry      | duration (s)                                   |
//! | wait     | duration (s)                                   |
//! | prime    | -                                              |
//! | end      | -                                              |

use core::fmt;
use core::time::Duration;

use super::PumpId;
use super::row::Row;
use crate::config::SlideCalibration;
use crate::error::{Error, Result};

/// Command discriminant, used for logging and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Setup,
    Dispense,
    Wash,
    Dry,
    Wait,
    Prime,
    End,
}

impl CommandKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "setup" => Some(Self::Setup),
            "dispense" => Some(Self::Dispense),
            "wash" => Some(Self::Wash),
            "dry" => Some(Self::Dry),
            "wait" => Some(Self::Wait),
            "prime" => Some(Self::Prime),
            "end" => Some(Self::End),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Dispense => "dispense",
            Self::Wash => "wash",
            Self::Dry => "dry",
            Self::Wait => "wait",
            Self::Prime => "prime",
            Self::End => "end",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One protocol step.  Each variant carries only its own parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Setup(SlideCalibration),
    /// LSP pulse dosing.
    Dispense {
        pump: PumpId,
        well: u32,
        volume_ul: f32,
    },
    /// Peristaltic continuous dosing.
    Wash {
        pump: PumpId,
        well: u32,
        volume_ml: f32,
    },
    Dry {
        duration: Duration,
    },
    Wait {
        duration: Duration,
    },
    Prime,
    End,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Setup(_) => CommandKind::Setup,
            Self::Dispense { .. } => CommandKind::Dispense,
            Self::Wash { .. } => CommandKind::Wash,
            Self::Dry { .. } => CommandKind::Dry,
            Self::Wait { .. } => CommandKind::Wait,
            Self::Prime => CommandKind::Prime,
            Self::End => CommandKind::End,
        }
    }

    /// Parse row `index`.
    ///
    /// An unrecognised tag yields [`Error::UnknownCommand`]; a recognised tag
    /// with a missing or malformed field yields [`Error::ProtocolFormat`]
    /// naming the field.
    pub fn from_row(index: usize, row: &Row) -> Result<Self> {
        let tag = row
            .tag()
            .ok_or_else(|| Error::format(index, 0, "missing command tag"))?;
        let kind = CommandKind::from_tag(tag).ok_or_else(|| Error::UnknownCommand {
            row: index,
            tag: tag.to_owned(),
        })?;

        let fields = Fields { row, index };
        let command = match kind {
            CommandKind::Setup => Self::Setup(SlideCalibration {
                edge_to_well_mm: fields.number(1)?,
                well_pitch_mm: fields.number(2)?,
                lsp_volume_ul: [fields.number(3)?, fields.number(4)?, fields.number(5)?],
            }),
            CommandKind::Dispense => Self::Dispense {
                pump: fields.pump(1)?,
                well: fields.well(2)?,
                volume_ul: fields.volume(3)?,
            },
            CommandKind::Wash => Self::Wash {
                pump: fields.pump(1)?,
                well: fields.well(2)?,
                volume_ml: fields.volume(3)?,
            },
            CommandKind::Dry => Self::Dry {
                duration: fields.duration(1)?,
            },
            CommandKind::Wait => Self::Wait {
                duration: fields.duration(1)?,
            },
            CommandKind::Prime => Self::Prime,
            CommandKind::End => Self::End,
        };
        Ok(command)
    }
}

// ---------------------------------------------------------------------------
// Field parsing
// ---------------------------------------------------------------------------

struct Fields<'a> {
    row: &'a Row,
    index: usize,
}

impl Fields<'_> {
    fn raw(&self, field: usize) -> Result<&str> {
        self.row
            .field(field)
            .ok_or_else(|| Error::format(self.index, field, "missing value"))
    }

    fn number(&self, field: usize) -> Result<f32> {
        match self.raw(field)?.parse::<f32>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(Error::format(self.index, field, "not a number")),
        }
    }

    fn pump(&self, field: usize) -> Result<PumpId> {
        self.raw(field)?
            .parse::<u8>()
            .ok()
            .and_then(|n| PumpId::try_from(n).ok())
            .ok_or_else(|| Error::format(self.index, field, "pump id must be 1, 2 or 3"))
    }

    fn well(&self, field: usize) -> Result<u32> {
        match self.raw(field)?.parse::<u32>() {
            Ok(w) if w >= 1 => Ok(w),
            _ => Err(Error::format(
                self.index,
                field,
                "well must be a whole number >= 1",
            )),
        }
    }

    fn volume(&self, field: usize) -> Result<f32> {
        let v = self.number(field)?;
        if v > 0.0 {
            Ok(v)
        } else {
            Err(Error::format(self.index, field, "volume must be positive"))
        }
    }

    fn duration(&self, field: usize) -> Result<Duration> {
        let secs = self.number(field)?;
        if secs < 0.0 {
            return Err(Error::format(self.index, field, "duration must not be negative"));
        }
        Duration::try_from_secs_f32(secs)
            .map_err(|_| Error::format(self.index, field, "duration out of range"))
    }
}
