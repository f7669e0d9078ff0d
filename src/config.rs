//! Robot configuration.
//!
//! Two layers:
//! - [`RobotConstants`]: intrinsic geometry and speeds of the robot itself.
//!   Defaults describe the reference build; the host runner can override
//!   them from a JSON file.
//! - [`SlideCalibration`]: the per-run values carried by the protocol's
//!   setup row.
//!
//! Both are folded into one immutable [`Config`] once per run and passed by
//! reference to every component.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::PumpId;

// ---------------------------------------------------------------------------
// Fixed timing and geometry
// ---------------------------------------------------------------------------

/// LSP pump "on" half of one dispense cycle.
pub const PULSE_ON: Duration = Duration::from_millis(250);
/// LSP pump "off" half of one dispense cycle.
pub const PULSE_OFF: Duration = Duration::from_millis(250);
/// Hold after braking the actuator or stopping a wash pump.
pub const SETTLE: Duration = Duration::from_millis(500);
/// Backward travel used for homing; longer than any forward move.
pub const HOME_TRAVEL_MM: f32 = 110.0;
/// Extra backward travel on every return leg to absorb actuator slack.
pub const HOMING_MARGIN_MM: f32 = 10.0;
/// Volume pushed through each LSP line when priming (80 cycles of 11.5 uL).
pub const PRIME_TARGET_UL: f32 = 920.0;
/// How long the peristaltic lines run when priming.
pub const PRIME_WASH: Duration = Duration::from_secs(8);
/// PWM frequency for the drying element.
pub const DRY_PWM_FREQUENCY_HZ: u32 = 50;
/// Full duty, in percent.
pub const FULL_DUTY: u8 = 100;

// ---------------------------------------------------------------------------
// Robot constants
// ---------------------------------------------------------------------------

/// Intrinsic properties of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConstants {
    /// Distance between adjacent LSP pump tips (mm).
    pub pump_spacing_mm: f32,
    /// Distance from LSP pump 1 to the slide edge at home (mm).
    pub first_pump_to_edge_mm: f32,
    /// No-load actuator speed (mm/s).
    pub linear_speed_mm_per_s: f32,
    /// Travel before the carriage hits the far wall (mm).
    pub max_travel_mm: f32,
    /// Peristaltic pump flow (mL/min).
    pub peristaltic_flow_ml_per_min: f32,
}

impl Default for RobotConstants {
    fn default() -> Self {
        Self {
            pump_spacing_mm: 8.5,
            first_pump_to_edge_mm: 8.5,
            // 0.59 in/s datasheet figure, tuned on the bench
            linear_speed_mm_per_s: 14.01,
            max_travel_mm: 94.0,
            // 50 mL/min manufacturer figure
            peristaltic_flow_ml_per_min: 50.0,
        }
    }
}

impl RobotConstants {
    /// Reject non-positive or non-finite values.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.pump_spacing_mm, "pump_spacing_mm must be positive"),
            (self.first_pump_to_edge_mm, "first_pump_to_edge_mm must be positive"),
            (self.linear_speed_mm_per_s, "linear_speed_mm_per_s must be positive"),
            (self.max_travel_mm, "max_travel_mm must be positive"),
            (
                self.peristaltic_flow_ml_per_min,
                "peristaltic_flow_ml_per_min must be positive",
            ),
        ];
        for (value, reason) in checks {
            if !is_positive(value) {
                return Err(Error::Config(reason));
            }
        }
        Ok(())
    }

    /// Peristaltic flow in mL/s.
    pub fn flow_ml_per_s(&self) -> f32 {
        self.peristaltic_flow_ml_per_min / 60.0
    }
}

// ---------------------------------------------------------------------------
// Slide calibration (setup row)
// ---------------------------------------------------------------------------

/// Values supplied by the protocol's setup row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideCalibration {
    /// Close edge of the slide to the edge of well 1 (mm).
    pub edge_to_well_mm: f32,
    /// Well pitch (mm).
    pub well_pitch_mm: f32,
    /// Volume per pulse cycle for LSP pumps 1..=3 (uL).
    pub lsp_volume_ul: [f32; 3],
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Immutable per-run configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub calibration: SlideCalibration,
    pub constants: RobotConstants,
}

impl Config {
    pub fn new(calibration: SlideCalibration, constants: RobotConstants) -> Result<Self> {
        constants.validate()?;
        let c = &calibration;
        if !is_positive(c.edge_to_well_mm) {
            return Err(Error::format(0, 1, "edge_to_well must be positive"));
        }
        if !is_positive(c.well_pitch_mm) {
            return Err(Error::format(0, 2, "well_pitch must be positive"));
        }
        for (i, volume) in c.lsp_volume_ul.iter().enumerate() {
            if !is_positive(*volume) {
                return Err(Error::format(0, 3 + i, "LSP calibration volume must be positive"));
            }
        }
        Ok(Self {
            calibration,
            constants,
        })
    }

    /// Volume dispensed per pulse cycle by `pump` (uL).
    pub fn lsp_volume_ul(&self, pump: PumpId) -> f32 {
        self.calibration.lsp_volume_ul[pump.index()]
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
