//! Peristaltic washing.
//!
//! The wash pumps have no per-cycle calibration; they run continuously at
//! the robot's rated flow for `ceil(volume / flow)` whole seconds.

use core::time::Duration;

use log::info;

use super::whole_units;
use crate::app::ports::{ActuatorDriver, BinaryDriver, Delay};
use crate::config::{Config, HOMING_MARGIN_MM, SETTLE};
use crate::error::Result;
use crate::motion::{Direction, MotionController};
use crate::protocol::PumpId;

/// Whole seconds a peristaltic pump runs to deliver `volume_ml`.
pub fn run_seconds(config: &Config, volume_ml: f32) -> u32 {
    whole_units(
        volume_ml * 60.0,
        config.constants.peristaltic_flow_ml_per_min,
    )
}

/// The three peristaltic pumps.
pub struct WashEngine<P> {
    pumps: [P; 3],
}

impl<P: BinaryDriver> WashEngine<P> {
    pub fn new(pumps: [P; 3]) -> Self {
        Self { pumps }
    }

    /// Run peristaltic pump `pump_id` over `well` until `volume_ml` is
    /// delivered, then return home.
    pub fn wash<A: ActuatorDriver>(
        &mut self,
        config: &Config,
        motion: &mut MotionController<A>,
        delay: &mut impl Delay,
        pump_id: u8,
        well: u32,
        volume_ml: f32,
    ) -> Result<()> {
        let pump = PumpId::try_from(pump_id)?;
        let seconds = run_seconds(config, volume_ml);
        let distance = motion.well_distance(config, well, pump)?;
        info!(
            "wash: {} mL from peristaltic {} to well {} over {} s",
            volume_ml, pump, well, seconds
        );

        motion.travel(config, Direction::Forward, distance, delay)?;
        let driver = &mut self.pumps[pump.index()];
        if let Err(fault) = driver.energize() {
            let _ = driver.de_energize();
            return Err(fault.into());
        }
        delay.hold(Duration::from_secs(u64::from(seconds)));
        driver.de_energize()?;
        // let the line stop dripping before moving
        delay.hold(SETTLE);
        motion.travel(
            config,
            Direction::Backward,
            distance + HOMING_MARGIN_MM,
            delay,
        )
    }

    pub fn pumps(&self) -> &[P; 3] {
        &self.pumps
    }

    pub(crate) fn pumps_mut(&mut self) -> &mut [P; 3] {
        &mut self.pumps
    }
}
