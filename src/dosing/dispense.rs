//! LSP pulse dispensing.
//!
//! Each LSP pump delivers a calibrated volume per on/off cycle.  A dose is
//! `ceil(volume / calibration)` strictly sequential cycles of
//! [`PULSE_ON`] energised followed by [`PULSE_OFF`] idle.

use log::info;

use super::whole_units;
use crate::app::ports::{ActuatorDriver, BinaryDriver, Delay};
use crate::config::{Config, HOMING_MARGIN_MM, PULSE_OFF, PULSE_ON};
use crate::error::Result;
use crate::motion::{Direction, MotionController};
use crate::protocol::PumpId;

/// The three LSP pumps.
pub struct DispenseEngine<P> {
    pumps: [P; 3],
}

impl<P: BinaryDriver> DispenseEngine<P> {
    pub fn new(pumps: [P; 3]) -> Self {
        Self { pumps }
    }

    /// Dose `volume_ul` into `well` from LSP pump `pump_id`.
    ///
    /// Fails with [`InvalidPumpId`](crate::error::Error::InvalidPumpId) for
    /// ids outside {1, 2, 3} and with
    /// [`DistanceOutOfRange`](crate::error::Error::DistanceOutOfRange) when
    /// the well is out of reach; both before any hardware call.
    pub fn dispense<A: ActuatorDriver>(
        &mut self,
        config: &Config,
        motion: &mut MotionController<A>,
        delay: &mut impl Delay,
        pump_id: u8,
        well: u32,
        volume_ul: f32,
    ) -> Result<()> {
        let pump = PumpId::try_from(pump_id)?;
        let cycles = whole_units(volume_ul, config.lsp_volume_ul(pump));
        let distance = motion.well_distance(config, well, pump)?;
        info!(
            "dispense: {} uL from LSP {} to well {} ({} cycles, {:.1} mm)",
            volume_ul, pump, well, cycles, distance
        );

        motion.travel(config, Direction::Forward, distance, delay)?;
        let driver = &mut self.pumps[pump.index()];
        for _ in 0..cycles {
            pulse(driver, delay)?;
        }
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

/// One on/off cycle.
fn pulse<P: BinaryDriver>(pump: &mut P, delay: &mut impl Delay) -> Result<()> {
    if let Err(fault) = pump.energize() {
        let _ = pump.de_energize();
        return Err(fault.into());
    }
    delay.hold(PULSE_ON);
    pump.de_energize()?;
    delay.hold(PULSE_OFF);
    Ok(())
}
