//! Open-loop linear actuator control.
//!
//! The carriage has no position sensor.  Moves are timed: the actuator is
//! driven for `distance / linear_speed` seconds at an assumed constant
//! speed, then braked and released:
//!
//! ```text
//!   drive (forward | backward) ──▶ brake (both on) ──▶ settle 0.5 s ──▶ coast (both off)
//! ```
//!
//! Braking before release stops the carriage from coasting past the target.
//! [`ActuatorState`] is an estimate built from commanded distances, not a
//! measurement; anything that later adds feedback must reconcile it before
//! trusting [`ActuatorState::AtDistance`].

use core::time::Duration;

use log::{debug, info, warn};

use crate::app::ports::{ActuatorDriver, Delay};
use crate::config::{Config, HOME_TRAVEL_MM, SETTLE};
use crate::error::{Error, Result};
use crate::protocol::PumpId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Away from home, toward higher-numbered wells.
    Forward,
    /// Toward the home stop.
    Backward,
}

/// Estimated carriage position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorState {
    /// Position unknown: never homed, or a move failed part-way.
    Unhomed,
    /// Against the home stop (position 0).
    Homed,
    /// Commanded distance from home, in mm.
    AtDistance(f32),
}

/// Travel from home that puts `pump`'s tip over `well`.
///
/// `well >= 1` is a precondition.  Fails with
/// [`Error::DistanceOutOfRange`] past the robot's travel limit.
pub fn well_distance(config: &Config, well: u32, pump: PumpId) -> Result<f32> {
    let cal = &config.calibration;
    let robot = &config.constants;
    let distance = well.saturating_sub(1) as f32 * cal.well_pitch_mm
        + cal.edge_to_well_mm
        + robot.first_pump_to_edge_mm
        + f32::from(pump.number() - 1) * robot.pump_spacing_mm;
    if distance > robot.max_travel_mm {
        return Err(Error::DistanceOutOfRange {
            distance,
            limit: robot.max_travel_mm,
        });
    }
    Ok(distance)
}

pub struct MotionController<A> {
    actuator: A,
    state: ActuatorState,
}

impl<A: ActuatorDriver> MotionController<A> {
    pub fn new(actuator: A) -> Self {
        Self {
            actuator,
            state: ActuatorState::Unhomed,
        }
    }

    /// See [`well_distance`].
    pub fn well_distance(&self, config: &Config, well: u32, pump: PumpId) -> Result<f32> {
        well_distance(config, well, pump)
    }

    /// Timed move of `distance_mm` in `direction`.
    ///
    /// The brake/settle/coast phases always run, even when the drive phase
    /// fails, so the actuator is never left energised.
    pub fn travel(
        &mut self,
        config: &Config,
        direction: Direction,
        distance_mm: f32,
        delay: &mut impl Delay,
    ) -> Result<()> {
        let limit = config.constants.max_travel_mm;
        let run = Duration::try_from_secs_f32(distance_mm / config.constants.linear_speed_mm_per_s)
            .map_err(|_| Error::DistanceOutOfRange {
                distance: distance_mm,
                limit,
            })?;
        info!(
            "motion: {:?} {:.1} mm ({:.2} s)",
            direction,
            distance_mm,
            run.as_secs_f32()
        );

        let driven = match direction {
            Direction::Forward => self.actuator.set_forward(),
            Direction::Backward => self.actuator.set_backward(),
        };
        if driven.is_ok() {
            delay.hold(run);
        }
        let braked = self.actuator.brake();
        delay.hold(SETTLE);
        let coasted = self.actuator.coast();
        debug!("motion: braked and released");

        if let Err(fault) = driven.and(braked).and(coasted) {
            warn!("motion: {:?} move failed: {}", direction, fault);
            self.state = ActuatorState::Unhomed;
            return Err(fault.into());
        }
        self.state = next_state(self.state, direction, distance_mm);
        Ok(())
    }

    /// Drive backward far enough to reach the physical home stop.
    pub fn home(&mut self, config: &Config, delay: &mut impl Delay) -> Result<()> {
        info!("motion: homing");
        self.travel(config, Direction::Backward, HOME_TRAVEL_MM, delay)
    }

    pub fn state(&self) -> ActuatorState {
        self.state
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }
}

fn next_state(state: ActuatorState, direction: Direction, distance: f32) -> ActuatorState {
    match (state, direction) {
        (ActuatorState::Unhomed, Direction::Backward) if distance >= HOME_TRAVEL_MM => {
            ActuatorState::Homed
        }
        (ActuatorState::Unhomed, _) => ActuatorState::Unhomed,
        (ActuatorState::Homed, Direction::Forward) => ActuatorState::AtDistance(distance),
        (ActuatorState::Homed, Direction::Backward) => ActuatorState::Homed,
        (ActuatorState::AtDistance(at), Direction::Forward) => {
            ActuatorState::AtDistance(at + distance)
        }
        (ActuatorState::AtDistance(at), Direction::Backward) => {
            if at - distance <= 0.0 {
                ActuatorState::Homed
            } else {
                ActuatorState::AtDistance(at - distance)
            }
        }
    }
}
