//! Liquid dosing: LSP pulse dispensing, peristaltic washing, and line
//! priming.
//!
//! Both engines position the head with the
//! [`MotionController`](crate::motion::MotionController) first, dose, then
//! return home with an extra [`HOMING_MARGIN_MM`](crate::config::HOMING_MARGIN_MM)
//! of backward travel.

pub mod dispense;
pub mod prime;
pub mod wash;

pub use dispense::DispenseEngine;
pub use prime::PrimeRoutine;
pub use wash::WashEngine;

use crate::app::ports::{BinaryDriver, HwResult};

/// Quotients within this many ulps of an integer are taken as that integer.
const ROUNDING_ULPS: f32 = 4.0;

/// `ceil(amount / per_unit)`, tolerant of floating-point noise only.
///
/// `5 mL at 50/60 mL/s` divides to a hair above 6; a plain `ceil` would
/// turn that one-ulp overshoot into an extra unit.  Anything further from
/// an integer than a few ulps rounds up.
pub fn whole_units(amount: f32, per_unit: f32) -> u32 {
    let quotient = amount / per_unit;
    let nearest = quotient.round();
    let slack = ROUNDING_ULPS * f32::EPSILON * quotient.abs().max(1.0);
    if (quotient - nearest).abs() <= slack {
        nearest as u32
    } else {
        quotient.ceil() as u32
    }
}

/// De-energise every pump in `pumps`, reporting the first failure only
/// after all of them have been attempted.
pub(crate) fn all_off<P: BinaryDriver>(pumps: &mut [P]) -> HwResult {
    pumps
        .iter_mut()
        .map(|pump| pump.de_energize())
        .fold(Ok(()), |acc, r| acc.and(r))
}
