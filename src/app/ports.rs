//! Port traits — the boundary between the engine and the hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ProtocolInterpreter (domain)
//! ```
//!
//! Driven adapters (H-bridge, pump switches, PWM element, delay, event
//! sinks) implement these traits.  The engine consumes them via generics
//! and never touches a pin directly, so every component runs against
//! fakes in tests.

use core::time::Duration;

use crate::error::HardwareFault;

/// Result of a single capability call.
pub type HwResult = Result<(), HardwareFault>;

// ───────────────────────────────────────────────────────────────
// Actuator port
// ───────────────────────────────────────────────────────────────

/// Two-signal linear actuator driver.
pub trait ActuatorDriver {
    /// Drive the carriage away from home.
    fn set_forward(&mut self) -> HwResult;

    /// Drive the carriage toward home.
    fn set_backward(&mut self) -> HwResult;

    /// Assert both control signals.
    fn brake(&mut self) -> HwResult;

    /// De-energise both control signals.
    fn coast(&mut self) -> HwResult;
}

// ───────────────────────────────────────────────────────────────
// Binary output port (pumps, indicator)
// ───────────────────────────────────────────────────────────────

pub trait BinaryDriver {
    fn energize(&mut self) -> HwResult;

    fn de_energize(&mut self) -> HwResult;
}

// ───────────────────────────────────────────────────────────────
// Duty-cycle port (drying element)
// ───────────────────────────────────────────────────────────────

pub trait DutyDriver {
    /// Claim the duty controller at `frequency_hz` with zero duty.
    fn init(&mut self, frequency_hz: u32) -> HwResult;

    /// Set duty in percent (0–100).
    fn set_duty(&mut self, percent: u8) -> HwResult;

    /// Release the duty controller.
    fn release(&mut self) -> HwResult;
}

// ───────────────────────────────────────────────────────────────
// Delay port
// ───────────────────────────────────────────────────────────────

/// Blocking hold used for every timed phase.
///
/// Holds represent physical process time and must elapse in full.
pub trait Delay {
    fn hold(&mut self, duration: Duration);
}

// ───────────────────────────────────────────────────────────────
// Event sink port
// ───────────────────────────────────────────────────────────────

/// The interpreter emits structured [`RunEvent`](super::events::RunEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::RunEvent);
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: &super::events::RunEvent) {
        (**self).emit(event);
    }
}
