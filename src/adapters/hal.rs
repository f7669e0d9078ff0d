//! embedded-hal adapters — bridge HAL pins and PWM channels to the engine's
//! port traits.
//!
//! | Adapter        | Wraps                     | Implements       |
//! |----------------|---------------------------|------------------|
//! | [`HBridge`]    | two `OutputPin`s          | `ActuatorDriver` |
//! | [`Switch`]     | one `OutputPin`           | `BinaryDriver`   |
//! | [`PwmElement`] | one `SetDutyCycle`        | `DutyDriver`     |

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::debug;

use crate::app::ports::{ActuatorDriver, BinaryDriver, DutyDriver, HwResult};
use crate::error::HardwareFault;

const PIN_WRITE_FAILED: HardwareFault = HardwareFault("GPIO write failed");
const PWM_WRITE_FAILED: HardwareFault = HardwareFault("PWM write failed");

// ───────────────────────────────────────────────────────────────
// H-bridge actuator
// ───────────────────────────────────────────────────────────────

/// Linear actuator behind a two-input H-bridge.
///
/// | IN1 | IN2 | effect   |
/// |-----|-----|----------|
/// | 1   | 0   | forward  |
/// | 0   | 1   | backward |
/// | 1   | 1   | brake    |
/// | 0   | 0   | coast    |
pub struct HBridge<IN1, IN2> {
    in1: IN1,
    in2: IN2,
}

impl<IN1: OutputPin, IN2: OutputPin> HBridge<IN1, IN2> {
    /// Wrap the pins, leaving the bridge coasting.
    pub fn new(mut in1: IN1, mut in2: IN2) -> Self {
        in1.set_low().ok();
        in2.set_low().ok();
        Self { in1, in2 }
    }

    fn drive(&mut self, in1: bool, in2: bool) -> HwResult {
        debug!("h-bridge: in1={} in2={}", u8::from(in1), u8::from(in2));
        let a = if in1 { self.in1.set_high() } else { self.in1.set_low() };
        let b = if in2 { self.in2.set_high() } else { self.in2.set_low() };
        match (a, b) {
            (Ok(()), Ok(())) => Ok(()),
            _ => Err(PIN_WRITE_FAILED),
        }
    }

    pub fn free(self) -> (IN1, IN2) {
        (self.in1, self.in2)
    }
}

impl<IN1: OutputPin, IN2: OutputPin> ActuatorDriver for HBridge<IN1, IN2> {
    fn set_forward(&mut self) -> HwResult {
        self.drive(true, false)
    }

    fn set_backward(&mut self) -> HwResult {
        self.drive(false, true)
    }

    fn brake(&mut self) -> HwResult {
        self.drive(true, true)
    }

    fn coast(&mut self) -> HwResult {
        self.drive(false, false)
    }
}

// ───────────────────────────────────────────────────────────────
// Switched output
// ───────────────────────────────────────────────────────────────

/// Whether an output is energised by driving its pin high or low.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

/// Pump or indicator on a single GPIO.
pub struct Switch<P> {
    pin: P,
    active: ActiveLevel,
    on: bool,
}

impl<P: OutputPin> Switch<P> {
    /// Wrap `pin`, initialising the output to off.
    pub fn new(mut pin: P, active: ActiveLevel) -> Self {
        match active {
            ActiveLevel::High => pin.set_low().ok(),
            ActiveLevel::Low => pin.set_high().ok(),
        };
        Self {
            pin,
            active,
            on: false,
        }
    }

    pub fn active_high(pin: P) -> Self {
        Self::new(pin, ActiveLevel::High)
    }

    pub fn active_low(pin: P) -> Self {
        Self::new(pin, ActiveLevel::Low)
    }

    fn set(&mut self, on: bool) -> HwResult {
        let written = match (self.active, on) {
            (ActiveLevel::High, true) | (ActiveLevel::Low, false) => self.pin.set_high(),
            (ActiveLevel::High, false) | (ActiveLevel::Low, true) => self.pin.set_low(),
        };
        written.map_err(|_| PIN_WRITE_FAILED)?;
        self.on = on;
        Ok(())
    }

    #[inline]
    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> BinaryDriver for Switch<P> {
    fn energize(&mut self) -> HwResult {
        self.set(true)
    }

    fn de_energize(&mut self) -> HwResult {
        self.set(false)
    }
}

// ───────────────────────────────────────────────────────────────
// PWM element
// ───────────────────────────────────────────────────────────────

/// Drying element on a PWM channel.
///
/// embedded-hal has no frequency control; the channel handed in must
/// already run at the frequency passed to [`DutyDriver::init`], which is
/// recorded for diagnostics only.
pub struct PwmElement<P> {
    pwm: P,
    frequency_hz: Option<u32>,
}

impl<P: SetDutyCycle> PwmElement<P> {
    pub fn new(pwm: P) -> Self {
        Self {
            pwm,
            frequency_hz: None,
        }
    }

    /// Frequency of the current claim, `None` while released.
    pub fn frequency_hz(&self) -> Option<u32> {
        self.frequency_hz
    }

    pub fn free(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> DutyDriver for PwmElement<P> {
    fn init(&mut self, frequency_hz: u32) -> HwResult {
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| PWM_WRITE_FAILED)?;
        self.frequency_hz = Some(frequency_hz);
        debug!("pwm: claimed at {} Hz", frequency_hz);
        Ok(())
    }

    fn set_duty(&mut self, percent: u8) -> HwResult {
        if self.frequency_hz.is_none() {
            return Err(HardwareFault("duty controller not available"));
        }
        self.pwm
            .set_duty_cycle_percent(percent.min(100))
            .map_err(|_| PWM_WRITE_FAILED)
    }

    fn release(&mut self) -> HwResult {
        self.frequency_hz = None;
        self.pwm
            .set_duty_cycle_fully_off()
            .map_err(|_| PWM_WRITE_FAILED)
    }
}
