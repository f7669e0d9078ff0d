//! Simulated peripherals for running protocols without a board.
//!
//! Both types implement the embedded-hal traits, so they slot into the
//! same [`hal`](super::hal) adapters the real pins do.  Every level
//! change is logged at debug level with its GPIO number.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType as DigitalErrorType, OutputPin};
use embedded_hal::pwm::{ErrorType as PwmErrorType, SetDutyCycle};
use log::debug;

/// Raw duty ceiling of the simulated PWM channel (10-bit).
pub const SIM_MAX_DUTY: u16 = 1023;

/// An output pin that only remembers its level.
#[derive(Debug)]
pub struct SimPin {
    gpio: i32,
    high: bool,
}

impl SimPin {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, high: false }
    }

    pub fn gpio(&self) -> i32 {
        self.gpio
    }

    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl DigitalErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        debug!("gpio {}: low", self.gpio);
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        debug!("gpio {}: high", self.gpio);
        self.high = true;
        Ok(())
    }
}

/// A PWM channel that only remembers its duty.
#[derive(Debug)]
pub struct SimPwm {
    gpio: i32,
    duty: u16,
}

impl SimPwm {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, duty: 0 }
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl PwmErrorType for SimPwm {
    type Error = Infallible;
}

impl SetDutyCycle for SimPwm {
    fn max_duty_cycle(&self) -> u16 {
        SIM_MAX_DUTY
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        debug!("pwm gpio {}: duty {}/{}", self.gpio, duty, SIM_MAX_DUTY);
        self.duty = duty.min(SIM_MAX_DUTY);
        Ok(())
    }
}
