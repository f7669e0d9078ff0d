//! Drying element control.
//!
//! The element sits on a PWM output.  A dry cycle claims the duty
//! controller at zero duty, runs it at full duty for the requested time,
//! drops back to zero and releases it.  A zero-length dry is valid: the
//! hold is simply empty.

use core::time::Duration;

use log::info;

use crate::app::ports::{Delay, DutyDriver};
use crate::config::{DRY_PWM_FREQUENCY_HZ, FULL_DUTY};
use crate::error::Result;

pub struct DryController<D> {
    element: D,
}

impl<D: DutyDriver> DryController<D> {
    pub fn new(element: D) -> Self {
        Self { element }
    }

    /// Full-power hold for `duration`.
    ///
    /// Once the controller is claimed, duty always returns to zero and the
    /// controller is always released, even when the full-duty call fails.
    pub fn dry(&mut self, duration: Duration, delay: &mut impl Delay) -> Result<()> {
        self.element.init(DRY_PWM_FREQUENCY_HZ)?;
        info!("dry: start ({:?})", duration);

        let heated = self.element.set_duty(FULL_DUTY);
        if heated.is_ok() {
            delay.hold(duration);
        }
        let cooled = self.element.set_duty(0);
        let released = self.element.release();
        heated.and(cooled).and(released)?;

        info!("dry: end");
        Ok(())
    }

    pub fn element(&self) -> &D {
        &self.element
    }
}
