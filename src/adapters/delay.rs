//! Delay adapters.
//!
//! - [`StdDelay`] sleeps the calling thread (host runner, real time).
//! - [`HalDelay`] wraps any embedded-hal `DelayNs` provider.
//! - [`VirtualClock`] never sleeps; it records each hold and the total
//!   elapsed virtual time, so dry runs and tests finish instantly.

use core::time::Duration;

use embedded_hal::delay::DelayNs;

use crate::app::ports::Delay;

/// Wall-clock delay backed by `std::thread::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn hold(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Delay backed by an embedded-hal timer.
pub struct HalDelay<D>(pub D);

impl<D: DelayNs> Delay for HalDelay<D> {
    fn hold(&mut self, duration: Duration) {
        // DelayNs takes u32 milliseconds; split long holds into chunks.
        let mut ms = duration.as_millis();
        while ms > 0 {
            let chunk = u32::try_from(ms).unwrap_or(u32::MAX);
            self.0.delay_ms(chunk);
            ms -= u128::from(chunk);
        }
        let sub_ms_us = duration.subsec_micros() % 1_000;
        if sub_ms_us > 0 {
            self.0.delay_us(sub_ms_us);
        }
    }
}

/// Simulated clock that advances instantly.
#[derive(Debug, Default, Clone)]
pub struct VirtualClock {
    elapsed: Duration,
    holds: Vec<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of every hold so far.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Each hold in the order it was requested.
    pub fn holds(&self) -> &[Duration] {
        &self.holds
    }
}

impl Delay for VirtualClock {
    fn hold(&mut self, duration: Duration) {
        self.elapsed = self.elapsed.saturating_add(duration);
        self.holds.push(duration);
    }
}
