//! Line priming.
//!
//! Fills all three LSP lines with [`PRIME_TARGET_UL`] each, then flushes the
//! peristaltic lines for [`PRIME_WASH`].
//!
//! The LSP pumps pulse together in rounds.  Each pump needs its own cycle
//! count (calibrations differ), so a pump that reaches its count simply
//! sits out the remaining rounds:
//!
//! ```text
//!   round:  energise pumps with cycles left ─▶ hold 0.25 s ─▶ all off ─▶ hold 0.25 s
//! ```

use log::info;

use super::{all_off, whole_units};
use crate::app::ports::{BinaryDriver, Delay};
use crate::config::{Config, PRIME_TARGET_UL, PRIME_WASH, PULSE_OFF, PULSE_ON};
use crate::error::Result;
use crate::protocol::PumpId;

pub struct PrimeRoutine;

impl PrimeRoutine {
    /// Pulse cycles each LSP pump needs to move [`PRIME_TARGET_UL`].
    pub fn cycles(config: &Config) -> [u32; 3] {
        PumpId::ALL.map(|pump| whole_units(PRIME_TARGET_UL, config.lsp_volume_ul(pump)))
    }

    pub fn run<P: BinaryDriver>(
        &self,
        config: &Config,
        lsp: &mut [P; 3],
        peristaltic: &mut [P; 3],
        delay: &mut impl Delay,
    ) -> Result<()> {
        let targets = Self::cycles(config);
        info!("prime: LSP cycles {:?}", targets);

        let mut done = [0u32; 3];
        while done.iter().zip(&targets).any(|(d, t)| d < t) {
            let mut energized = Ok(());
            for (i, pump) in lsp.iter_mut().enumerate() {
                if done[i] < targets[i] {
                    energized = energized.and(pump.energize());
                    done[i] += 1;
                }
            }
            if energized.is_ok() {
                delay.hold(PULSE_ON);
            }
            let released = all_off(lsp);
            energized.and(released)?;
            delay.hold(PULSE_OFF);
        }

        info!("prime: flushing peristaltic lines for {:?}", PRIME_WASH);
        let started = peristaltic
            .iter_mut()
            .map(|pump| pump.energize())
            .fold(Ok(()), |acc, r| acc.and(r));
        if started.is_ok() {
            delay.hold(PRIME_WASH);
        }
        let stopped = all_off(peristaltic);
        started.and(stopped)?;
        Ok(())
    }
}
