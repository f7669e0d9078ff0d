//! Protocol interpreter — the run state machine.
//!
//! ```text
//!   Idle ──▶ Validating ──▶ Homing ──▶ Executing(row) ──▶ … ──▶ Ended
//!                │             │             │
//!                └─────────────┴─────────────┴──▶ Failed(error)
//! ```
//!
//! - `Validating` checks the row structure (setup first, end last, every
//!   recognised row well-formed) and builds the [`Config`].  Nothing
//!   touches hardware until it passes.
//! - `Homing` drives the carriage to the home stop once.
//! - `Executing(row)` dispatches rows strictly in order; each command runs
//!   to completion, holds included, before the next starts.
//! - The first error of any kind is terminal: no retries, no resumption.

use core::mem;
use core::time::Duration;

use log::{error, info};

use crate::app::events::RunEvent;
use crate::app::ports::{ActuatorDriver, BinaryDriver, Delay, DutyDriver, EventSink};
use crate::config::{Config, RobotConstants};
use crate::dosing::{DispenseEngine, PrimeRoutine, WashEngine};
use crate::dry::DryController;
use crate::error::{Error, Result};
use crate::motion::MotionController;
use crate::protocol::{Command, CommandKind, Row};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Idle,
    Validating,
    Homing,
    /// Dispatching the given row index.
    Executing(usize),
    Ended,
    Failed(Error),
}

// ---------------------------------------------------------------------------
// Hardware bundle
// ---------------------------------------------------------------------------

/// Every capability the engine drives, injected at construction.
pub struct Hardware<A, P, D, C> {
    pub actuator: A,
    pub lsp: [P; 3],
    pub peristaltic: [P; 3],
    pub indicator: P,
    pub dryer: D,
    pub delay: C,
}

/// Outcome of a run that reached `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Rows dispatched between setup and end.
    pub steps: usize,
}

// ---------------------------------------------------------------------------
// Interpreter
// ---------------------------------------------------------------------------

pub struct ProtocolInterpreter<A, P, D, C> {
    motion: MotionController<A>,
    dispense: DispenseEngine<P>,
    wash: WashEngine<P>,
    dry: DryController<D>,
    prime: PrimeRoutine,
    indicator: P,
    delay: C,
    constants: RobotConstants,
    config: Option<Config>,
    state: RunState,
}

impl<A, P, D, C> ProtocolInterpreter<A, P, D, C>
where
    A: ActuatorDriver,
    P: BinaryDriver,
    D: DutyDriver,
    C: Delay,
{
    pub fn new(hw: Hardware<A, P, D, C>, constants: RobotConstants) -> Self {
        Self {
            motion: MotionController::new(hw.actuator),
            dispense: DispenseEngine::new(hw.lsp),
            wash: WashEngine::new(hw.peristaltic),
            dry: DryController::new(hw.dryer),
            prime: PrimeRoutine,
            indicator: hw.indicator,
            delay: hw.delay,
            constants,
            config: None,
            state: RunState::Idle,
        }
    }

    /// Validate and execute `rows` (header already removed).
    ///
    /// Returns once `end` is reached, or with the first error.  Either way
    /// [`state`](Self::state) reflects the outcome afterwards.
    pub fn run(&mut self, rows: &[Row], sink: &mut impl EventSink) -> Result<RunSummary> {
        self.state = RunState::Idle;
        self.config = None;

        match self.drive(rows, sink) {
            Ok(steps) => {
                info!("Reached end of commands after {} steps", steps);
                self.transition(RunState::Ended, sink);
                sink.emit(&RunEvent::Finished { steps });
                Ok(RunSummary { steps })
            }
            Err((row, e)) => {
                match row {
                    Some(row) => error!("run failed at row {}: {}", row, e),
                    None => error!("run failed: {}", e),
                }
                sink.emit(&RunEvent::StepFailed {
                    row,
                    error: e.clone(),
                });
                self.transition(RunState::Failed(e.clone()), sink);
                Err(e)
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// The configuration built from the last run's setup row.
    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    pub fn motion(&self) -> &MotionController<A> {
        &self.motion
    }

    pub fn delay(&self) -> &C {
        &self.delay
    }

    // ── Internal ──────────────────────────────────────────────

    fn drive(
        &mut self,
        rows: &[Row],
        sink: &mut impl EventSink,
    ) -> core::result::Result<usize, (Option<usize>, Error)> {
        self.transition(RunState::Validating, sink);
        let config = self.validate(rows).map_err(|e| (None, e))?;
        self.config = Some(config);

        self.transition(RunState::Homing, sink);
        self.motion
            .home(&config, &mut self.delay)
            .map_err(|e| (None, e))?;

        let mut steps = 0;
        for (index, row) in rows.iter().enumerate().skip(1) {
            self.transition(RunState::Executing(index), sink);
            let command = Command::from_row(index, row).map_err(|e| (Some(index), e))?;
            if command == Command::End {
                break;
            }
            info!("now running step {} ({})", index, command.kind());
            sink.emit(&RunEvent::StepStarted {
                row: index,
                command: command.clone(),
            });
            self.execute(index, &config, &command)
                .map_err(|e| (Some(index), e))?;
            steps += 1;
        }
        Ok(steps)
    }

    /// Structural checks and config construction.  No hardware access.
    ///
    /// Rows with an unrecognised tag pass here; they fail with
    /// [`Error::UnknownCommand`] once execution reaches them.
    fn validate(&self, rows: &[Row]) -> Result<Config> {
        let Some(first) = rows.first() else {
            return Err(Error::structure(0, "protocol is empty"));
        };
        if first.tag() != Some(CommandKind::Setup.tag()) {
            return Err(Error::structure(0, "setup must be the first row"));
        }
        let last = rows.len() - 1;
        if last == 0 || rows[last].tag() != Some(CommandKind::End.tag()) {
            return Err(Error::structure(last, "end must be the last row"));
        }

        let Command::Setup(calibration) = Command::from_row(0, first)? else {
            return Err(Error::structure(0, "setup must be the first row"));
        };

        for (index, row) in rows.iter().enumerate().take(last).skip(1) {
            match Command::from_row(index, row) {
                Ok(Command::Setup(_)) => {
                    return Err(Error::structure(index, "setup may only appear in the first row"));
                }
                Ok(Command::End) => {
                    return Err(Error::structure(index, "end must be the last row"));
                }
                Ok(_) | Err(Error::UnknownCommand { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        let config = Config::new(calibration, self.constants)?;
        info!("config: {:?}", config);
        Ok(config)
    }

    fn execute(&mut self, index: usize, config: &Config, command: &Command) -> Result<()> {
        match *command {
            Command::Dispense {
                pump,
                well,
                volume_ul,
            } => self.dispense.dispense(
                config,
                &mut self.motion,
                &mut self.delay,
                pump.number(),
                well,
                volume_ul,
            ),
            Command::Wash {
                pump,
                well,
                volume_ml,
            } => self.wash.wash(
                config,
                &mut self.motion,
                &mut self.delay,
                pump.number(),
                well,
                volume_ml,
            ),
            Command::Dry { duration } => self.dry.dry(duration, &mut self.delay),
            Command::Wait { duration } => self.wait(duration),
            Command::Prime => self.prime.run(
                config,
                self.dispense.pumps_mut(),
                self.wash.pumps_mut(),
                &mut self.delay,
            ),
            Command::Setup(_) | Command::End => Err(Error::structure(
                index,
                "setup and end are not executable steps",
            )),
        }
    }

    /// Indicator on for `duration`, then off.
    fn wait(&mut self, duration: Duration) -> Result<()> {
        info!("wait: {:?}", duration);
        if let Err(fault) = self.indicator.energize() {
            let _ = self.indicator.de_energize();
            return Err(fault.into());
        }
        self.delay.hold(duration);
        self.indicator.de_energize()?;
        Ok(())
    }

    fn transition(&mut self, to: RunState, sink: &mut impl EventSink) {
        let from = mem::replace(&mut self.state, to.clone());
        info!("run state: {:?} -> {:?}", from, to);
        sink.emit(&RunEvent::StateChanged { from, to });
    }
}
