//! Outbound run events.
//!
//! The [`ProtocolInterpreter`](crate::interpreter::ProtocolInterpreter)
//! emits these through the [`EventSink`](super::ports::EventSink) port.

use crate::error::Error;
use crate::interpreter::RunState;
use crate::protocol::Command;

/// Structured events emitted during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// The interpreter moved between states.
    StateChanged { from: RunState, to: RunState },

    /// Row `row` is about to be dispatched.
    StepStarted { row: usize, command: Command },

    /// Row `row` aborted the run.  `row` is `None` for failures outside a
    /// step (validation of the protocol as a whole, homing).
    StepFailed { row: Option<usize>, error: Error },

    /// The terminal command was reached after `steps` dispatched steps.
    Finished { steps: usize },
}
