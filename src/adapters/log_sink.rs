//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each [`RunEvent`] as one structured
//! log line.  The host runner installs `env_logger` behind it.

use log::{debug, info, warn};

use crate::app::events::RunEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`RunEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &RunEvent) {
        match event {
            RunEvent::StateChanged { from, to } => {
                debug!("STATE | {:?} -> {:?}", from, to);
            }
            RunEvent::StepStarted { row, command } => {
                info!("STEP  | row={} | {:?}", row, command);
            }
            RunEvent::StepFailed { row: Some(row), error } => {
                warn!("FAIL  | row={} | {}", row, error);
            }
            RunEvent::StepFailed { row: None, error } => {
                warn!("FAIL  | {}", error);
            }
            RunEvent::Finished { steps } => {
                info!("DONE  | steps={}", steps);
            }
        }
    }
}

/// Sink that keeps every event, for tests and post-run inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<RunEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &RunEvent) {
        self.events.push(event.clone());
    }
}
