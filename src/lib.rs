//! AutoENZ robot engine.
//!
//! Interprets a tabular protocol and drives the liquid-handling hardware:
//! a linear actuator carrying the dispensing head, three pulse-driven linear
//! syringe pumps, three continuous peristaltic pumps, a PWM drying element
//! and an indicator light.  All hardware is reached through the port traits
//! in [`app::ports`], so the whole engine runs on the host against mocks or
//! the simulated pins in [`adapters::sim`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod dosing;
pub mod dry;
pub mod error;
pub mod interpreter;
pub mod motion;
pub mod pins;
pub mod protocol;

pub use error::{Error, HardwareFault, Result};
pub use interpreter::{Hardware, ProtocolInterpreter, RunState, RunSummary};
