//! Engine boundary: port traits the hardware adapters implement and the
//! events the interpreter emits.

pub mod events;
pub mod ports;
