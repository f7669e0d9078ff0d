//! Adapters — concrete implementations of the port traits.
//!
//! | Adapter     | Implements                 | Connects to                  |
//! |-------------|----------------------------|------------------------------|
//! | `hal`       | ActuatorDriver             | two embedded-hal output pins |
//! |             | BinaryDriver               | one embedded-hal output pin  |
//! |             | DutyDriver                 | embedded-hal PWM channel     |
//! | `delay`     | Delay                      | thread sleep / `DelayNs` / virtual clock |
//! | `sim`       | embedded-hal pin and PWM   | nothing (logs level changes) |
//! | `log_sink`  | EventSink                  | `log` output, event recorder |

pub mod delay;
pub mod hal;
pub mod log_sink;
pub mod sim;
