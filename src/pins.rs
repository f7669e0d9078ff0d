//! GPIO assignments for the AutoENZ controller board.
//!
//! Single source of truth: every adapter built by the runner takes its pin
//! number from here rather than hard-coding it.

// ---------------------------------------------------------------------------
// Linear syringe pumps (LSP), pulse-driven
// ---------------------------------------------------------------------------

pub const LSP_GPIO: [i32; 3] = [17, 16, 4];

// ---------------------------------------------------------------------------
// Peristaltic wash pumps, continuous run
// ---------------------------------------------------------------------------

pub const PERISTALTIC_GPIO: [i32; 3] = [27, 14, 13];

// ---------------------------------------------------------------------------
// Linear actuator H-bridge
// ---------------------------------------------------------------------------

/// IN1 high alone drives the carriage forward (away from home).
pub const ACTUATOR_IN1_GPIO: i32 = 18;
/// IN2 high alone drives the carriage backward (toward home).
pub const ACTUATOR_IN2_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Indicator and drying element
// ---------------------------------------------------------------------------

/// On-board LED, lit during `wait` steps.
pub const INDICATOR_GPIO: i32 = 2;
/// PWM output feeding the drying element.
pub const DRYER_PWM_GPIO: i32 = 19;
