//! Drives a hobby ESC from a Raspberry Pi: a relay on one GPIO switches the
//! ESC power button, a second GPIO carries the servo-style throttle signal.

pub mod config;
pub mod delay;
pub mod error;
pub mod esc;
pub mod power;
pub mod routine;
pub mod servo;
pub mod throttle;

#[cfg(test)]
mod testing;

pub use config::{EscConfig, PwmBackend, ThrottleLimits};
pub use error::{EscError, Result};
pub use esc::{EscController, PiEsc};
