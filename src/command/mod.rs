//! Command module: greeting, classification and execution
//!
//! A transcript flows through [`classify`] into an intent, which the
//! [`ActionExecutor`] turns into a sentence to speak and display.

mod classifier;
mod executor;
mod greeting;

pub use classifier::{classify, Transcript};
pub use executor::{ActionError, ActionExecutor, SessionControl};
pub use greeting::Period;
