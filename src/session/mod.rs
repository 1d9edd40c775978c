//! Session module for the listen/respond loop
//!
//! Provides an explicit state machine with two states:
//! - Idle: greeting screen, nothing listening
//! - Active: a single background task listens, classifies, executes and
//!   presents until stopped or told to exit

mod machine;

pub use machine::{Collaborators, SessionMachine, SessionState};
