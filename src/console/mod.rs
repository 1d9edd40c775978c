//! Console front end
//!
//! Stands in for the windowed UI: stdin carries the start/stop trigger and
//! typed utterances, stdout shows the active/idle views and responses.

mod input;
mod render;
mod transcriber;

pub use input::run_input;
pub use render::{run_renderer, Renderer};
pub use transcriber::ConsoleTranscriber;
