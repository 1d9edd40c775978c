//! Presence module: the face scan that gates startup

mod gate;
mod vision;

pub use gate::{await_presence, GateSettings};
pub use vision::{CommandCamera, CommandFaceDetector};
