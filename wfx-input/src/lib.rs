//! Keyboard input handling for the WFX preview

mod commands;
mod handler;

pub use commands::{Command, PARAM_STEP};
pub use handler::{InputHandler, Mode};
