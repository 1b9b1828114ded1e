// Maze collapse display library
pub mod config;
pub mod display;
pub mod error;

pub use crate::config::{ConfigBuilder, DisplayConfig};
pub use crate::display::{GridDisplay, WaitOutcome};
pub use crate::error::{Error, Result};
