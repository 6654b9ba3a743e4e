mod window;

pub use window::WindowDisplay;

use crate::frame::Frame;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to create window {name:?}: {reason}")]
    WindowCreate { name: String, reason: String },

    #[error("failed to update window: {0}")]
    Update(String),

    #[error("cannot display {label} frame")]
    UnsupportedFormat { label: String },

    #[error("frame holds {actual} bytes, {expected} expected for its layout")]
    ShortBuffer { expected: usize, actual: usize },
}

/// Backend-specific code of a pressed key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCode(pub u32);

/// Trait for on-screen frame destinations
pub trait DisplaySink {
    /// Render a frame into the named window, creating it on first use
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), DisplayError>;

    /// Wait up to `timeout` for a key press
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyCode>, DisplayError>;

    /// Whether the user closed a window this sink opened
    fn is_closed(&self) -> bool {
        false
    }
}
