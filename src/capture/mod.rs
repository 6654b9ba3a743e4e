mod webcam;

pub use webcam::WebcamCapture;

use crate::frame::Frame;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("unable to open camera {index}: {reason}")]
    OpenFailed { index: u32, reason: String },

    #[error("frame acquisition failed: {0}")]
    Acquisition(String),
}

/// Pixel layout requested from the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Three interleaved 8-bit channels
    #[default]
    Rgb,
    /// Single 8-bit luma channel
    Gray,
}

/// Trait for camera capture sources
///
/// Implementations release their device when dropped.
pub trait CaptureSource {
    /// Whether the device is open and streaming
    fn is_opened(&self) -> bool;

    /// Block until the next frame is available
    ///
    /// An `Err` or an empty frame both mean the stream is over.
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;
}
