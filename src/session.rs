use crate::capture::{CaptureError, CaptureSource};
use crate::output::{DisplaySink, KeyCode};
use anyhow::{Context, Result};
use std::io::Write;
use std::time::{Duration, Instant};

pub const OPEN_FAILED_MSG: &str = "ERROR! Unable to open camera";
pub const BLANK_FRAME_MSG: &str = "ERROR! blank frame grabbed";

/// How often the debug frame-rate line is logged
const STATS_INTERVAL: u64 = 30;

/// Parameters of one capture-display run
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub device: u32,
    pub window: String,
    pub key_wait: Duration,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The camera could not be opened
    OpenFailed,
    /// The camera produced an empty frame or a read error
    BlankFrame,
    /// The user pressed a key in the window
    KeyPressed(KeyCode),
    /// The user closed the window
    WindowClosed,
}

impl Termination {
    /// Process exit status for this outcome
    ///
    /// Only a failed open is an error; a stream that dies mid-run still exits 0.
    pub fn exit_code(self) -> i32 {
        match self {
            Termination::OpenFailed => -1,
            Termination::BlankFrame | Termination::KeyPressed(_) | Termination::WindowClosed => 0,
        }
    }
}

/// Open the camera and show its frames until the stream ends or a key is pressed.
///
/// `out` receives the user-facing progress lines, `err` the two failure
/// messages. The capture handle is dropped before this returns, on every path.
pub fn run<C, D, F, O, E>(
    config: &SessionConfig,
    open: F,
    display: &mut D,
    out: &mut O,
    err: &mut E,
) -> Result<Termination>
where
    C: CaptureSource,
    D: DisplaySink,
    F: FnOnce(u32) -> Result<C, CaptureError>,
    O: Write,
    E: Write,
{
    let mut capture = match open(config.device) {
        Ok(capture) if capture.is_opened() => capture,
        Ok(_) => {
            tracing::error!("Camera {} opened but is not streaming", config.device);
            writeln!(err, "{}", OPEN_FAILED_MSG)?;
            return Ok(Termination::OpenFailed);
        }
        Err(e) => {
            tracing::error!("{}", e);
            writeln!(err, "{}", OPEN_FAILED_MSG)?;
            return Ok(Termination::OpenFailed);
        }
    };

    writeln!(out, "Start grabbing")?;
    writeln!(out, "Press any key to terminate")?;
    out.flush()?;

    let termination = capture_loop(config, &mut capture, display, out, err)?;
    tracing::info!("Stopping: {:?}", termination);

    drop(capture);
    out.flush()?;
    Ok(termination)
}

fn capture_loop<C, D, O, E>(
    config: &SessionConfig,
    capture: &mut C,
    display: &mut D,
    out: &mut O,
    err: &mut E,
) -> Result<Termination>
where
    C: CaptureSource,
    D: DisplaySink,
    O: Write,
    E: Write,
{
    let mut first_frame = true;
    let mut frame_count = 0u64;
    let started = Instant::now();

    loop {
        let frame = match capture.read_frame() {
            Ok(frame) if !frame.is_empty() => frame,
            Ok(_) => {
                tracing::debug!("Empty frame after {} frames", frame_count);
                writeln!(err, "{}", BLANK_FRAME_MSG)?;
                return Ok(Termination::BlankFrame);
            }
            Err(e) => {
                tracing::debug!("{} after {} frames", e, frame_count);
                writeln!(err, "{}", BLANK_FRAME_MSG)?;
                return Ok(Termination::BlankFrame);
            }
        };

        if first_frame {
            writeln!(out, "Frame: {}", frame)?;
            out.flush()?;
            first_frame = false;
        }

        display
            .show(&config.window, &frame)
            .with_context(|| format!("Failed to display frame {}", frame_count))?;
        frame_count += 1;

        if frame_count % STATS_INTERVAL == 0 {
            let fps = frame_count as f64 / started.elapsed().as_secs_f64();
            tracing::debug!("Frame {}: {:.1} fps", frame_count, fps);
        }

        let key = display
            .poll_key(config.key_wait)
            .context("Failed to poll for key press")?;
        if let Some(key) = key {
            return Ok(Termination::KeyPressed(key));
        }
        if display.is_closed() {
            return Ok(Termination::WindowClosed);
        }
    }
}
