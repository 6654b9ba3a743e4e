//! Scripted capture and display doubles for exercising the capture loop without hardware.

use crate::capture::{CaptureError, CaptureSource};
use crate::frame::{Frame, PixelDepth};
use crate::output::{DisplayError, DisplaySink, KeyCode};
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

/// Observes a `MockCapture` after it has been moved into the loop.
#[derive(Debug, Clone, Default)]
pub struct CaptureProbe {
    reads: Rc<Cell<usize>>,
    released: Rc<Cell<bool>>,
}

impl CaptureProbe {
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn released(&self) -> bool {
        self.released.get()
    }
}

/// Capture source replaying a fixed script, then empty frames forever.
pub struct MockCapture {
    script: VecDeque<Result<Frame, CaptureError>>,
    opened: bool,
    probe: CaptureProbe,
}

impl MockCapture {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self::scripted(frames.into_iter().map(Ok).collect())
    }

    pub fn scripted(script: Vec<Result<Frame, CaptureError>>) -> Self {
        Self {
            script: script.into(),
            opened: true,
            probe: CaptureProbe::default(),
        }
    }

    /// Report `is_opened() == false`
    pub fn closed(mut self) -> Self {
        self.opened = false;
        self
    }

    pub fn probe(&self) -> CaptureProbe {
        self.probe.clone()
    }
}

impl CaptureSource for MockCapture {
    fn is_opened(&self) -> bool {
        self.opened
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        self.probe.reads.set(self.probe.reads.get() + 1);
        self.script
            .pop_front()
            .unwrap_or_else(|| Ok(Frame::new(0, 0, PixelDepth::U8, 0, Vec::new())))
    }
}

impl Drop for MockCapture {
    fn drop(&mut self) {
        self.probe.released.set(true);
    }
}

/// Display sink recording every call.
#[derive(Debug, Default)]
pub struct MockDisplay {
    shown: Vec<(String, (u32, u32))>,
    polls: usize,
    last_timeout: Option<Duration>,
    key_on: Option<(usize, KeyCode)>,
    close_on: Option<usize>,
    closed: bool,
    failing: bool,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `key` on the `poll`-th (1-based) key poll
    pub fn key_on_poll(mut self, poll: usize, key: KeyCode) -> Self {
        self.key_on = Some((poll, key));
        self
    }

    /// Behave as if the user closed the window during the `poll`-th key poll
    pub fn close_on_poll(mut self, poll: usize) -> Self {
        self.close_on = Some(poll);
        self
    }

    /// Fail every `show` call
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn shown(&self) -> &[(String, (u32, u32))] {
        &self.shown
    }

    pub fn show_count(&self) -> usize {
        self.shown.len()
    }

    pub fn poll_count(&self) -> usize {
        self.polls
    }

    pub fn last_timeout(&self) -> Option<Duration> {
        self.last_timeout
    }
}

impl DisplaySink for MockDisplay {
    fn show(&mut self, window: &str, frame: &Frame) -> Result<(), DisplayError> {
        if self.failing {
            return Err(DisplayError::Update("mock display failure".to_owned()));
        }
        self.shown.push((window.to_owned(), frame.dimensions()));
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyCode>, DisplayError> {
        self.polls += 1;
        self.last_timeout = Some(timeout);

        if self.close_on == Some(self.polls) {
            self.closed = true;
        }
        Ok(self
            .key_on
            .filter(|(poll, _)| *poll == self.polls)
            .map(|(_, key)| key))
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
