use super::{DisplayError, DisplaySink, KeyCode};
use crate::frame::{Frame, PixelDepth};
use minifb::{KeyRepeat, Window, WindowOptions};
use std::thread;
use std::time::{Duration, Instant};

/// Longest single sleep while waiting for a key, keeps the window responsive
const POLL_SLICE: Duration = Duration::from_millis(1);

/// Desktop window backed by minifb
pub struct WindowDisplay {
    window: Option<Window>,
    title: String,
    pixels: Vec<u32>,
    closed: bool,
}

impl WindowDisplay {
    pub fn new() -> Self {
        Self {
            window: None,
            title: String::new(),
            pixels: Vec::new(),
            closed: false,
        }
    }

    fn ensure_window(
        &mut self,
        title: &str,
        width: usize,
        height: usize,
    ) -> Result<&mut Window, DisplayError> {
        let window = match self.window.take() {
            Some(window) if self.title == title => window,
            _ => {
                tracing::info!("Creating window {:?} at {}x{}", title, width, height);

                let options = WindowOptions {
                    resize: true,
                    ..WindowOptions::default()
                };
                let window = Window::new(title, width, height, options).map_err(|err| {
                    DisplayError::WindowCreate {
                        name: title.to_owned(),
                        reason: err.to_string(),
                    }
                })?;
                self.title = title.to_owned();
                window
            }
        };

        Ok(self.window.insert(window))
    }
}

impl Default for WindowDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplaySink for WindowDisplay {
    fn show(&mut self, title: &str, frame: &Frame) -> Result<(), DisplayError> {
        let (width, height) = frame.dimensions();
        let (width, height) = (width as usize, height as usize);

        let mut pixels = std::mem::take(&mut self.pixels);
        to_0rgb(frame, &mut pixels)?;

        let window = self.ensure_window(title, width, height)?;
        let result = window
            .update_with_buffer(&pixels, width, height)
            .map_err(|err| DisplayError::Update(err.to_string()));

        self.pixels = pixels;
        result
    }

    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyCode>, DisplayError> {
        let Some(window) = self.window.as_mut() else {
            thread::sleep(timeout);
            return Ok(None);
        };

        let deadline = Instant::now() + timeout;
        loop {
            if !window.is_open() {
                self.closed = true;
                return Ok(None);
            }

            if let Some(key) = window.get_keys_pressed(KeyRepeat::No).first() {
                return Ok(Some(KeyCode(*key as u32)));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            thread::sleep((deadline - now).min(POLL_SLICE));
            window.update();
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Convert a frame into minifb's 0RGB pixel layout, reusing `out`
///
/// Wider depths are scaled down to 8 bits; float samples are expected in 0..=1.
fn to_0rgb(frame: &Frame, out: &mut Vec<u32>) -> Result<(), DisplayError> {
    let depth = frame.depth();
    let channels = frame.channels() as usize;

    if matches!(depth, PixelDepth::User(_)) || !matches!(channels, 1 | 3 | 4) {
        return Err(DisplayError::UnsupportedFormat {
            label: frame.label(),
        });
    }

    let expected = frame.expected_len();
    let data = frame.data();
    if data.len() < expected {
        return Err(DisplayError::ShortBuffer {
            expected,
            actual: data.len(),
        });
    }

    let sample_size = depth.sample_size();
    let pixel_size = sample_size * channels;

    out.clear();
    out.reserve(expected / pixel_size);
    for px in data[..expected].chunks_exact(pixel_size) {
        let sample = |i: usize| to_u8(depth, &px[i * sample_size..(i + 1) * sample_size]) as u32;
        let (r, g, b) = if channels == 1 {
            let v = sample(0);
            (v, v, v)
        } else {
            // 4-channel frames carry alpha last; it is dropped.
            (sample(0), sample(1), sample(2))
        };
        out.push((r << 16) | (g << 8) | b);
    }

    Ok(())
}

/// Scale one native-endian sample down to 8 bits
fn to_u8(depth: PixelDepth, bytes: &[u8]) -> u8 {
    let float = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;

    match depth {
        PixelDepth::U8 => bytes[0],
        PixelDepth::S8 => (bytes[0] as i8 as i16 + 128) as u8,
        PixelDepth::U16 => (u16::from_ne_bytes([bytes[0], bytes[1]]) >> 8) as u8,
        PixelDepth::S16 => {
            let v = i16::from_ne_bytes([bytes[0], bytes[1]]) as i32 + 32768;
            (v >> 8) as u8
        }
        PixelDepth::S32 => {
            let v = i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64;
            let v = v + (1 << 31);
            (v >> 24) as u8
        }
        PixelDepth::F32 => {
            float(f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64)
        }
        PixelDepth::F64 => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(&bytes[..8]);
            float(f64::from_ne_bytes(raw))
        }
        PixelDepth::User(_) => 0,
    }
}
