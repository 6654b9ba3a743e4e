use std::fmt;

/// Per-channel sample representation of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelDepth {
    U8,
    S8,
    U16,
    S16,
    S32,
    F32,
    F64,
    /// Backend-specific depth with no portable name
    User(i32),
}

impl PixelDepth {
    /// Bytes used by one sample of one channel
    pub fn sample_size(self) -> usize {
        match self {
            PixelDepth::U8 | PixelDepth::S8 => 1,
            PixelDepth::U16 | PixelDepth::S16 => 2,
            PixelDepth::S32 | PixelDepth::F32 => 4,
            PixelDepth::F64 => 8,
            PixelDepth::User(_) => 0,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            PixelDepth::U8 => "8U",
            PixelDepth::S8 => "8S",
            PixelDepth::U16 => "16U",
            PixelDepth::S16 => "16S",
            PixelDepth::S32 => "32S",
            PixelDepth::F32 => "32F",
            PixelDepth::F64 => "64F",
            PixelDepth::User(_) => "User",
        }
    }
}

/// Build the short format label for a depth/channel pair, e.g. `8UC3`
pub fn format_label(depth: PixelDepth, channels: u8) -> String {
    format!("{}C{}", depth.tag(), channels)
}

/// One acquired image.
///
/// Samples are interleaved and tightly packed, native endian for multi-byte
/// depths. A frame with no pixels is "empty" and marks an acquisition failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    depth: PixelDepth,
    channels: u8,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, depth: PixelDepth, channels: u8, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            depth,
            channels,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.channels == 0 || self.data.is_empty()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn depth(&self) -> PixelDepth {
        self.depth
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn label(&self) -> String {
        format_label(self.depth, self.channels)
    }

    /// Number of bytes a fully populated frame of this layout must hold
    pub fn expected_len(&self) -> usize {
        self.width as usize
            * self.height as usize
            * self.channels as usize
            * self.depth.sample_size()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}x{}", self.label(), self.width, self.height)
    }
}
