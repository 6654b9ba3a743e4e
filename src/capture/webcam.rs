use super::{CaptureError, CaptureSource, ColorMode};
use crate::frame::{Frame, PixelDepth};
use nokhwa::pixel_format::{LumaFormat, RgbFormat};
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

pub struct WebcamCapture {
    camera: Camera,
    index: u32,
    mode: ColorMode,
}

impl WebcamCapture {
    pub fn open(device_index: u32, mode: ColorMode) -> Result<Self, CaptureError> {
        tracing::info!("Opening webcam {} ({:?})", device_index, mode);

        let open_failed = |err: nokhwa::NokhwaError| CaptureError::OpenFailed {
            index: device_index,
            reason: err.to_string(),
        };

        let index = CameraIndex::Index(device_index);
        let requested = match mode {
            ColorMode::Rgb => {
                RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution)
            }
            ColorMode::Gray => {
                RequestedFormat::new::<LumaFormat>(RequestedFormatType::AbsoluteHighestResolution)
            }
        };

        let mut camera = Camera::new(index, requested).map_err(open_failed)?;
        camera.open_stream().map_err(open_failed)?;

        tracing::info!(
            "Webcam {} streaming: {} ({:?})",
            device_index,
            camera.info().human_name(),
            camera.camera_format()
        );

        Ok(Self {
            camera,
            index: device_index,
            mode,
        })
    }
}

impl CaptureSource for WebcamCapture {
    fn is_opened(&self) -> bool {
        self.camera.is_stream_open()
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let buffer = self
            .camera
            .frame()
            .map_err(|err| CaptureError::Acquisition(err.to_string()))?;

        let decode_failed = |err: nokhwa::NokhwaError| {
            CaptureError::Acquisition(format!(
                "failed to decode {:?} frame: {}",
                buffer.source_frame_format(),
                err
            ))
        };

        // Raw samples only: nokhwa may link its own image version.
        let frame = match self.mode {
            ColorMode::Rgb => {
                let img = buffer.decode_image::<RgbFormat>().map_err(decode_failed)?;
                let (width, height) = (img.width(), img.height());
                Frame::new(width, height, PixelDepth::U8, 3, img.into_raw())
            }
            ColorMode::Gray => {
                let img = buffer.decode_image::<LumaFormat>().map_err(decode_failed)?;
                let (width, height) = (img.width(), img.height());
                Frame::new(width, height, PixelDepth::U8, 1, img.into_raw())
            }
        };

        Ok(frame)
    }
}

impl Drop for WebcamCapture {
    fn drop(&mut self) {
        if !self.camera.is_stream_open() {
            return;
        }
        match self.camera.stop_stream() {
            Ok(()) => tracing::info!("Webcam {} released", self.index),
            Err(err) => tracing::warn!("Failed to stop webcam {} stream: {}", self.index, err),
        }
    }
}
