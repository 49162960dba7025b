use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{ApiBackend, CameraIndex, CameraInfo, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

use crate::camera::domain::camera_source::{CameraFormat, CameraSource};
use crate::shared::frame::Frame;

/// Webcam source on the platform's native capture backend
/// (V4L2 / AVFoundation / MediaFoundation), decoding to RGB.
pub struct NokhwaCamera {
    index: u32,
    camera: Option<Camera>,
    frames_read: u64,
}

impl NokhwaCamera {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            camera: None,
            frames_read: 0,
        }
    }
}

impl CameraSource for NokhwaCamera {
    fn open(&mut self) -> Result<CameraFormat, Box<dyn std::error::Error>> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(self.index), requested)?;
        camera.open_stream()?;

        let resolution = camera.resolution();
        let format = CameraFormat {
            width: resolution.width(),
            height: resolution.height(),
            fps: camera.frame_rate(),
        };
        log::info!(
            "opened camera {}: {}x{} @ {} fps",
            self.index,
            format.width,
            format.height,
            format.fps
        );

        self.camera = Some(camera);
        self.frames_read = 0;
        Ok(format)
    }

    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let camera = self
            .camera
            .as_mut()
            .ok_or("camera read attempted while closed")?;

        let buffer = camera.frame()?;
        let decoded = buffer.decode_image::<RgbFormat>()?;
        let (width, height) = decoded.dimensions();
        let frame = Frame::new(decoded.into_raw(), width, height, self.frames_read);
        self.frames_read += 1;
        Ok(Some(frame))
    }

    fn close(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                log::warn!("failed to stop camera stream: {e}");
            }
            log::info!("released camera {}", self.index);
        }
    }

    fn is_open(&self) -> bool {
        self.camera.is_some()
    }
}

impl Drop for NokhwaCamera {
    fn drop(&mut self) {
        self.close();
    }
}

/// Enumerate attached cameras as `(index, human name)` pairs.
pub fn list_cameras() -> Result<Vec<(u32, String)>, Box<dyn std::error::Error>> {
    let cameras = nokhwa::query(ApiBackend::Auto)?;
    Ok(cameras.iter().filter_map(camera_entry).collect())
}

/// Numeric listing entry for one device. String-indexed devices cannot be
/// opened through [`NokhwaCamera::new`], so they are skipped rather than
/// mislabeled with a made-up number.
fn camera_entry(info: &CameraInfo) -> Option<(u32, String)> {
    match info.index() {
        CameraIndex::Index(i) => Some((*i, info.human_name())),
        CameraIndex::String(id) => {
            log::debug!("skipping string-indexed camera {id} ({})", info.human_name());
            None
        }
    }
}
