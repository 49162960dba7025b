use crate::shared::frame::Frame;

/// Negotiated capture format, reported when a camera opens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// Live camera port: `open` / read-one-frame / `close`.
///
/// A source may be opened and closed repeatedly. `read` returns `Ok(None)`
/// when the stream has ended and `Err` on a transient or device failure;
/// the capture loop treats both as a stop condition.
pub trait CameraSource: Send {
    /// Acquire the device and start streaming.
    fn open(&mut self) -> Result<CameraFormat, Box<dyn std::error::Error>>;

    /// Read the next frame. Must only be called while open.
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Release the device. Idempotent.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}
