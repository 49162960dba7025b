use crate::shared::frame::Frame;

use super::detection::Detection;

/// Domain interface for per-frame object detection.
///
/// Implementations may hold inference state, hence `&mut self`. Per-call
/// latency is unbounded; the capture loop tolerates slow frames.
pub trait ObjectDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>>;
}
