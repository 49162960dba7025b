use thiserror::Error;

use crate::annotate::distance::DistanceEstimator;
use crate::annotate::frame_annotator::FrameAnnotator;
use crate::camera::domain::camera_source::{CameraFormat, CameraSource};
use crate::detection::domain::object_detector::ObjectDetector;
use crate::detection::domain::target::TargetSpec;
use crate::shared::frame::Frame;

/// Capture loop lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No camera open.
    Idle,
    /// Camera open, frames being read.
    Running,
    /// Stop requested; camera released on the next step.
    Stopping,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("cannot open camera: {0}")]
    CameraUnavailable(String),
}

/// Why a running session stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    Requested,
    StreamEnded,
    ReadFailed(String),
}

/// Result of driving the loop one step.
#[derive(Debug)]
pub enum StepOutcome {
    /// Nothing to do; the session is idle.
    Idle,
    /// One frame was processed. `status` carries a user-visible update when
    /// the target was spotted.
    Frame {
        frame: Frame,
        status: Option<String>,
    },
    /// The loop stopped this step and the camera was released.
    Stopped(StopReason),
}

/// The capture/detect/annotate loop, shaped as a step function.
///
/// Each [`step`](TrackingSession::step) processes exactly one frame and
/// returns immediately, so a timer-driven event loop stays responsive no
/// matter how long inference takes. The camera handle is owned here
/// exclusively: acquired on [`start`](TrackingSession::start), released when
/// the loop stops or the session is dropped.
pub struct TrackingSession {
    camera: Box<dyn CameraSource>,
    detector: Box<dyn ObjectDetector>,
    annotator: FrameAnnotator,
    estimator: DistanceEstimator,
    target: Option<TargetSpec>,
    state: SessionState,
    format: Option<CameraFormat>,
}

impl TrackingSession {
    pub fn new(
        camera: Box<dyn CameraSource>,
        detector: Box<dyn ObjectDetector>,
        annotator: FrameAnnotator,
        estimator: DistanceEstimator,
    ) -> Self {
        Self {
            camera,
            detector,
            annotator,
            estimator,
            target: None,
            state: SessionState::Idle,
            format: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn target(&self) -> Option<&TargetSpec> {
        self.target.as_ref()
    }

    /// Replace the active target. The previous one is simply overwritten;
    /// no history is kept.
    pub fn set_target(&mut self, target: TargetSpec) {
        log::info!("target set to {target}");
        self.target = Some(target);
    }

    /// Open the camera and enter `Running`.
    ///
    /// A failed open leaves the session `Idle` with no handle held, and a
    /// later `start` may succeed. Calling while already running is a no-op
    /// returning the current format.
    pub fn start(&mut self) -> Result<CameraFormat, SessionError> {
        match self.state {
            SessionState::Running => {
                return Ok(self.format.unwrap_or(CameraFormat {
                    width: 0,
                    height: 0,
                    fps: 0,
                }))
            }
            SessionState::Stopping => self.release(),
            SessionState::Idle => {}
        }

        let format = self.camera.open().map_err(|e| {
            log::warn!("camera open failed: {e}");
            SessionError::CameraUnavailable(e.to_string())
        })?;
        self.state = SessionState::Running;
        self.format = Some(format);
        Ok(format)
    }

    /// Request a stop. The camera is released on the next `step`, on the
    /// loop's own thread.
    pub fn stop(&mut self) {
        if self.state == SessionState::Running {
            self.state = SessionState::Stopping;
        }
    }

    /// Drive the loop one iteration: read, detect, match, annotate.
    pub fn step(&mut self) -> StepOutcome {
        match self.state {
            SessionState::Idle => StepOutcome::Idle,
            SessionState::Stopping => {
                self.release();
                StepOutcome::Stopped(StopReason::Requested)
            }
            SessionState::Running => match self.camera.read() {
                Err(e) => {
                    log::warn!("frame read failed: {e}");
                    let reason = StopReason::ReadFailed(e.to_string());
                    self.release();
                    StepOutcome::Stopped(reason)
                }
                Ok(None) => {
                    log::info!("camera stream ended");
                    self.release();
                    StepOutcome::Stopped(StopReason::StreamEnded)
                }
                Ok(Some(frame)) => self.process_frame(frame),
            },
        }
    }

    fn process_frame(&mut self, mut frame: Frame) -> StepOutcome {
        // A detector hiccup renders the raw frame rather than killing the loop
        let detections = match self.detector.detect(&frame) {
            Ok(dets) => dets,
            Err(e) => {
                log::warn!("detection failed on frame {}: {e}", frame.index());
                Vec::new()
            }
        };

        let mut status = None;
        if let Some(target) = &self.target {
            for det in detections.iter().filter(|d| target.matches(d)) {
                let distance = self.estimator.estimate(det.bbox.width());
                self.annotator.annotate(&mut frame, det, &distance);
                status = Some(format!("Tracking {target}. Distance: {distance}"));
            }
        }

        StepOutcome::Frame { frame, status }
    }

    fn release(&mut self) {
        self.camera.close();
        self.state = SessionState::Idle;
        self.format = None;
    }
}

impl Drop for TrackingSession {
    fn drop(&mut self) {
        if self.camera.is_open() {
            self.camera.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::detection::{BoundingBox, Detection};
    use std::collections::VecDeque;

    struct FakeCamera {
        open_results: VecDeque<Result<(), String>>,
        reads: VecDeque<Result<Option<Frame>, String>>,
        open: bool,
        close_count: usize,
    }

    impl FakeCamera {
        fn new() -> Self {
            Self {
                open_results: VecDeque::new(),
                reads: VecDeque::new(),
                open: false,
                close_count: 0,
            }
        }

        fn will_open(mut self, result: Result<(), String>) -> Self {
            self.open_results.push_back(result);
            self
        }

        fn with_frames(mut self, count: usize) -> Self {
            for i in 0..count {
                self.reads
                    .push_back(Ok(Some(Frame::new(vec![0u8; 64 * 64 * 3], 64, 64, i as u64))));
            }
            self
        }
    }

    impl CameraSource for FakeCamera {
        fn open(&mut self) -> Result<CameraFormat, Box<dyn std::error::Error>> {
            match self.open_results.pop_front().unwrap_or(Ok(())) {
                Ok(()) => {
                    self.open = true;
                    Ok(CameraFormat {
                        width: 64,
                        height: 64,
                        fps: 30,
                    })
                }
                Err(e) => Err(e.into()),
            }
        }

        fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
            match self.reads.pop_front() {
                Some(Ok(f)) => Ok(f),
                Some(Err(e)) => Err(e.into()),
                None => Ok(None), // stream ended
            }
        }

        fn close(&mut self) {
            self.open = false;
            self.close_count += 1;
        }

        fn is_open(&self) -> bool {
            self.open
        }
    }

    struct FakeDetector {
        detections: Vec<Detection>,
    }

    impl ObjectDetector for FakeDetector {
        fn detect(&mut self, _frame: &Frame) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
            Ok(self.detections.clone())
        }
    }

    fn det(label: &str, confidence: f32, x1: f64) -> Detection {
        Detection {
            label: label.to_string(),
            confidence,
            bbox: BoundingBox {
                x1,
                y1: 10.0,
                x2: x1 + 20.0,
                y2: 30.0,
            },
        }
    }

    fn session(camera: FakeCamera, detections: Vec<Detection>) -> TrackingSession {
        TrackingSession::new(
            Box::new(camera),
            Box::new(FakeDetector { detections }),
            FrameAnnotator::new(None),
            DistanceEstimator::default(),
        )
    }

    fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 3] {
        let i = ((y * frame.width() + x) * 3) as usize;
        let d = frame.data();
        [d[i], d[i + 1], d[i + 2]]
    }

    #[test]
    fn test_starts_idle() {
        let s = session(FakeCamera::new(), vec![]);
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.target().is_none());
    }

    #[test]
    fn test_step_while_idle_does_nothing() {
        let mut s = session(FakeCamera::new().with_frames(1), vec![]);
        assert!(matches!(s.step(), StepOutcome::Idle));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_open_failure_stays_idle_without_leaking_handle() {
        let camera = FakeCamera::new().will_open(Err("device busy".to_string()));
        let mut s = session(camera, vec![]);
        let err = s.start().unwrap_err();
        assert!(matches!(err, SessionError::CameraUnavailable(_)));
        assert_eq!(s.state(), SessionState::Idle);
        // Retryable: next open succeeds (default Ok)
        assert!(s.start().is_ok());
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn test_read_failure_releases_camera_and_allows_restart() {
        let mut camera = FakeCamera::new();
        camera.reads.push_back(Err("device lost".to_string()));
        let mut s = session(camera, vec![]);
        s.start().unwrap();

        match s.step() {
            StepOutcome::Stopped(StopReason::ReadFailed(msg)) => {
                assert!(msg.contains("device lost"))
            }
            other => panic!("expected ReadFailed stop, got {other:?}"),
        }
        assert_eq!(s.state(), SessionState::Idle);

        // A new tracking request transitions Idle → Running again
        assert!(s.start().is_ok());
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn test_stream_end_stops_loop() {
        let mut s = session(FakeCamera::new().with_frames(1), vec![]);
        s.start().unwrap();
        assert!(matches!(s.step(), StepOutcome::Frame { .. }));
        assert!(matches!(
            s.step(),
            StepOutcome::Stopped(StopReason::StreamEnded)
        ));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_stop_request_releases_on_next_step() {
        let mut s = session(FakeCamera::new().with_frames(10), vec![]);
        s.start().unwrap();
        s.stop();
        assert_eq!(s.state(), SessionState::Stopping);
        assert!(matches!(
            s.step(),
            StepOutcome::Stopped(StopReason::Requested)
        ));
        assert_eq!(s.state(), SessionState::Idle);
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut s = session(FakeCamera::new().with_frames(10), vec![]);
        let format = s.start().unwrap();
        let again = s.start().unwrap();
        assert_eq!(format, again);
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn test_matching_detections_annotated_case_insensitively() {
        // car at x=5, Car at x=30, truck at x=55
        let detections = vec![
            det("car", 0.9, 5.0),
            det("Car", 0.8, 30.0),
            det("truck", 0.95, 55.0),
        ];
        let mut s = session(FakeCamera::new().with_frames(1), detections);
        s.set_target(TargetSpec::parse("car").unwrap());
        s.start().unwrap();

        let (frame, status) = match s.step() {
            StepOutcome::Frame { frame, status } => (frame, status),
            other => panic!("expected frame, got {other:?}"),
        };

        // Both car boxes drawn
        assert_eq!(pixel(&frame, 5, 10), [0, 255, 0]);
        assert_eq!(pixel(&frame, 30, 10), [0, 255, 0]);
        // Truck box untouched
        assert_eq!(pixel(&frame, 55, 10), [0, 0, 0]);

        let status = status.expect("matched target should produce status");
        assert!(status.contains("Tracking car"));
        assert!(status.contains("Distance:"));
    }

    #[test]
    fn test_no_target_renders_raw_frames() {
        let mut s = session(
            FakeCamera::new().with_frames(1),
            vec![det("car", 0.9, 5.0)],
        );
        s.start().unwrap();
        match s.step() {
            StepOutcome::Frame { frame, status } => {
                assert!(status.is_none());
                assert_eq!(pixel(&frame, 5, 10), [0, 0, 0]);
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn test_unmatched_target_produces_no_status() {
        let mut s = session(
            FakeCamera::new().with_frames(1),
            vec![det("dog", 0.9, 5.0)],
        );
        s.set_target(TargetSpec::parse("bottle").unwrap());
        s.start().unwrap();
        match s.step() {
            StepOutcome::Frame { status, .. } => assert!(status.is_none()),
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn test_new_target_overwrites_previous() {
        let mut s = session(FakeCamera::new(), vec![]);
        s.set_target(TargetSpec::parse("car").unwrap());
        s.set_target(TargetSpec::parse("bottle").unwrap());
        assert_eq!(s.target().unwrap().name(), "bottle");
    }

    #[test]
    fn test_detector_error_renders_raw_frame_without_stopping() {
        struct FailingDetector;
        impl ObjectDetector for FailingDetector {
            fn detect(
                &mut self,
                _frame: &Frame,
            ) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
                Err("inference exploded".into())
            }
        }

        let mut s = TrackingSession::new(
            Box::new(FakeCamera::new().with_frames(2)),
            Box::new(FailingDetector),
            FrameAnnotator::new(None),
            DistanceEstimator::default(),
        );
        s.set_target(TargetSpec::parse("car").unwrap());
        s.start().unwrap();

        assert!(matches!(
            s.step(),
            StepOutcome::Frame { status: None, .. }
        ));
        assert_eq!(s.state(), SessionState::Running);
    }
}
