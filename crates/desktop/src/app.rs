use std::time::Duration;

use crossbeam_channel::{Receiver, TryRecvError};
use iced::widget::image::Handle;
use iced::widget::{button, column, container, row, text, text_input};
use iced::{Element, Length, Subscription, Task, Theme};

use lookout_core::annotate::distance::DistanceEstimator;
use lookout_core::annotate::font_resolver;
use lookout_core::annotate::frame_annotator::FrameAnnotator;
use lookout_core::camera::infrastructure::nokhwa_camera::NokhwaCamera;
use lookout_core::detection::domain::target::TargetSpec;
use lookout_core::session::tracking_session::{
    SessionState, StepOutcome, StopReason, TrackingSession,
};
use lookout_core::shared::frame::Frame;

use crate::settings::Settings;
use crate::workers::detector_worker::{self, SetupMessage};
use crate::workers::speech_worker::{self, Narrator};
use crate::workers::voice_worker::{self, VoiceMessage};

/// Interval between capture steps, roughly 30 fps.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);
/// Interval for draining background worker channels.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const PROMPT_NO_TARGET: &str = "Please enter an object name.";

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TargetInputChanged(String),
    TrackByText,
    TrackByVoice,
    StopTracking,
    FrameTick,
    PollWorkers,
    Exit,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    settings: Settings,
    input: String,
    status: String,
    video: Option<Handle>,
    target: Option<TargetSpec>,
    /// Built once the detector worker reports ready.
    session: Option<TrackingSession>,
    detector_rx: Option<Receiver<SetupMessage>>,
    voice_rx: Option<Receiver<VoiceMessage>>,
    narrator: Narrator,
    /// Start the capture loop as soon as the detector is ready.
    start_when_ready: bool,
    /// Starts a voice capture; swapped for a stub in tests.
    voice_spawner: Box<dyn Fn() -> Receiver<VoiceMessage>>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let app = Self::with_voice_spawner(Box::new(voice_worker::spawn));
        app.narrator.say(speech_worker::greeting());
        (app, Task::none())
    }

    fn with_voice_spawner(voice_spawner: Box<dyn Fn() -> Receiver<VoiceMessage>>) -> Self {
        Self {
            settings: Settings::load(),
            input: String::new(),
            status: String::from("Enter an object name, or say \"track <object>\"."),
            video: None,
            target: None,
            session: None,
            detector_rx: None,
            voice_rx: None,
            narrator: Narrator::spawn(),
            start_when_ready: false,
            voice_spawner,
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TargetInputChanged(value) => {
                self.input = value;
            }
            Message::TrackByText => match TargetSpec::parse(&self.input) {
                Some(spec) => {
                    self.apply_target(spec);
                    self.request_start();
                }
                None => {
                    self.status = PROMPT_NO_TARGET.to_string();
                    self.narrator.say(PROMPT_NO_TARGET);
                }
            },
            Message::TrackByVoice => {
                self.begin_listen();
                self.request_start();
            }
            Message::StopTracking => {
                if let Some(session) = &mut self.session {
                    session.stop();
                }
                self.start_when_ready = false;
            }
            Message::FrameTick => {
                self.step_session();
            }
            Message::PollWorkers => {
                self.poll_detector();
                self.poll_voice();
            }
            Message::Exit => {
                self.settings.save();
                return iced::exit();
            }
        }
        Task::none()
    }

    pub fn view(&self) -> Element<'_, Message> {
        let input_row = row![
            text("Object:").size(14),
            text_input("e.g. bottle", &self.input)
                .on_input(Message::TargetInputChanged)
                .on_submit(Message::TrackByText)
                .padding(8),
        ]
        .spacing(8)
        .align_y(iced::Alignment::Center);

        let buttons = row![
            button(text("Track (Text)").size(13)).on_press(Message::TrackByText),
            button(text("Track (Voice)").size(13)).on_press(Message::TrackByVoice),
            button(text("Stop").size(13))
                .on_press(Message::StopTracking)
                .style(button::secondary),
            button(text("Exit").size(13))
                .on_press(Message::Exit)
                .style(button::danger),
        ]
        .spacing(8);

        let video: Element<'_, Message> = match &self.video {
            Some(handle) => iced::widget::image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text("Camera feed will appear here").size(14))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        column![
            input_row,
            buttons,
            container(video)
                .width(Length::Fill)
                .height(Length::Fill)
                .style(container::rounded_box),
            text(&self.status).size(14),
        ]
        .spacing(12)
        .padding(16)
        .into()
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subs = Vec::new();

        // Running drives frame steps; Stopping needs one more step to
        // release the camera.
        let looping = self
            .session
            .as_ref()
            .is_some_and(|s| s.state() != SessionState::Idle);
        if looping {
            subs.push(iced::time::every(FRAME_INTERVAL).map(|_| Message::FrameTick));
        }

        if self.detector_rx.is_some() || self.voice_rx.is_some() {
            subs.push(iced::time::every(POLL_INTERVAL).map(|_| Message::PollWorkers));
        }

        Subscription::batch(subs)
    }

    // -- target & session control -------------------------------------------

    /// Start a voice capture unless one is already in flight.
    fn begin_listen(&mut self) {
        if self.voice_rx.is_none() {
            self.voice_rx = Some((self.voice_spawner)());
            self.status = String::from("Listening...");
        }
    }

    fn apply_target(&mut self, spec: TargetSpec) {
        self.input = spec.name().to_string();
        self.status = format!("Tracking {spec}");
        self.narrator.say(format!("Tracking {spec}"));
        if let Some(session) = &mut self.session {
            session.set_target(spec.clone());
        }
        self.target = Some(spec);
    }

    fn request_start(&mut self) {
        if self.session.is_some() {
            self.start_session();
        } else {
            if self.detector_rx.is_none() {
                self.detector_rx = Some(detector_worker::spawn(
                    self.settings.confidence as f64 / 100.0,
                ));
                self.status = String::from("Loading detection model...");
            }
            self.start_when_ready = true;
        }
    }

    fn start_session(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        match session.start() {
            Ok(format) => {
                log::info!(
                    "camera open at {}x{} @ {} fps",
                    format.width,
                    format.height,
                    format.fps
                );
            }
            Err(e) => {
                self.status = e.to_string();
                self.narrator.say("Cannot open the camera.");
            }
        }
    }

    fn step_session(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        match session.step() {
            StepOutcome::Frame { frame, status } => {
                self.video = Some(frame_to_handle(&frame));
                if let Some(status) = status {
                    self.status = status;
                }
            }
            StepOutcome::Stopped(reason) => {
                self.status = match reason {
                    StopReason::Requested => String::from("Stopped."),
                    StopReason::StreamEnded => String::from("Camera stream ended."),
                    StopReason::ReadFailed(e) => format!("Camera read failed: {e}"),
                };
            }
            StepOutcome::Idle => {}
        }
    }

    // -- worker channels ----------------------------------------------------

    fn poll_detector(&mut self) {
        let Some(rx) = self.detector_rx.take() else {
            return;
        };
        loop {
            match rx.try_recv() {
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("detector setup thread exited without a result");
                    self.start_when_ready = false;
                    return;
                }
                Ok(SetupMessage::DownloadProgress(downloaded, total)) => {
                    self.status = if total > 0 {
                        format!("Downloading model... {}%", downloaded * 100 / total)
                    } else {
                        String::from("Downloading model...")
                    };
                }
                Ok(SetupMessage::Ready(detector)) => {
                    let camera = NokhwaCamera::new(self.settings.camera_index);
                    let annotator = FrameAnnotator::new(font_resolver::resolve_font());
                    let estimator = DistanceEstimator::new(
                        self.settings.focal_length_px,
                        self.settings.reference_width_m,
                    );
                    let mut session = TrackingSession::new(
                        Box::new(camera),
                        detector,
                        annotator,
                        estimator,
                    );
                    if let Some(target) = self.target.clone() {
                        session.set_target(target);
                    }
                    self.session = Some(session);
                    if self.start_when_ready {
                        self.start_when_ready = false;
                        self.start_session();
                    }
                    return;
                }
                Ok(SetupMessage::Error(e)) => {
                    self.status = format!("Detector setup failed: {e}");
                    self.start_when_ready = false;
                    return;
                }
            }
        }
        // Still downloading or building; keep polling.
        self.detector_rx = Some(rx);
    }

    fn poll_voice(&mut self) {
        let Some(rx) = self.voice_rx.take() else {
            return;
        };
        let message = match rx.try_recv() {
            Ok(message) => message,
            Err(TryRecvError::Empty) => {
                self.voice_rx = Some(rx);
                return;
            }
            Err(TryRecvError::Disconnected) => {
                log::warn!("voice worker exited without a result");
                return;
            }
        };
        // One message per listen; the worker thread has already exited.
        match message {
            VoiceMessage::Target(name) => match TargetSpec::parse(&name) {
                Some(spec) => self.apply_target(spec),
                None => {
                    self.status = PROMPT_NO_TARGET.to_string();
                    self.narrator.say(PROMPT_NO_TARGET);
                }
            },
            VoiceMessage::NoCommand(utterance) => {
                self.status = format!("Say \"track <object>\". Heard: {utterance}");
            }
            VoiceMessage::Error(e) => {
                self.status = format!("Voice capture failed: {e}");
            }
        }
    }
}

/// Convert an RGB frame into a widget handle. The GPU path wants RGBA, so
/// an opaque alpha channel is appended per pixel.
fn frame_to_handle(frame: &Frame) -> Handle {
    let rgb = frame.data();
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for px in rgb.chunks_exact(3) {
        rgba.extend_from_slice(px);
        rgba.push(255);
    }
    Handle::from_rgba(frame.width(), frame.height(), rgba)
}
