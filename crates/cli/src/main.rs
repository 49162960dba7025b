use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use lookout_core::annotate::distance::DistanceEstimator;
use lookout_core::annotate::font_resolver::resolve_font;
use lookout_core::annotate::frame_annotator::FrameAnnotator;
use lookout_core::audio::domain::microphone::Microphone;
use lookout_core::audio::domain::speech_recognizer::SpeechRecognizer;
use lookout_core::audio::domain::voice_command::parse_target_command;
use lookout_core::audio::infrastructure::cpal_microphone::CpalMicrophone;
use lookout_core::audio::infrastructure::whisper_recognizer::WhisperRecognizer;
use lookout_core::camera::infrastructure::nokhwa_camera::{list_cameras, NokhwaCamera};
use lookout_core::detection::domain::target::TargetSpec;
use lookout_core::detection::infrastructure::onnx_yolo_detector::{
    OnnxYoloDetector, DEFAULT_CONFIDENCE,
};
use lookout_core::session::tracking_session::{StepOutcome, StopReason, TrackingSession};
use lookout_core::shared::constants::{
    WHISPER_MODEL_NAME, WHISPER_MODEL_URL, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use lookout_core::shared::model_resolver;

/// Webcam object spotting with distance estimation.
#[derive(Parser)]
#[command(name = "lookout")]
struct Cli {
    /// Object class to highlight (a COCO class name, e.g. "bottle").
    target: Option<String>,

    /// Camera index.
    #[arg(long, default_value = "0")]
    camera: u32,

    /// Detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Path to a YOLOv8 ONNX model (skips the cache/download lookup).
    #[arg(long)]
    model: Option<PathBuf>,

    /// Stop after this many frames (0 = run until the stream ends).
    #[arg(long, default_value = "0")]
    frames: u64,

    /// Write the last processed frame to this PNG path on exit.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Pick the target by voice ("track <name>") before starting.
    #[arg(long)]
    listen: bool,

    /// List attached cameras and exit.
    #[arg(long)]
    list_cameras: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.list_cameras {
        for (index, name) in list_cameras()? {
            println!("{index:>3}  {name}");
        }
        return Ok(());
    }

    let target = pick_target(&cli)?;

    let model_path = match &cli.model {
        Some(path) => path.clone(),
        None => model_resolver::resolve(
            YOLO_MODEL_NAME,
            YOLO_MODEL_URL,
            None,
            Some(Box::new(download_progress)),
        )?,
    };
    let detector = OnnxYoloDetector::new(&model_path, cli.confidence)?;

    let mut session = TrackingSession::new(
        Box::new(NokhwaCamera::new(cli.camera)),
        Box::new(detector),
        FrameAnnotator::new(resolve_font()),
        DistanceEstimator::default(),
    );
    if let Some(target) = target {
        println!("Tracking \"{target}\"");
        session.set_target(target);
    } else {
        log::info!("no target set; rendering raw frames");
    }

    let format = session.start()?;
    log::info!("capture running at {}x{}", format.width, format.height);

    let mut processed: u64 = 0;
    let mut last_frame = None;
    loop {
        match session.step() {
            StepOutcome::Frame { frame, status } => {
                if let Some(status) = status {
                    println!("{status}");
                }
                last_frame = Some(frame);
                processed += 1;
                if cli.frames > 0 && processed >= cli.frames {
                    session.stop();
                }
            }
            StepOutcome::Stopped(StopReason::Requested) => break,
            StepOutcome::Stopped(StopReason::StreamEnded) => {
                println!("Camera stream ended after {processed} frames");
                break;
            }
            StepOutcome::Stopped(StopReason::ReadFailed(e)) => {
                eprintln!("Frame read failed: {e}");
                break;
            }
            StepOutcome::Idle => break,
        }
    }

    if let (Some(path), Some(frame)) = (&cli.snapshot, &last_frame) {
        frame.to_rgb_image().save(path)?;
        println!("Snapshot written to {}", path.display());
    }

    Ok(())
}

/// Resolve the target from the positional argument or a voice capture.
/// A blank typed name is rejected up front rather than starting the camera.
fn pick_target(cli: &Cli) -> Result<Option<TargetSpec>, Box<dyn std::error::Error>> {
    if cli.listen {
        return listen_for_target().map(Some);
    }
    match &cli.target {
        Some(input) => match TargetSpec::parse(input) {
            Some(spec) => Ok(Some(spec)),
            None => Err("target name is empty; pass a class name like \"bottle\"".into()),
        },
        None => Ok(None),
    }
}

fn listen_for_target() -> Result<TargetSpec, Box<dyn std::error::Error>> {
    let model_path = model_resolver::resolve(
        WHISPER_MODEL_NAME,
        WHISPER_MODEL_URL,
        None,
        Some(Box::new(download_progress)),
    )?;
    let recognizer = WhisperRecognizer::new(&model_path)?;
    let mut microphone = CpalMicrophone::new();

    println!("Say \"track <object>\":");
    let audio = microphone.capture()?;
    let utterance = recognizer.transcribe(&audio)?;
    log::info!("heard: {utterance}");

    let name = parse_target_command(&utterance)
        .ok_or_else(|| format!("no \"track <object>\" command in: \"{utterance}\""))?;
    TargetSpec::parse(&name).ok_or_else(|| "empty target name in voice command".into())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        eprint!("\rdownloading model: {:>3}%", downloaded * 100 / total);
        if downloaded >= total {
            eprintln!();
        }
        let _ = std::io::stderr().flush();
    }
}
