pub const YOLO_MODEL_NAME: &str = "yolov8s.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/lookout-app/lookout/releases/download/v0.1.0/yolov8s.onnx";

pub const WHISPER_MODEL_NAME: &str = "ggml-tiny.en.bin";
pub const WHISPER_MODEL_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-tiny.en.bin";

pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Leading word a voice utterance must start with to set a new target.
pub const TRIGGER_WORD: &str = "track";

/// Approximate webcam focal length in pixels. Rough calibration, not measured.
pub const FOCAL_LENGTH_PX: f64 = 500.0;

/// Assumed real-world width of a tracked object, in meters.
pub const REFERENCE_WIDTH_M: f64 = 0.2;
