use std::thread;

use crossbeam_channel::Receiver;

use lookout_core::detection::domain::object_detector::ObjectDetector;
use lookout_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use lookout_core::shared::constants::{YOLO_MODEL_NAME, YOLO_MODEL_URL};
use lookout_core::shared::model_resolver;

/// Messages sent from the detector setup thread to the UI.
pub enum SetupMessage {
    DownloadProgress(u64, u64),
    Ready(Box<dyn ObjectDetector>),
    Error(String),
}

/// Resolve the detection model and build a detector off the UI thread.
///
/// Model download and ONNX session construction can each take seconds, so
/// both happen here. The finished detector travels back over the channel.
pub fn spawn(confidence: f64) -> Receiver<SetupMessage> {
    let (tx, rx) = crossbeam_channel::unbounded::<SetupMessage>();

    thread::spawn(move || {
        let tx_dl = tx.clone();
        let result = model_resolver::resolve(
            YOLO_MODEL_NAME,
            YOLO_MODEL_URL,
            None,
            Some(Box::new(move |downloaded, total| {
                let _ = tx_dl.send(SetupMessage::DownloadProgress(downloaded, total));
            })),
        )
        .map_err(|e| e.to_string())
        .and_then(|path| {
            OnnxYoloDetector::new(&path, confidence)
                .map(|d| Box::new(d) as Box<dyn ObjectDetector>)
                .map_err(|e| e.to_string())
        });

        let _ = tx.send(match result {
            Ok(detector) => SetupMessage::Ready(detector),
            Err(e) => {
                log::error!("detector setup failed: {e}");
                SetupMessage::Error(e)
            }
        });
    });

    rx
}
