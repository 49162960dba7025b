use std::thread;

use crossbeam_channel::Receiver;

use lookout_core::audio::domain::microphone::Microphone;
use lookout_core::audio::domain::speech_recognizer::SpeechRecognizer;
use lookout_core::audio::domain::voice_command::parse_target_command;
use lookout_core::audio::infrastructure::cpal_microphone::CpalMicrophone;
use lookout_core::audio::infrastructure::whisper_recognizer::WhisperRecognizer;
use lookout_core::shared::constants::{WHISPER_MODEL_NAME, WHISPER_MODEL_URL};
use lookout_core::shared::model_resolver;

/// Outcome of one listen attempt, sent back to the UI.
#[derive(Debug, Clone)]
pub enum VoiceMessage {
    /// A "track <name>" command was recognized.
    Target(String),
    /// Speech was transcribed but carried no trigger word.
    NoCommand(String),
    /// Capture or transcription failed.
    Error(String),
}

/// Capture one utterance from the microphone and transcribe it.
///
/// One-shot: the thread exits after sending a single message. The UI holds
/// at most one receiver at a time, so a second listen cannot start while
/// this one is in flight.
pub fn spawn() -> Receiver<VoiceMessage> {
    let (tx, rx) = crossbeam_channel::bounded::<VoiceMessage>(1);

    thread::spawn(move || {
        let message = match listen() {
            Ok(message) => message,
            Err(e) => {
                log::warn!("voice capture failed: {e}");
                VoiceMessage::Error(e.to_string())
            }
        };
        let _ = tx.send(message);
    });

    rx
}

fn listen() -> Result<VoiceMessage, Box<dyn std::error::Error>> {
    let model_path = model_resolver::resolve(WHISPER_MODEL_NAME, WHISPER_MODEL_URL, None, None)?;
    let recognizer = WhisperRecognizer::new(&model_path)?;

    let mut microphone = CpalMicrophone::new();
    let audio = microphone.capture()?;
    let utterance = recognizer.transcribe(&audio)?;
    log::info!("heard: {utterance:?}");

    Ok(match parse_target_command(&utterance) {
        Some(name) => VoiceMessage::Target(name),
        None => VoiceMessage::NoCommand(utterance),
    })
}
