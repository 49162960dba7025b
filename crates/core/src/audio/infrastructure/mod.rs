pub mod cpal_microphone;
pub mod tts_speaker;
pub mod whisper_recognizer;
