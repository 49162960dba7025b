pub mod audio_segment;
pub mod microphone;
pub mod speech_recognizer;
pub mod speech_synthesizer;
pub mod voice_command;
