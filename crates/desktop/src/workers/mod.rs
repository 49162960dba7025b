pub mod detector_worker;
pub mod speech_worker;
pub mod voice_worker;
