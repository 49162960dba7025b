use super::audio_segment::AudioSegment;

/// Domain interface for capturing one utterance from a microphone.
///
/// `capture` blocks until audio is recorded or a timeout/device error
/// occurs; callers run it on a background thread, never on the UI thread.
pub trait Microphone: Send {
    fn capture(&mut self) -> Result<AudioSegment, Box<dyn std::error::Error>>;
}
