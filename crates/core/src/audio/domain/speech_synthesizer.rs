/// Domain interface for text-to-speech narration.
///
/// Fire-and-forget: callers don't consume a result beyond the error, and a
/// synthesis failure is never fatal to the application.
pub trait SpeechSynthesizer: Send {
    fn say(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error>>;
}
