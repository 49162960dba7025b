use super::audio_segment::AudioSegment;

/// Domain interface for speech-to-text transcription.
///
/// Produces the plain utterance text; command parsing happens separately in
/// [`voice_command`](super::voice_command).
pub trait SpeechRecognizer: Send {
    fn transcribe(&self, audio: &AudioSegment) -> Result<String, Box<dyn std::error::Error>>;
}
