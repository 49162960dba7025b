use tts::Tts;

use crate::audio::domain::speech_synthesizer::SpeechSynthesizer;

/// Speech synthesis through the platform's native engine
/// (Speech Dispatcher / AVSpeechSynthesizer / SAPI) via the `tts` crate.
pub struct TtsSpeaker {
    engine: Tts,
}

impl TtsSpeaker {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let engine = Tts::default()?;
        Ok(Self { engine })
    }
}

impl SpeechSynthesizer for TtsSpeaker {
    fn say(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        log::debug!("speaking: {text}");
        // Queue behind any utterance still playing rather than cutting it off
        self.engine.speak(text, false)?;
        Ok(())
    }
}
