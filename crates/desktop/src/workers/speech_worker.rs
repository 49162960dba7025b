use std::thread;

use chrono::Timelike;
use crossbeam_channel::Sender;

use lookout_core::audio::domain::speech_synthesizer::SpeechSynthesizer;
use lookout_core::audio::infrastructure::tts_speaker::TtsSpeaker;

/// Handle to the narration thread. Cloneable; dropping every handle closes
/// the channel and the thread exits.
#[derive(Clone)]
pub struct Narrator {
    tx: Sender<String>,
}

impl Narrator {
    /// Start the narration thread. The speech engine lives entirely on that
    /// thread; if it fails to initialize, lines are logged instead of spoken
    /// and the app keeps working.
    pub fn spawn() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded::<String>();

        thread::spawn(move || match TtsSpeaker::new() {
            Ok(mut speaker) => {
                for line in rx {
                    if let Err(e) = speaker.say(&line) {
                        log::warn!("speech synthesis failed: {e}");
                    }
                }
            }
            Err(e) => {
                log::warn!("speech synthesis unavailable: {e}");
                for line in rx {
                    log::debug!("unspoken status: {line}");
                }
            }
        });

        Self { tx }
    }

    /// Queue a line for narration. Never blocks the UI thread.
    pub fn say(&self, line: impl Into<String>) {
        let _ = self.tx.send(line.into());
    }
}

/// Time-of-day greeting spoken at startup.
pub fn greeting() -> String {
    greeting_for_hour(chrono::Local::now().hour())
}

fn greeting_for_hour(hour: u32) -> String {
    let salutation = if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    };
    format!("{salutation}. Lookout is ready.")
}
