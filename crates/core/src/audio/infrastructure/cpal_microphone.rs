use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::audio::domain::audio_segment::AudioSegment;
use crate::audio::domain::microphone::Microphone;

/// Longest utterance we'll record before giving up on silence detection.
const MAX_CAPTURE: Duration = Duration::from_secs(6);

/// Recording stops once this much trailing silence follows speech.
const SILENCE_TAIL: Duration = Duration::from_millis(900);

/// RMS level below which a chunk counts as silence.
const SILENCE_THRESHOLD: f32 = 0.01;

/// Microphone capture via the system's default input device.
///
/// Records until trailing silence after speech, bounded by [`MAX_CAPTURE`].
/// The blocking happens here, which is why voice capture always runs on a
/// worker thread.
pub struct CpalMicrophone;

impl CpalMicrophone {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpalMicrophone {
    fn default() -> Self {
        Self::new()
    }
}

impl Microphone for CpalMicrophone {
    fn capture(&mut self) -> Result<AudioSegment, Box<dyn std::error::Error>> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or("no default input device")?;
        let config = device.default_input_config()?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        let (tx, rx) = crossbeam_channel::unbounded::<Vec<f32>>();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &config.into(),
                move |data: &[f32], _| {
                    let _ = tx.send(data.to_vec());
                },
                stream_error,
                None,
            )?,
            cpal::SampleFormat::I16 => device.build_input_stream(
                &config.into(),
                move |data: &[i16], _| {
                    let _ = tx.send(data.iter().map(|&s| s as f32 / i16::MAX as f32).collect());
                },
                stream_error,
                None,
            )?,
            cpal::SampleFormat::U16 => device.build_input_stream(
                &config.into(),
                move |data: &[u16], _| {
                    let _ = tx.send(
                        data.iter()
                            .map(|&s| (s as f32 - 32768.0) / 32768.0)
                            .collect(),
                    );
                },
                stream_error,
                None,
            )?,
            other => return Err(format!("unsupported input sample format: {other:?}").into()),
        };
        stream.play()?;
        log::info!("listening ({sample_rate} Hz, {channels} ch)");

        let start = Instant::now();
        let mut last_voice = start;
        let mut heard_speech = false;
        let mut samples: Vec<f32> = Vec::new();

        while start.elapsed() < MAX_CAPTURE {
            match rx.recv_timeout(Duration::from_millis(100)) {
                Ok(chunk) => {
                    if rms(&chunk) > SILENCE_THRESHOLD {
                        last_voice = Instant::now();
                        heard_speech = true;
                    }
                    samples.extend(chunk);
                }
                Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
            }
            if heard_speech && last_voice.elapsed() > SILENCE_TAIL {
                break;
            }
        }
        drop(stream);

        if samples.is_empty() {
            return Err("no audio captured from microphone".into());
        }
        log::debug!("captured {} samples", samples.len());
        Ok(AudioSegment::new(samples, sample_rate, channels))
    }
}

fn stream_error(e: cpal::StreamError) {
    log::warn!("microphone stream error: {e}");
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rms_of_silence_is_zero() {
        assert_relative_eq!(rms(&[0.0; 128]), 0.0);
    }

    #[test]
    fn test_rms_of_constant_signal() {
        assert_relative_eq!(rms(&[0.5; 64]), 0.5);
    }

    #[test]
    fn test_rms_of_empty_slice() {
        assert_relative_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_silence_threshold_separates_speech_from_noise_floor() {
        let quiet = vec![0.001f32; 256];
        let spoken = vec![0.2f32; 256];
        assert!(rms(&quiet) < SILENCE_THRESHOLD);
        assert!(rms(&spoken) > SILENCE_THRESHOLD);
    }
}
