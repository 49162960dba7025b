/// A segment of captured audio: interleaved PCM samples normalized to
/// [-1.0, 1.0].
#[derive(Clone, Debug)]
pub struct AudioSegment {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioSegment {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    /// Downmix to mono by averaging interleaved channels.
    pub fn to_mono(&self) -> AudioSegment {
        if self.channels <= 1 {
            return self.clone();
        }
        let ch = self.channels as usize;
        let mono: Vec<f32> = self
            .samples
            .chunks_exact(ch)
            .map(|frame| frame.iter().sum::<f32>() / ch as f32)
            .collect();
        AudioSegment::new(mono, self.sample_rate, 1)
    }

    /// Linear-interpolation resample of a mono segment to `target_rate`.
    ///
    /// Good enough for speech recognition input; not a band-limited
    /// resampler.
    pub fn resampled(&self, target_rate: u32) -> AudioSegment {
        debug_assert_eq!(self.channels, 1, "resample expects mono audio");
        if self.sample_rate == target_rate || self.samples.is_empty() {
            return AudioSegment::new(self.samples.clone(), target_rate, 1);
        }

        let ratio = self.sample_rate as f64 / target_rate as f64;
        let out_len = (self.samples.len() as f64 / ratio).floor() as usize;
        let mut out = Vec::with_capacity(out_len);
        for i in 0..out_len {
            let pos = i as f64 * ratio;
            let idx = pos as usize;
            let frac = (pos - idx as f64) as f32;
            let a = self.samples[idx];
            let b = self.samples[(idx + 1).min(self.samples.len() - 1)];
            out.push(a + (b - a) * frac);
        }
        AudioSegment::new(out, target_rate, 1)
    }
}
