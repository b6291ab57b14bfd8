use super::stft::Stft;

/// Spectral-flux onset envelope.
///
/// Each envelope sample is the median positive log-magnitude difference
/// between consecutive spectra. The median aggregation keeps isolated bin
/// jitter from registering as an onset.
pub struct OnsetEnvelope {
    stft: Stft,
}

impl OnsetEnvelope {
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        Self {
            stft: Stft::new(frame_size, hop_size),
        }
    }

    pub fn envelope(&self, samples: &[f32]) -> Vec<f32> {
        let spectra = self.stft.magnitudes(samples);
        let mut envelope = Vec::with_capacity(spectra.len());
        let mut prev = vec![0.0f32; self.stft.num_bins()];

        for magnitudes in spectra {
            // Log compression, then half-wave rectified flux.
            let mut flux: Vec<f32> = magnitudes
                .iter()
                .zip(prev.iter())
                .map(|(cur, old)| {
                    let log_cur = (cur + 1e-10_f32).ln();
                    let log_old = (old + 1e-10_f32).ln();
                    (log_cur - log_old).max(0.0)
                })
                .collect();

            flux.sort_by(|a, b| a.total_cmp(b));
            envelope.push(flux[flux.len() / 2]);

            prev = magnitudes;
        }
        envelope
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_produces_a_flat_envelope() {
        let env = OnsetEnvelope::new(1024, 256).envelope(&vec![0.0; 8192]);
        assert!(!env.is_empty());
        assert!(env.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn a_burst_after_silence_registers_as_an_onset() {
        let sr = 44100usize;
        let mut samples = vec![0.0f32; sr];
        for (i, s) in samples[sr / 2..].iter_mut().enumerate() {
            *s = 0.8 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / sr as f32).sin();
        }
        let env = OnsetEnvelope::new(2048, 512).envelope(&samples);

        let peak_idx = env
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        // The burst starts half-way through (frame ~43 at hop 512). The
        // flux spikes on the first frame whose window touches the burst,
        // which can lead the burst-start frame by up to frame/hop frames.
        let onset_frame = (sr / 2) / 512;
        assert!(
            (onset_frame.saturating_sub(4)..=onset_frame + 1).contains(&peak_idx),
            "peak at frame {peak_idx}, onset at {onset_frame}"
        );
    }
}
