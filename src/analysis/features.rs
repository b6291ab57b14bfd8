use crate::model::AudioSignal;

use super::stft::Stft;

/// Frame-averaged descriptors, unrounded.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameAverages {
    pub rms: f64,
    pub centroid_hz: f64,
    pub bandwidth_hz: f64,
    pub zcr: f64,
}

/// Compute the mean RMS energy, spectral centroid, spectral bandwidth and
/// zero-crossing rate over fixed-size frames. Silent or too-short input
/// degrades to all zeros rather than failing.
pub fn frame_averages(signal: &AudioSignal, frame_size: usize, hop_size: usize) -> FrameAverages {
    let samples = &signal.samples;
    if samples.len() < frame_size || frame_size == 0 || hop_size == 0 {
        return FrameAverages::default();
    }

    // Time-domain descriptors per frame.
    let mut rms_sum = 0.0f64;
    let mut zcr_sum = 0.0f64;
    let mut num_frames = 0usize;
    let mut start = 0;
    while start + frame_size <= samples.len() {
        let frame = &samples[start..start + frame_size];

        let energy: f64 = frame.iter().map(|&s| (s as f64) * (s as f64)).sum();
        rms_sum += (energy / frame_size as f64).sqrt();

        let crossings = frame
            .windows(2)
            .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
            .count();
        zcr_sum += crossings as f64 / frame_size as f64;

        num_frames += 1;
        start += hop_size;
    }

    // Spectral descriptors share one windowed transform.
    let stft = Stft::new(frame_size, hop_size);
    let bin_hz = signal.sample_rate as f64 / frame_size as f64;
    let mut centroid_sum = 0.0f64;
    let mut bandwidth_sum = 0.0f64;
    let spectra = stft.magnitudes(samples);
    for magnitudes in &spectra {
        let (centroid, bandwidth) = spectral_moments(magnitudes, bin_hz);
        centroid_sum += centroid;
        bandwidth_sum += bandwidth;
    }

    let n = num_frames as f64;
    let n_spec = spectra.len().max(1) as f64;
    FrameAverages {
        rms: rms_sum / n,
        centroid_hz: centroid_sum / n_spec,
        bandwidth_hz: bandwidth_sum / n_spec,
        zcr: zcr_sum / n,
    }
}

/// Magnitude-weighted mean frequency and its spread for one spectrum. A
/// frame with no energy has an undefined centroid; both moments resolve
/// to zero there.
fn spectral_moments(magnitudes: &[f32], bin_hz: f64) -> (f64, f64) {
    let total: f64 = magnitudes.iter().map(|&m| m as f64).sum();
    if total <= 1e-10 {
        return (0.0, 0.0);
    }

    let centroid = magnitudes
        .iter()
        .enumerate()
        .map(|(i, &m)| i as f64 * bin_hz * m as f64)
        .sum::<f64>()
        / total;

    let variance = magnitudes
        .iter()
        .enumerate()
        .map(|(i, &m)| {
            let d = i as f64 * bin_hz - centroid;
            d * d * m as f64
        })
        .sum::<f64>()
        / total;

    (centroid, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, amplitude: f32, sr: u32, seconds: f32) -> AudioSignal {
        let n = (sr as f32 * seconds) as usize;
        let samples = (0..n)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin())
            .collect();
        AudioSignal {
            samples,
            sample_rate: sr,
        }
    }

    #[test]
    fn silence_degrades_to_zeros() {
        let silent = AudioSignal {
            samples: vec![0.0; 44100],
            sample_rate: 44100,
        };
        let avg = frame_averages(&silent, 2048, 512);
        assert_eq!(avg.rms, 0.0);
        assert_eq!(avg.centroid_hz, 0.0);
        assert_eq!(avg.bandwidth_hz, 0.0);
        assert_eq!(avg.zcr, 0.0);
    }

    #[test]
    fn input_shorter_than_a_frame_yields_zeros() {
        let tiny = AudioSignal {
            samples: vec![0.5; 100],
            sample_rate: 44100,
        };
        let avg = frame_averages(&tiny, 2048, 512);
        assert_eq!(avg.rms, 0.0);
        assert_eq!(avg.zcr, 0.0);
    }

    #[test]
    fn sine_rms_matches_the_closed_form() {
        let avg = frame_averages(&sine(440.0, 0.5, 44100, 1.0), 2048, 512);
        // RMS of a 0.5-amplitude sine is 0.5 / sqrt(2).
        assert!((avg.rms - 0.3535).abs() < 0.01, "rms = {}", avg.rms);
    }

    #[test]
    fn sine_centroid_sits_at_its_frequency() {
        let avg = frame_averages(&sine(440.0, 0.5, 44100, 1.0), 2048, 512);
        assert!(
            (avg.centroid_hz - 440.0).abs() < 60.0,
            "centroid = {}",
            avg.centroid_hz
        );
        // A pure tone is narrowband; the spread stays well under the
        // centroid itself.
        assert!(avg.bandwidth_hz < 300.0, "bandwidth = {}", avg.bandwidth_hz);
    }

    #[test]
    fn sine_zcr_tracks_frequency() {
        let avg = frame_averages(&sine(440.0, 0.5, 44100, 1.0), 2048, 512);
        // A sine crosses zero twice per cycle: 2 * 440 / 44100.
        let expected = 2.0 * 440.0 / 44100.0;
        assert!((avg.zcr - expected).abs() < 0.005, "zcr = {}", avg.zcr);
    }

    #[test]
    fn averages_are_always_finite() {
        let avg = frame_averages(&sine(10_000.0, 1.0, 22050, 0.5), 2048, 512);
        assert!(avg.rms.is_finite());
        assert!(avg.centroid_hz.is_finite());
        assert!(avg.bandwidth_hz.is_finite());
        assert!(avg.zcr.is_finite());
    }
}
