pub mod decoder;
pub mod features;
pub mod onset;
pub mod stft;
pub mod tempo;

use crate::config::AnalysisConfig;
use crate::model::{AudioSignal, TrackFeatures};

/// Compute the five per-track descriptors from a decoded signal.
///
/// Total for any decodable input: silence and too-short signals come back
/// as zeros instead of errors, and a signal with no detectable pulse gets
/// a tempo of 0.
pub fn extract(signal: &AudioSignal, config: &AnalysisConfig) -> TrackFeatures {
    let averages = features::frame_averages(signal, config.frame_size, config.hop_size);

    let envelope =
        onset::OnsetEnvelope::new(config.frame_size, config.hop_size).envelope(&signal.samples);
    let envelope_rate = signal.sample_rate as f32 / config.hop_size as f32;
    let bpm = tempo::TempoEstimator::new(config.min_bpm, config.max_bpm)
        .estimate(&envelope, envelope_rate)
        .unwrap_or(0.0);

    TrackFeatures {
        tempo_bpm: round_to(bpm as f64, 2),
        avg_rms_energy: round_to(averages.rms, 4),
        avg_spectral_centroid_hz: round_to(averages.centroid_hz, 2),
        avg_spectral_bandwidth_hz: round_to(averages.bandwidth_hz, 2),
        avg_zero_crossing_rate: round_to(averages.zcr, 4),
    }
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
