use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classify::{self, Feel};

/// Decoded mono audio, owned by the caller for the duration of analysis.
#[derive(Clone, Debug)]
pub struct AudioSignal {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioSignal {
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// The five numeric descriptors computed per track, already rounded to
/// their output precision (tempo/centroid/bandwidth to 2 decimals, energy
/// and zero-crossing rate to 4).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackFeatures {
    pub tempo_bpm: f64,
    pub avg_rms_energy: f64,
    pub avg_spectral_centroid_hz: f64,
    pub avg_spectral_bandwidth_hz: f64,
    pub avg_zero_crossing_rate: f64,
}

impl TrackFeatures {
    pub fn all_finite(&self) -> bool {
        self.tempo_bpm.is_finite()
            && self.avg_rms_energy.is_finite()
            && self.avg_spectral_centroid_hz.is_finite()
            && self.avg_spectral_bandwidth_hz.is_finite()
            && self.avg_zero_crossing_rate.is_finite()
    }
}

/// Per-file entry of the analysis report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub tempo_bpm: f64,
    pub avg_rms_energy: f64,
    pub avg_spectral_centroid_hz: f64,
    pub avg_spectral_bandwidth_hz: f64,
    pub avg_zero_crossing_rate: f64,
    pub estimated_feel: Feel,
}

impl FeatureRecord {
    /// Attach the feel label. The label is a pure function of the numeric
    /// descriptors, so building a record twice from the same features gives
    /// the same result.
    pub fn from_features(f: &TrackFeatures) -> Self {
        let estimated_feel =
            classify::estimate_feel(f.tempo_bpm, f.avg_rms_energy, f.avg_spectral_centroid_hz);
        Self {
            tempo_bpm: f.tempo_bpm,
            avg_rms_energy: f.avg_rms_energy,
            avg_spectral_centroid_hz: f.avg_spectral_centroid_hz,
            avg_spectral_bandwidth_hz: f.avg_spectral_bandwidth_hz,
            avg_zero_crossing_rate: f.avg_zero_crossing_rate,
            estimated_feel,
        }
    }
}

/// File name -> record. Rebuilt from scratch on every run.
pub type AnalysisReport = BTreeMap<String, FeatureRecord>;
