//! Batch loudness normalization and musical feature analysis for MP3
//! libraries.
//!
//! The analysis stage decodes each track to mono samples, computes tempo,
//! RMS energy, spectral centroid, spectral bandwidth and zero-crossing
//! rate, classifies a heuristic "feel" label, and aggregates everything
//! into a JSON report keyed by file name.

pub mod analysis;
pub mod batch;
pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;

pub use batch::{run_batch, BatchOutcome};
pub use classify::{estimate_feel, Feel};
pub use config::{AnalysisConfig, BatchConfig, NormalizeConfig};
pub use error::AnalysisError;
pub use model::{AnalysisReport, AudioSignal, FeatureRecord, TrackFeatures};

use std::path::Path;

/// Analyze a single audio file: decode, extract the five descriptors and
/// attach the feel label.
pub fn analyze_track(
    path: &Path,
    config: &AnalysisConfig,
) -> Result<FeatureRecord, AnalysisError> {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let signal = analysis::decoder::decode_to_mono(path, config.target_sr).map_err(|err| {
        AnalysisError::Decode {
            file: file.clone(),
            reason: format!("{err:#}"),
        }
    })?;

    let features = analysis::extract(&signal, config);
    if !features.all_finite() {
        return Err(AnalysisError::Feature {
            file,
            reason: "non-finite descriptor".to_string(),
        });
    }
    Ok(FeatureRecord::from_features(&features))
}
