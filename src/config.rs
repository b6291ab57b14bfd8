use std::path::PathBuf;

/// Per-track analysis parameters.
///
/// Frame and hop sizes drive both the short-time spectral features and the
/// onset envelope used for tempo estimation. The defaults match conventional
/// analysis settings (2048-sample frames, 512-sample hop).
#[derive(Clone, Debug)]
pub struct AnalysisConfig {
    pub frame_size: usize,
    pub hop_size: usize,
    pub min_bpm: f32,
    pub max_bpm: f32,
    /// Resample to this rate before analysis; `None` keeps the native rate.
    pub target_sr: Option<u32>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            hop_size: 512,
            min_bpm: 60.0,
            max_bpm: 180.0,
            target_sr: None,
        }
    }
}

/// A full batch run: where to find normalized MP3s and where the JSON
/// report goes.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    pub analysis: AnalysisConfig,
}

/// Parameters for the loudness-normalization pass.
#[derive(Clone, Debug)]
pub struct NormalizeConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Integrated loudness target in LUFS.
    pub target_lufs: f32,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("normalized"),
            target_lufs: -14.0,
        }
    }
}
