use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("input directory {0:?} does not exist")]
    InputMissing(PathBuf),
    #[error("no MP3 files found in {0:?}")]
    NoInputFiles(PathBuf),
    #[error("failed to decode {file}: {reason}")]
    Decode { file: String, reason: String },
    #[error("feature extraction failed for {file}: {reason}")]
    Feature { file: String, reason: String },
    #[error("failed to write report to {path:?}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Per-file errors are skipped by the batch driver; everything else
    /// terminates the run.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            AnalysisError::Decode { .. } | AnalysisError::Feature { .. }
        )
    }

    /// Missing or empty input directories are user-facing conditions, not
    /// crashes; binaries report them and exit cleanly.
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            AnalysisError::InputMissing(_) | AnalysisError::NoInputFiles(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_covers_both_discovery_errors() {
        assert!(AnalysisError::InputMissing(PathBuf::from("x")).is_missing_input());
        assert!(AnalysisError::NoInputFiles(PathBuf::from("x")).is_missing_input());
        assert!(!AnalysisError::Decode {
            file: "a.mp3".into(),
            reason: "bad".into()
        }
        .is_missing_input());
    }

    #[test]
    fn per_file_errors_are_exactly_decode_and_feature() {
        assert!(AnalysisError::Decode {
            file: "a.mp3".into(),
            reason: "bad".into()
        }
        .is_per_file());
        assert!(AnalysisError::Feature {
            file: "a.mp3".into(),
            reason: "nan".into()
        }
        .is_per_file());
        assert!(!AnalysisError::InputMissing(PathBuf::from("x")).is_per_file());
    }
}
