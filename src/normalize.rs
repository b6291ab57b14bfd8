use std::fs;
use std::io;
use std::process::Command;

use log::{info, warn};

use crate::batch::discover_inputs;
use crate::config::NormalizeConfig;
use crate::error::AnalysisError;

/// Loudness-normalize every MP3 in the input directory into the output
/// directory by delegating to ffmpeg's loudnorm filter, re-encoding with
/// libmp3lame.
///
/// Per-file ffmpeg failures are logged and skipped; a missing ffmpeg
/// binary is terminal. Returns the number of files written.
pub fn run_batch(config: &NormalizeConfig) -> Result<usize, AnalysisError> {
    let inputs = discover_inputs(&config.input_dir)?;
    fs::create_dir_all(&config.output_dir)?;
    info!(
        "found {} MP3 files to normalize in {}",
        inputs.len(),
        config.input_dir.display()
    );

    let mut normalized = 0;
    for input in &inputs {
        let Some(name) = input.file_name() else {
            continue;
        };
        let output = config.output_dir.join(name);
        info!("normalizing {}", name.to_string_lossy());

        let status = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .arg(input)
            .arg("-af")
            .arg(format!(
                "loudnorm=I={}:TP=-1.5:LRA=11",
                config.target_lufs
            ))
            .args(["-codec:a", "libmp3lame", "-q:a", "2"])
            .arg(&output)
            .status();

        match status {
            Ok(code) if code.success() => normalized += 1,
            Ok(code) => warn!(
                "ffmpeg exited with {code} for {}, skipping",
                name.to_string_lossy()
            ),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(AnalysisError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    "ffmpeg not found on PATH; install ffmpeg to normalize audio",
                )));
            }
            Err(err) => warn!(
                "failed to run ffmpeg for {}: {err}",
                name.to_string_lossy()
            ),
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn missing_input_directory_is_terminal() {
        let config = NormalizeConfig {
            input_dir: PathBuf::from("/no/such/dir"),
            ..NormalizeConfig::default()
        };
        let err = run_batch(&config).unwrap_err();
        assert!(matches!(err, AnalysisError::InputMissing(_)));
    }

    #[test]
    fn defaults_target_streaming_loudness() {
        let config = NormalizeConfig::default();
        assert_eq!(config.target_lufs, -14.0);
        assert_eq!(config.output_dir, PathBuf::from("normalized"));
    }
}
