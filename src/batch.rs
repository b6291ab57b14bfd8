use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::prelude::*;

use crate::config::BatchConfig;
use crate::error::AnalysisError;
use crate::model::{AnalysisReport, FeatureRecord};

/// What a batch run produced: the persisted report plus the per-file
/// errors that were skipped along the way.
#[derive(Debug)]
pub struct BatchOutcome {
    pub report: AnalysisReport,
    pub failures: Vec<AnalysisError>,
}

/// MP3 files directly inside `dir`, sorted by path. Non-recursive, and the
/// extension match is case-insensitive.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    if !dir.is_dir() {
        return Err(AnalysisError::InputMissing(dir.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("mp3"))
        })
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(AnalysisError::NoInputFiles(dir.to_path_buf()));
    }
    Ok(files)
}

/// Analyze every MP3 in the input directory and persist the JSON report.
///
/// Files are analyzed in parallel; each yields either a record or a
/// per-file error. Failures are collected and skipped, never aborting the
/// batch. Discovery and persistence errors are terminal.
pub fn run_batch(config: &BatchConfig) -> Result<BatchOutcome, AnalysisError> {
    let inputs = discover_inputs(&config.input_dir)?;
    info!(
        "found {} MP3 files to analyze in {}",
        inputs.len(),
        config.input_dir.display()
    );

    let results: Vec<(String, Result<FeatureRecord, AnalysisError>)> = inputs
        .par_iter()
        .map(|path| {
            let name = file_name(path);
            info!("analyzing {name}");
            let result = crate::analyze_track(path, &config.analysis);
            (name, result)
        })
        .collect();

    let mut report = AnalysisReport::new();
    let mut failures = Vec::new();
    for (name, result) in results {
        match result {
            Ok(record) => {
                report.insert(name, record);
            }
            Err(err) => {
                warn!("skipping {name}: {err}");
                failures.push(err);
            }
        }
    }

    persist(&report, &config.output_path)?;
    info!("report saved to {}", config.output_path.display());

    Ok(BatchOutcome { report, failures })
}

/// Write the report as pretty-printed JSON. The report is the run's sole
/// durable output, so a write failure is fatal.
pub fn persist(report: &AnalysisReport, path: &Path) -> Result<(), AnalysisError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|err| AnalysisError::Persist {
            path: path.to_path_buf(),
            source: std::io::Error::other(err),
        })?;
    fs::write(path, json).map_err(|source| AnalysisError::Persist {
        path: path.to_path_buf(),
        source,
    })
}

/// Rows for the console summary, sorted by tempo descending.
pub fn sorted_by_tempo(report: &AnalysisReport) -> Vec<(&str, &FeatureRecord)> {
    let mut rows: Vec<(&str, &FeatureRecord)> =
        report.iter().map(|(name, rec)| (name.as_str(), rec)).collect();
    rows.sort_by(|a, b| {
        b.1.tempo_bpm
            .partial_cmp(&a.1.tempo_bpm)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::classify::Feel;
    use crate::model::TrackFeatures;

    fn record(bpm: f64) -> FeatureRecord {
        FeatureRecord::from_features(&TrackFeatures {
            tempo_bpm: bpm,
            avg_rms_energy: 0.15,
            avg_spectral_centroid_hz: 2000.0,
            avg_spectral_bandwidth_hz: 1500.0,
            avg_zero_crossing_rate: 0.05,
        })
    }

    #[test]
    fn missing_directory_is_input_missing() {
        let err = discover_inputs(Path::new("/no/such/dir")).unwrap_err();
        assert!(matches!(err, AnalysisError::InputMissing(_)));
    }

    #[test]
    fn directory_without_mp3s_is_no_input_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let err = discover_inputs(dir.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::NoInputFiles(_)));
    }

    #[test]
    fn discovery_filters_by_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), "x").unwrap();
        fs::write(dir.path().join("B.MP3"), "x").unwrap();
        fs::write(dir.path().join("c.wav"), "x").unwrap();
        fs::write(dir.path().join("readme.md"), "x").unwrap();

        let found = discover_inputs(dir.path()).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .unwrap()
                .eq_ignore_ascii_case("mp3")
        }));
    }

    /// Decodable audio wearing an .mp3 name: discovery only checks the
    /// extension and the decoder probes by content.
    fn write_decodable(path: &Path) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for i in 0..22050 {
            let s = 0.5 * (2.0 * std::f32::consts::PI * 440.0 * i as f32 / 44100.0).sin();
            writer.write_sample((s * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn one_corrupt_file_among_valid_ones_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_decodable(&dir.path().join("good.mp3"));
        fs::write(dir.path().join("bad.mp3"), b"not really audio").unwrap();

        let config = BatchConfig {
            input_dir: dir.path().to_path_buf(),
            output_path: dir.path().join("report.json"),
            analysis: AnalysisConfig::default(),
        };
        let outcome = run_batch(&config).unwrap();

        assert_eq!(outcome.report.len(), 1);
        assert!(outcome.report.contains_key("good.mp3"));
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].is_per_file());

        let written: AnalysisReport = serde_json::from_str(
            &fs::read_to_string(dir.path().join("report.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written.keys().collect::<Vec<_>>(), vec!["good.mp3"]);
    }

    #[test]
    fn undecodable_files_are_recorded_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad1.mp3"), b"not really audio").unwrap();
        fs::write(dir.path().join("bad2.mp3"), b"me neither").unwrap();

        let config = BatchConfig {
            input_dir: dir.path().to_path_buf(),
            output_path: dir.path().join("report.json"),
            analysis: AnalysisConfig::default(),
        };
        let outcome = run_batch(&config).unwrap();

        assert!(outcome.report.is_empty());
        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome.failures.iter().all(|e| e.is_per_file()));
        // The (empty) report is still persisted.
        let written = fs::read_to_string(dir.path().join("report.json")).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&written).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn persist_writes_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut report = AnalysisReport::new();
        report.insert("a.mp3".into(), record(128.0));
        persist(&report, &path).unwrap();

        let back: AnalysisReport =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back["a.mp3"].estimated_feel, Feel::UpbeatDriving);
    }

    #[test]
    fn persist_to_a_bad_path_is_fatal() {
        let mut report = AnalysisReport::new();
        report.insert("a.mp3".into(), record(100.0));
        let err = persist(&report, Path::new("/no/such/dir/report.json")).unwrap_err();
        assert!(matches!(err, AnalysisError::Persist { .. }));
    }

    #[test]
    fn summary_rows_sort_by_tempo_descending() {
        let mut report = AnalysisReport::new();
        report.insert("slow.mp3".into(), record(80.0));
        report.insert("fast.mp3".into(), record(160.0));
        report.insert("mid.mp3".into(), record(110.0));

        let rows = sorted_by_tempo(&report);
        let names: Vec<&str> = rows.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["fast.mp3", "mid.mp3", "slow.mp3"]);
    }
}
