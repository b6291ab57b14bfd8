use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;

use trackfeel::{
    batch, normalize, AnalysisConfig, AnalysisError, AnalysisReport, BatchConfig, NormalizeConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Batch loudness normalization and feel analysis for MP3 tracks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract features and feel labels from normalized tracks
    Analyze {
        /// Directory of normalized MP3 files
        #[arg(default_value = "normalized")]
        input_dir: PathBuf,
        /// Where to write the JSON report
        #[arg(long, default_value = "audio_analysis.json")]
        output: PathBuf,
        #[arg(long, default_value_t = 60.0)]
        min_bpm: f32,
        #[arg(long, default_value_t = 180.0)]
        max_bpm: f32,
        /// Resample to this rate before analysis (defaults to native rate)
        #[arg(long)]
        resample: Option<u32>,
    },
    /// Loudness-normalize MP3s into a directory via ffmpeg
    Normalize {
        /// Directory of source MP3 files
        #[arg(default_value = ".")]
        input_dir: PathBuf,
        #[arg(long, default_value = "normalized")]
        output_dir: PathBuf,
        /// Integrated loudness target in LUFS
        #[arg(long, default_value_t = -14.0, allow_hyphen_values = true)]
        target_lufs: f32,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze {
            input_dir,
            output,
            min_bpm,
            max_bpm,
            resample,
        } => {
            let config = BatchConfig {
                input_dir,
                output_path: output,
                analysis: AnalysisConfig {
                    min_bpm,
                    max_bpm,
                    target_sr: resample,
                    ..AnalysisConfig::default()
                },
            };
            match batch::run_batch(&config) {
                Ok(outcome) => {
                    print_summary(&outcome.report);
                    if !outcome.failures.is_empty() {
                        eprintln!("\n{} file(s) could not be analyzed:", outcome.failures.len());
                        for failure in &outcome.failures {
                            eprintln!("  {failure}");
                        }
                    }
                    println!(
                        "\nAnalysis complete. Results saved to {}",
                        config.output_path.display()
                    );
                    Ok(())
                }
                // No inputs is a user-facing message, not a crash.
                Err(err @ AnalysisError::InputMissing(_)) => {
                    eprintln!("{err}. Run the normalize step first.");
                    Ok(())
                }
                Err(err @ AnalysisError::NoInputFiles(_)) => {
                    eprintln!("{err}");
                    Ok(())
                }
                Err(err) => Err(err.into()),
            }
        }
        Command::Normalize {
            input_dir,
            output_dir,
            target_lufs,
        } => {
            let config = NormalizeConfig {
                input_dir,
                output_dir,
                target_lufs,
            };
            match normalize::run_batch(&config) {
                Ok(count) => {
                    println!(
                        "Normalized {count} file(s) into {}",
                        config.output_dir.display()
                    );
                    Ok(())
                }
                // Same user-facing treatment as the analyze step.
                Err(err) if err.is_missing_input() => {
                    eprintln!("{err}");
                    Ok(())
                }
                Err(err) => Err(err.into()),
            }
        }
    }
}

fn print_summary(report: &AnalysisReport) {
    println!("\n--- Audio Analysis Summary ---");
    println!(
        "{:<45} | {:<20} | {:<8} | {:<8} | {:<18}",
        "Filename", "Est. Feel", "BPM", "Energy", "Brightness (Hz)"
    );
    println!("{}", "-".repeat(120));

    for (name, record) in batch::sorted_by_tempo(report) {
        println!(
            "{:<45} | {:<20} | {:<8.2} | {:<8.4} | {:<18.2}",
            name,
            record.estimated_feel.to_string(),
            record.tempo_bpm,
            record.avg_rms_energy,
            record.avg_spectral_centroid_hz
        );
    }
}
