use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::warn;
use rubato::{FftFixedIn, Resampler};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::model::AudioSignal;

const RESAMPLE_CHUNK: usize = 1024;

/// Decode an audio file to mono f32 samples, optionally resampling to
/// `target_sr`. Multi-channel input is averaged down to one channel.
///
/// Corrupt packets inside an otherwise decodable stream are skipped with a
/// warning; a file that yields no samples at all is an error.
pub fn decode_to_mono(path: &Path, target_sr: Option<u32>) -> Result<AudioSignal> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("unrecognized container format")?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("no decodable audio track")?;
    let track_id = track.id;
    let source_sr = track
        .codec_params
        .sample_rate
        .context("track is missing a sample rate")?;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("unsupported codec")?;

    let mut mono: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // Clean end of stream; a truncated final packet surfaces the
            // same way and the frames read so far are kept.
            Err(SymphoniaError::IoError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err).context("failed to read packet"),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let channels = spec.channels.count().max(1);
                let buf = sample_buf
                    .get_or_insert_with(|| SampleBuffer::new(decoded.capacity() as u64, spec));
                buf.copy_interleaved_ref(decoded);
                for frame in buf.samples().chunks(channels) {
                    mono.push(frame.iter().sum::<f32>() / channels as f32);
                }
            }
            // A damaged packet in a lossy stream; the decoder resyncs on
            // the next one.
            Err(SymphoniaError::DecodeError(err)) => {
                warn!("skipping corrupt packet in {}: {err}", path.display());
            }
            Err(err) => return Err(err).context("fatal decoder error"),
        }
    }

    if mono.is_empty() {
        bail!("no audio samples decoded");
    }

    match target_sr {
        Some(target) if target != source_sr => Ok(AudioSignal {
            samples: resample(&mono, source_sr, target)?,
            sample_rate: target,
        }),
        _ => Ok(AudioSignal {
            samples: mono,
            sample_rate: source_sr,
        }),
    }
}

/// Resample a single channel with a fixed-input-size FFT resampler. The
/// final partial chunk is zero-padded, so output may carry up to one
/// chunk of trailing silence.
fn resample(samples: &[f32], source_sr: u32, target_sr: u32) -> Result<Vec<f32>> {
    let mut resampler = FftFixedIn::<f32>::new(
        source_sr as usize,
        target_sr as usize,
        RESAMPLE_CHUNK,
        1,
        1,
    )
    .context("failed to initialize resampler")?;

    let mut output = vec![vec![0.0f32; resampler.output_frames_max()]];
    let mut resampled = Vec::new();
    for chunk in samples.chunks(RESAMPLE_CHUNK) {
        let mut input = chunk.to_vec();
        input.resize(RESAMPLE_CHUNK, 0.0);
        let (_, written) = resampler
            .process_into_buffer(&[input], &mut output, None)
            .context("resampling failed")?;
        resampled.extend_from_slice(&output[0][..written]);
    }
    Ok(resampled)
}
