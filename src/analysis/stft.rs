use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Hann-windowed short-time transform shared by the spectral features and
/// the onset envelope.
pub struct Stft {
    frame_size: usize,
    hop_size: usize,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
}

impl Stft {
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(frame_size);
        let window = hann_window(frame_size);
        Self {
            frame_size,
            hop_size,
            fft,
            window,
        }
    }

    pub fn num_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Magnitude spectra of every full frame, positive half only. Signals
    /// shorter than one frame produce no frames.
    pub fn magnitudes(&self, samples: &[f32]) -> Vec<Vec<f32>> {
        let mut frames = Vec::new();
        if samples.len() < self.frame_size {
            return frames;
        }

        let mut start = 0;
        while start + self.frame_size <= samples.len() {
            let mut buffer: Vec<Complex<f32>> = samples[start..start + self.frame_size]
                .iter()
                .zip(self.window.iter())
                .map(|(s, w)| Complex::new(s * w, 0.0))
                .collect();
            self.fft.process(&mut buffer);

            let magnitudes: Vec<f32> = buffer[..self.num_bins()]
                .iter()
                .map(|c| (c.re * c.re + c.im * c.im).sqrt())
                .collect();
            frames.push(magnitudes);

            start += self.hop_size;
        }
        frames
    }
}

pub fn hann_window(len: usize) -> Vec<f32> {
    if len < 2 {
        return vec![1.0; len];
    }
    (0..len)
        .map(|i| {
            let t = i as f32 / (len - 1) as f32;
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * t).cos())
        })
        .collect()
}
