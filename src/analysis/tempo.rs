use num_complex::Complex;
use rustfft::FftPlanner;

/// Autocorrelation-based tempo estimator working on an onset envelope.
///
/// The envelope is swept with a ~3 second analysis window; each window is
/// autocorrelated (Wiener-Khinchin, via FFT) and the strongest lag inside
/// the configured BPM range becomes one tempo vote. The reported tempo is
/// the median of all votes, which rides out windows that lock onto a
/// half- or double-time pulse.
pub struct TempoEstimator {
    min_bpm: f32,
    max_bpm: f32,
}

/// Windows whose best peak falls below this are treated as pulse-free.
const MIN_PEAK_STRENGTH: f32 = 0.1;

impl TempoEstimator {
    pub fn new(min_bpm: f32, max_bpm: f32) -> Self {
        Self { min_bpm, max_bpm }
    }

    /// Dominant tempo of the envelope, or `None` when no window contains a
    /// usable pulse (silence, noise, or an envelope shorter than half a
    /// window).
    pub fn estimate(&self, envelope: &[f32], envelope_rate: f32) -> Option<f32> {
        if envelope.is_empty() || envelope_rate <= 0.0 {
            return None;
        }

        let window_size = (3.0 * envelope_rate) as usize;
        let sweep_hop = ((envelope_rate as usize) / 2).max(1);
        let mut votes = Vec::new();

        for window_start in (0..envelope.len()).step_by(sweep_hop) {
            let window_end = (window_start + window_size).min(envelope.len());
            if window_end - window_start < window_size / 2 {
                break;
            }
            let acf = autocorrelate(&envelope[window_start..window_end]);
            if let Some(bpm) = self.pick_tempo(&acf, envelope_rate) {
                votes.push(bpm);
            }
        }

        if votes.is_empty() {
            return None;
        }
        votes.sort_by(|a, b| a.total_cmp(b));
        Some(votes[votes.len() / 2])
    }

    /// Strongest autocorrelation peak inside the BPM-derived lag range.
    fn pick_tempo(&self, acf: &[f32], envelope_rate: f32) -> Option<f32> {
        let min_lag = ((60.0 / self.max_bpm) * envelope_rate).round() as usize;
        let max_lag = ((60.0 / self.min_bpm) * envelope_rate).round() as usize;
        if min_lag == 0 || max_lag >= acf.len() || min_lag >= max_lag {
            return None;
        }

        let search = &acf[min_lag..=max_lag];
        let (local_idx, &peak) = search
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;
        if peak < MIN_PEAK_STRENGTH {
            return None;
        }

        let lag = min_lag + local_idx;
        Some(envelope_rate * 60.0 / lag as f32)
    }
}

/// Linear autocorrelation via the power spectrum, zero-padded to avoid
/// circular wrap-around.
fn autocorrelate(window: &[f32]) -> Vec<f32> {
    if window.is_empty() {
        return Vec::new();
    }
    let fft_len = (window.len() * 2).next_power_of_two();
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(fft_len);
    let ifft = planner.plan_fft_inverse(fft_len);

    let mut buffer: Vec<Complex<f32>> = window
        .iter()
        .map(|&s| Complex::new(s, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(fft_len)
        .collect();

    fft.process(&mut buffer);
    for c in buffer.iter_mut() {
        *c = Complex::new(c.re * c.re + c.im * c.im, 0.0);
    }
    ifft.process(&mut buffer);

    let scale = 1.0 / fft_len as f32;
    buffer
        .iter()
        .map(|c| c.re * scale)
        .take(window.len())
        .collect()
}
