//! FFT Utilities for Symbol Detection
//!
//! A thin wrapper around `rustfft` sized for one symbol window, plus the
//! deterministic spectral peak search used by the symbol detector.
//!
//! ## Why an FFT?
//!
//! After dechirping, a CSS symbol is a pure tone whose frequency is
//! proportional to the transmitted symbol value:
//!
//! ```text
//! Received Chirp × Reference = e^(j·2π·k/N·n)
//!
//!     │ Received     │ Reference      │ Result:
//!     │   Chirp      │  Downchirp     │  Single Tone
//! f   │      /       │  \             │     |
//!     │    /         │    \           │     |
//!     │  /           │      \    =    │     |
//!     │/             │        \       │     |
//!     └──────────    └──────────      └─────┴───── f
//!                                          ^
//!                                     symbol freq
//! ```
//!
//! An N-point FFT turns peak finding into an argmax over bins: the index of
//! the strongest bin *is* the symbol value.

use rustfft::{num_complex::Complex64, Fft, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// Forward FFT processor for one symbol window
pub struct FftProcessor {
    /// FFT size (samples per symbol)
    size: usize,
    /// Planned forward FFT instance
    fft_forward: Arc<dyn Fft<f64>>,
    /// Scratch buffer for in-place transforms
    scratch: Vec<Complex64>,
}

impl fmt::Debug for FftProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftProcessor")
            .field("size", &self.size)
            .finish()
    }
}

impl FftProcessor {
    /// Create a new FFT processor for the given size
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft_forward = planner.plan_fft_forward(size);
        let scratch = vec![Complex64::new(0.0, 0.0); fft_forward.get_inplace_scratch_len()];

        Self {
            size,
            fft_forward,
            scratch,
        }
    }

    /// Get the FFT size
    pub fn size(&self) -> usize {
        self.size
    }

    /// Compute the forward FFT in-place
    pub fn fft_inplace(&mut self, buffer: &mut [Complex64]) {
        assert_eq!(buffer.len(), self.size);
        self.fft_forward
            .process_with_scratch(buffer, &mut self.scratch);
    }

    /// Find the peak in an FFT spectrum by squared magnitude
    ///
    /// Returns `(bin_index, squared_magnitude)`. Squared magnitude is
    /// monotonic in magnitude, so the argmax is unchanged and the sqrt is
    /// skipped. Ties resolve to the lowest bin index: the scan runs left to
    /// right and only a strictly greater value displaces the current peak.
    pub fn find_peak(spectrum: &[Complex64]) -> (usize, f64) {
        let mut max_idx = 0;
        let mut max_mag = 0.0;

        for (i, &sample) in spectrum.iter().enumerate() {
            let mag = sample.norm_sqr();
            if mag > max_mag {
                max_mag = mag;
                max_idx = i;
            }
        }

        (max_idx, max_mag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_fft_of_tone_peaks_at_bin() {
        let n = 64;
        let mut proc = FftProcessor::new(n);
        assert_eq!(proc.size(), n);

        let k = 9;
        let mut buffer: Vec<Complex64> = (0..n)
            .map(|i| Complex64::from_polar(1.0, 2.0 * PI * k as f64 * i as f64 / n as f64))
            .collect();
        proc.fft_inplace(&mut buffer);

        let (idx, mag) = FftProcessor::find_peak(&buffer);
        assert_eq!(idx, k);
        // A coherent tone collects all N units of energy in one bin.
        assert_relative_eq!(mag.sqrt(), n as f64, epsilon = 1e-6);
    }

    #[test]
    fn test_find_peak_tie_breaks_low() {
        let spectrum = vec![
            Complex64::new(0.0, 0.0),
            Complex64::new(3.0, 0.0),
            Complex64::new(0.0, 3.0),
            Complex64::new(1.0, 0.0),
        ];
        let (idx, _) = FftProcessor::find_peak(&spectrum);
        assert_eq!(idx, 1);
    }

    #[test]
    fn test_find_peak_empty_and_zero() {
        assert_eq!(FftProcessor::find_peak(&[]), (0, 0.0));
        let zeros = vec![Complex64::new(0.0, 0.0); 8];
        assert_eq!(FftProcessor::find_peak(&zeros).0, 0);
    }
}
