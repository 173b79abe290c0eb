//! Symbol Detector
//!
//! Estimates the transmitted symbol value from one dechirped symbol window.
//!
//! The caller dechirps (multiplies by a reference chirp) and feeds the
//! product samples one at a time; [`detect`](SymbolDetector::detect) then
//! runs an N-point FFT over the window and returns the bin index with the
//! most energy. For a well-aligned CSS symbol that bin index *is* the symbol
//! value, uncorrected for any frame-level offset.
//!
//! Detection never fails: every window produces a value. Whether that value
//! is the transmitted symbol is a property of the physical signal, not an
//! error condition.
//!
//! The window is plain indexed storage, so individual positions may be
//! re-fed before a detect — the synchronizer relies on this when it
//! re-examines a second half-window during sync word matching. A detector
//! instance handles one detection at a time and is not meant to be shared.

use crate::fft_utils::FftProcessor;
use crate::types::{Complex, IQSample, Symbol};

/// FFT-based peak detector over one dechirped symbol window
#[derive(Debug)]
pub struct SymbolDetector {
    /// Dechirped sample window, indexed by feed position
    window: Vec<IQSample>,
    /// Spectrum work buffer, reused across detections
    spectrum: Vec<Complex>,
    /// FFT sized to the symbol length
    fft: FftProcessor,
}

impl SymbolDetector {
    /// Create a detector for symbols of `n` samples
    pub fn new(n: usize) -> Self {
        Self {
            window: vec![Complex::new(0.0, 0.0); n],
            spectrum: vec![Complex::new(0.0, 0.0); n],
            fft: FftProcessor::new(n),
        }
    }

    /// Symbol window length N
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Store the i-th dechirped sample of the current window
    ///
    /// `i` must be in `[0, N)`.
    pub fn feed(&mut self, i: usize, sample: IQSample) {
        self.window[i] = sample;
    }

    /// Detect the symbol carried by the current window
    ///
    /// Returns the FFT bin index with maximum squared magnitude, in
    /// `[0, N)`. Equal-maximum bins resolve deterministically to the lowest
    /// index. The window contents are left untouched.
    pub fn detect(&mut self) -> Symbol {
        self.spectrum.copy_from_slice(&self.window);
        self.fft.fft_inplace(&mut self.spectrum);
        let (idx, _) = FftProcessor::find_peak(&self.spectrum);
        idx as Symbol
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chirp::ChirpTable;

    fn detect_symbol(table: &ChirpTable, detector: &mut SymbolDetector, tx: &[IQSample]) -> Symbol {
        for (i, (&samp, &chirp)) in tx.iter().zip(table.up()).enumerate() {
            detector.feed(i, samp * chirp);
        }
        detector.detect()
    }

    #[test]
    fn test_reference_upchirp_detects_zero() {
        let n = 128;
        let table = ChirpTable::new(n);
        let mut detector = SymbolDetector::new(n);

        let tx = table.symbol_chirp(0);
        assert_eq!(detect_symbol(&table, &mut detector, &tx), 0);
    }

    #[test]
    fn test_all_shifts_round_trip() {
        let n = 128;
        let table = ChirpTable::new(n);
        let mut detector = SymbolDetector::new(n);

        for k in 0..n as Symbol {
            let tx = table.symbol_chirp(k);
            assert_eq!(detect_symbol(&table, &mut detector, &tx), k);
        }
    }

    #[test]
    fn test_refeed_overwrites_window() {
        let n = 64;
        let table = ChirpTable::new(n);
        let mut detector = SymbolDetector::new(n);

        let first = table.symbol_chirp(3);
        detect_symbol(&table, &mut detector, &first);

        // Re-feeding a second window through the same instance must not be
        // influenced by the first.
        let second = table.symbol_chirp(40);
        assert_eq!(detect_symbol(&table, &mut detector, &second), 40);
    }
}
