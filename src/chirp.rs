//! Chirp Reference Tables
//!
//! This module generates the reference chirps used to dechirp a received
//! Chirp Spread Spectrum (CSS) symbol.
//!
//! ## What is a Chirp?
//!
//! A chirp is a signal whose frequency changes linearly over one symbol
//! duration:
//!
//! ```text
//! Frequency
//!     ^
//! fmax|        ___/
//!     |     __/
//!     |  __/
//! fmin|_/
//!     +----------> Time
//!       Upchirp
//!
//! Frequency
//!     ^
//! fmax|\_
//!     |  \__
//!     |     \__
//! fmin|        \___
//!     +----------> Time
//!       Downchirp
//! ```
//!
//! ## Dechirping
//!
//! Multiplying a received chirp, sample for sample, by the matching reference
//! collapses it into a pure tone whose frequency encodes the symbol value.
//! An FFT over the product then reads the symbol straight out of the peak
//! bin. See [`crate::detector`].
//!
//! ## Phase accumulation
//!
//! The tables are generated by *accumulating* a per-sample phase increment of
//! `2π(i + N/2)/N` rather than evaluating a closed-form quadratic phase. The
//! running sum of a linearly growing increment is exactly the quadratic
//! chirp phase, and matching modulators build their waveforms from the same
//! recurrence, so reproducing the cumulative sum keeps both ends of the link
//! bit-for-bit aligned (including the wrap behavior of the accumulator).

use std::f64::consts::PI;

use crate::types::{Complex, IQSample, Symbol};

/// Which reference chirp to dechirp with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChirpKind {
    /// Frequency sweeps low to high
    Up,
    /// Frequency sweeps high to low
    Down,
}

/// Pre-computed up-chirp and down-chirp reference tables of length N = 2^SF
///
/// The two tables are exact complex conjugates of one another, sample for
/// sample, and every entry has unit magnitude. Generation is deterministic
/// and happens once at construction.
#[derive(Debug, Clone)]
pub struct ChirpTable {
    up: Vec<IQSample>,
    down: Vec<IQSample>,
}

impl ChirpTable {
    /// Generate the reference tables for a symbol length of `n` samples
    ///
    /// `n` is the samples-per-symbol count, 2^SF.
    pub fn new(n: usize) -> Self {
        let mut up = Vec::with_capacity(n);
        let mut down = Vec::with_capacity(n);

        let mut phase_accum = 0.0_f64;
        for i in 0..n {
            // Increment grows linearly; the accumulator integrates it into
            // the quadratic chirp phase.
            phase_accum += (2.0 * PI * (i + n / 2) as f64) / n as f64;
            let entry = Complex::from_polar(1.0, phase_accum);
            up.push(entry.conj());
            down.push(entry);
        }

        Self { up, down }
    }

    /// Symbol length N in samples
    pub fn len(&self) -> usize {
        self.up.len()
    }

    pub fn is_empty(&self) -> bool {
        self.up.is_empty()
    }

    /// The up-chirp reference table
    pub fn up(&self) -> &[IQSample] {
        &self.up
    }

    /// The down-chirp reference table
    pub fn down(&self) -> &[IQSample] {
        &self.down
    }

    /// Select a reference table by kind
    pub fn table(&self, kind: ChirpKind) -> &[IQSample] {
        match kind {
            ChirpKind::Up => &self.up,
            ChirpKind::Down => &self.down,
        }
    }

    /// Generate the transmitted waveform for a symbol value
    ///
    /// The result dechirps against the up-chirp table into a pure tone in
    /// FFT bin `symbol`. Symbol 0 is the base up-chirp itself; higher values
    /// shift the frequency wrap-around point earlier in time. Used for
    /// loopback testing and simulation.
    pub fn symbol_chirp(&self, symbol: Symbol) -> Vec<IQSample> {
        let n = self.up.len();
        let k = symbol as f64;
        (0..n)
            .map(|i| {
                let tone = Complex::from_polar(1.0, 2.0 * PI * k * i as f64 / n as f64);
                self.up[i].conj() * tone
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_table_length() {
        let table = ChirpTable::new(128);
        assert_eq!(table.len(), 128);
        assert_eq!(table.up().len(), 128);
        assert_eq!(table.down().len(), 128);
    }

    #[test]
    fn test_unit_magnitude() {
        let table = ChirpTable::new(256);
        for sample in table.up().iter().chain(table.down()) {
            assert_relative_eq!(sample.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_conjugate_pair() {
        for sf in [5u8, 7, 8, 10] {
            let n = 1usize << sf;
            let table = ChirpTable::new(n);
            for i in 0..n {
                let conj = table.up()[i].conj();
                assert_relative_eq!(conj.re, table.down()[i].re, epsilon = 1e-9);
                assert_relative_eq!(conj.im, table.down()[i].im, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_symbol_chirp_dechirps_to_tone() {
        let n = 128;
        let table = ChirpTable::new(n);
        let tx = table.symbol_chirp(5);

        // Dechirped product should be the unit tone at bin 5: successive
        // samples advance in phase by 2π·5/N.
        let expected_step = 2.0 * PI * 5.0 / n as f64;
        for i in 1..n {
            let prev = tx[i - 1] * table.up()[i - 1];
            let curr = tx[i] * table.up()[i];
            let step = (curr * prev.conj()).arg();
            assert_relative_eq!(step, expected_step, epsilon = 1e-6);
        }
    }
}
