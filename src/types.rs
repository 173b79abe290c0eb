//! Core types for CSS demodulation
//!
//! This module defines the fundamental types used throughout the crate,
//! particularly for representing complex I/Q (In-phase/Quadrature) samples.
//!
//! ## Understanding I/Q Samples
//!
//! In Software Defined Radio (SDR), signals are represented as complex numbers
//! where:
//! - **I (In-phase)**: The real component, representing the signal aligned with
//!   a reference carrier
//! - **Q (Quadrature)**: The imaginary component, representing the signal 90°
//!   out of phase with the carrier
//!
//! This representation captures both amplitude AND phase information, which is
//! what makes chirp-based modulation schemes like LoRa's CSS demodulable at
//! all: the symbol value lives entirely in the phase trajectory.

use num_complex::Complex64;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// A single I/Q sample point
pub type IQSample = Complex64;

/// A buffer of I/Q samples
pub type IQBuffer = Vec<IQSample>;

/// Represents a demodulated symbol
///
/// Symbols are integers from 0 to 2^SF - 1, where SF is the spreading factor.
/// A 16-bit value fits every symbol size from SF5 through SF12.
pub type Symbol = u16;

/// Result type for DSP operations
pub type DspResult<T> = Result<T, DspError>;

/// Errors that can occur during configuration of the demodulator
///
/// Note that there are no runtime error conditions in the signal path itself:
/// every input block produces a detected value, and a preamble that does not
/// match the configured sync word is a normal search outcome, not a fault.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DspError {
    #[error("Invalid spreading factor: {0}. Must be between 5 and 12")]
    InvalidSpreadingFactor(u8),

    #[error("Invalid symbol MTU: {0}. Must be at least 1")]
    InvalidMtu(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DspError::InvalidSpreadingFactor(13);
        assert!(err.to_string().contains("13"));

        let err = DspError::InvalidMtu(0);
        assert!(err.to_string().contains("at least 1"));
    }
}
