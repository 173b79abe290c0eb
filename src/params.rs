//! Demodulator Parameters and Configuration
//!
//! This module defines the configurable parameters for the CSS demodulation
//! core: spreading factor, sync word, and symbol MTU.
//!
//! ## Understanding the Parameters
//!
//! ### Spreading Factor (SF)
//!
//! The spreading factor determines how many chips (sub-symbols) encode each
//! symbol. Each symbol occupies N = 2^SF samples at the waveform bandwidth.
//!
//! | SF | Samples/Symbol | Bits/Symbol |
//! |----|----------------|-------------|
//! | 7  | 128            | 7           |
//! | 8  | 256            | 8           |
//! | 9  | 512            | 9           |
//! | 10 | 1024           | 10          |
//! | 11 | 2048           | 11          |
//! | 12 | 4096           | 12          |
//!
//! ### Sync Word
//!
//! A 2-nibble, 2-symbol value transmitted after the preamble up-chirps and
//! before the down-chirps. The demodulator ignores frames whose preamble does
//! not carry the configured sync word. 0x12 is the conventional private
//! network value, 0x34 the LoRaWAN one.
//!
//! ### Symbol MTU
//!
//! The number of data symbols extracted per detected frame. The demodulator
//! does not inspect the payload; it simply produces this many symbols once
//! synchronized. Not a byte-size network MTU.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{DspError, DspResult};

/// Spreading Factor for CSS modulation
///
/// Determines the number of samples per symbol (2^SF) and the number of bits
/// encoded per symbol (SF bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpreadingFactor {
    SF5 = 5,
    SF6 = 6,
    SF7 = 7,
    SF8 = 8,
    SF9 = 9,
    SF10 = 10,
    SF11 = 11,
    SF12 = 12,
}

impl SpreadingFactor {
    /// Create a spreading factor from a raw value
    pub fn from_u8(value: u8) -> DspResult<Self> {
        match value {
            5 => Ok(Self::SF5),
            6 => Ok(Self::SF6),
            7 => Ok(Self::SF7),
            8 => Ok(Self::SF8),
            9 => Ok(Self::SF9),
            10 => Ok(Self::SF10),
            11 => Ok(Self::SF11),
            12 => Ok(Self::SF12),
            _ => Err(DspError::InvalidSpreadingFactor(value)),
        }
    }

    /// Get the raw value
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Number of samples per symbol
    ///
    /// This is 2^SF. For SF8, there are 256 samples per symbol.
    pub fn samples_per_symbol(&self) -> usize {
        1 << self.value()
    }

    /// Number of bits encoded per symbol
    ///
    /// This equals the SF value itself.
    pub fn bits_per_symbol(&self) -> u8 {
        self.value()
    }
}

impl fmt::Display for SpreadingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SF{}", self.value())
    }
}

impl Default for SpreadingFactor {
    fn default() -> Self {
        Self::SF8
    }
}

/// Complete demodulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemodParams {
    /// Spreading Factor (5-12), fixed for the lifetime of a demodulator
    pub sf: SpreadingFactor,
    /// Sync word (default 0x12 for private, 0x34 for LoRaWAN)
    pub sync_word: u8,
    /// Number of data symbols produced per synchronized frame
    pub mtu: usize,
}

impl Default for DemodParams {
    fn default() -> Self {
        Self {
            sf: SpreadingFactor::default(),
            sync_word: 0x12,
            mtu: 256,
        }
    }
}

impl DemodParams {
    /// Create a new builder for demodulator parameters
    pub fn builder() -> DemodParamsBuilder {
        DemodParamsBuilder::default()
    }

    /// Number of samples per symbol (N = 2^SF)
    pub fn samples_per_symbol(&self) -> usize {
        self.sf.samples_per_symbol()
    }
}

/// Builder for [`DemodParams`]
///
/// Unlike the parameter enums, the builder accepts raw values and defers
/// validation to [`build`](DemodParamsBuilder::build), which rejects
/// misconfiguration explicitly instead of substituting defaults.
#[derive(Debug, Default)]
pub struct DemodParamsBuilder {
    sf: Option<u8>,
    sync_word: Option<u8>,
    mtu: Option<usize>,
}

impl DemodParamsBuilder {
    pub fn spreading_factor(mut self, sf: u8) -> Self {
        self.sf = Some(sf);
        self
    }

    pub fn sync_word(mut self, sync: u8) -> Self {
        self.sync_word = Some(sync);
        self
    }

    pub fn mtu(mut self, mtu: usize) -> Self {
        self.mtu = Some(mtu);
        self
    }

    /// Validate and build the parameter set
    pub fn build(self) -> DspResult<DemodParams> {
        let defaults = DemodParams::default();
        let sf = match self.sf {
            Some(raw) => SpreadingFactor::from_u8(raw)?,
            None => defaults.sf,
        };
        let mtu = self.mtu.unwrap_or(defaults.mtu);
        if mtu == 0 {
            return Err(DspError::InvalidMtu(mtu));
        }
        Ok(DemodParams {
            sf,
            sync_word: self.sync_word.unwrap_or(defaults.sync_word),
            mtu,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreading_factor_samples() {
        assert_eq!(SpreadingFactor::SF7.samples_per_symbol(), 128);
        assert_eq!(SpreadingFactor::SF12.samples_per_symbol(), 4096);
        assert_eq!(SpreadingFactor::SF7.bits_per_symbol(), 7);
        assert_eq!(SpreadingFactor::SF12.bits_per_symbol(), 12);
    }

    #[test]
    fn test_spreading_factor_from_u8() {
        assert_eq!(SpreadingFactor::from_u8(9).unwrap(), SpreadingFactor::SF9);
        assert!(SpreadingFactor::from_u8(4).is_err());
        assert!(SpreadingFactor::from_u8(13).is_err());
    }

    #[test]
    fn test_defaults_match_reference_block() {
        let params = DemodParams::default();
        assert_eq!(params.sf, SpreadingFactor::SF8);
        assert_eq!(params.sync_word, 0x12);
        assert_eq!(params.mtu, 256);
    }

    #[test]
    fn test_builder() {
        let params = DemodParams::builder()
            .spreading_factor(7)
            .sync_word(0x34)
            .mtu(64)
            .build()
            .unwrap();
        assert_eq!(params.samples_per_symbol(), 128);
        assert_eq!(params.sync_word, 0x34);
        assert_eq!(params.mtu, 64);
    }

    #[test]
    fn test_builder_rejects_misconfiguration() {
        assert!(DemodParams::builder().spreading_factor(3).build().is_err());
        assert!(DemodParams::builder().mtu(0).build().is_err());
    }
}
