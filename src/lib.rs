//! # CSS Demodulation Core
//!
//! This crate demodulates a Chirp Spread Spectrum (LoRa physical layer)
//! complex baseband sample stream into integer symbols: reference chirp
//! generation, FFT-based per-symbol detection, the preamble/sync-word
//! synchronization state machine, and fixed-size frame assembly.
//!
//! Everything above symbol extraction — Gray decoding, de-interleaving,
//! FEC, de-whitening, CRC — is a downstream concern; the output here is raw
//! symbol values. Sample transport and scheduling are likewise the host's
//! job: the demodulator is a step-driven unit of work invoked whenever at
//! least 2N samples are buffered.
//!
//! ## Signal Flow
//!
//! ```text
//! I/Q in ──► dechirp (state-selected reference) ──► FFT peak ──► symbol
//!                                                     │
//!                       sync state machine ◄──────────┘
//!                        │            │
//!                   annotations   frames of MTU symbols
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use css_demod::{DemodParams, Demodulator};
//!
//! let params = DemodParams::builder()
//!     .spreading_factor(8)
//!     .sync_word(0x12)
//!     .mtu(256)
//!     .build()
//!     .expect("valid parameters");
//! let mut demod = Demodulator::new(params);
//!
//! let mut buffered: Vec<css_demod::IQSample> = Vec::new();
//! // ... fill `buffered` from the radio ...
//! while let Some(step) = demod.step(&buffered) {
//!     buffered.drain(..step.consumed);
//!     if let Some(frame) = step.frame {
//!         println!("frame of {} symbols", frame.len());
//!     }
//! }
//! ```

pub mod chirp;
pub mod demod;
pub mod detector;
pub mod fft_utils;
pub mod framer;
pub mod logging;
pub mod params;
pub mod tags;
pub mod types;

pub use chirp::{ChirpKind, ChirpTable};
pub use demod::{DebugMirror, Demodulator, Step};
pub use detector::SymbolDetector;
pub use framer::FrameAssembler;
pub use params::{DemodParams, SpreadingFactor};
pub use tags::{Label, LabelKind, LabelStore};
pub use types::{Complex, DspError, DspResult, IQBuffer, IQSample, Symbol};
