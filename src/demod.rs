//! CSS Demodulator
//!
//! The synchronization state machine that turns a complex baseband sample
//! stream into frames of demodulated symbols.
//!
//! ## Processing model
//!
//! The demodulator is step-driven: the host calls
//! [`step`](Demodulator::step) whenever at least 2N unconsumed samples are
//! buffered (N = 2^SF). Each step dechirps one N-sample window with the
//! reference chirp bound to the current state, detects the spectral peak,
//! advances the state machine, and reports how many input samples it
//! consumed. Consumption is rarely a full window during acquisition; partial
//! skips are how the searcher walks onto symbol alignment.
//!
//! ## Synchronization sequence
//!
//! ```text
//!              value matches both sync nibbles
//! ┌───────────┐ (consume 2N)  ┌────────────┐    ┌────────────┐
//! │ FRAMESYNC ├──────────────►│ DOWNCHIRP0 ├───►│ DOWNCHIRP1 │
//! └───────────┘               └────────────┘    └──────┬─────┘
//!   ▲   │ no match:                                    │ alloc frame,
//!   │   │ consume N − value                            ▼ up-chirp again
//!   │   ▼                     ┌─────────────┐   ┌──────────────┐
//!   │ (search)                │ DATASYMBOLS │◄──┤ QUARTERCHIRP │
//!   │                         └──────┬──────┘   └──────────────┘
//!   │     frame of MTU symbols       │            (consume N/4)
//!   └────────────────────────────────┘
//! ```
//!
//! The sync word check follows the format observed on RN2483 hardware: each
//! sync symbol quantizes to a nibble as `(value + 4) / 8`, and the preceding
//! preamble tone must have detected near zero (`(prev + 1) / 2 == 0`).
//!
//! ## Example
//!
//! ```rust
//! use css_demod::{DemodParams, Demodulator};
//!
//! let params = DemodParams::builder()
//!     .spreading_factor(8)
//!     .sync_word(0x12)
//!     .mtu(256)
//!     .build()
//!     .unwrap();
//! let mut demod = Demodulator::new(params);
//!
//! let samples = vec![num_complex::Complex64::new(0.0, 0.0); 1024];
//! if let Some(step) = demod.step(&samples) {
//!     assert!(step.consumed >= 1);
//! }
//! ```

use tracing::{debug, trace};

use crate::chirp::{ChirpKind, ChirpTable};
use crate::detector::SymbolDetector;
use crate::framer::FrameAssembler;
use crate::params::DemodParams;
use crate::tags::{Label, LabelKind};
use crate::types::{DspError, DspResult, IQBuffer, IQSample, Symbol};

/// Synchronization state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemodState {
    /// Searching for the preamble / sync word with the up-chirp reference
    FrameSync,
    /// First preamble down-chirp
    Downchirp0,
    /// Second preamble down-chirp
    Downchirp1,
    /// Quarter-symbol timing-offset compensation
    QuarterChirp,
    /// Extracting data symbols into the frame buffer
    DataSymbols,
}

/// Raw and dechirped echoes of the samples consumed by one step
///
/// `raw` mirrors the input unmodified; `dec` is the same range multiplied by
/// the reference chirp in effect when it was examined. Both have length
/// equal to [`Step::consumed`].
#[derive(Debug, Clone)]
pub struct DebugMirror {
    pub raw: IQBuffer,
    pub dec: IQBuffer,
}

/// Outcome of one processing step
#[derive(Debug, Clone)]
pub struct Step {
    /// Input samples consumed; advance the stream by this much
    pub consumed: usize,
    /// Detected symbol value of the first window examined
    pub value: Symbol,
    /// Annotation for the start of the consumed range, if any
    pub label: Option<Label>,
    /// Completed frame of exactly MTU symbols, if one finished this step
    pub frame: Option<Vec<Symbol>>,
    /// Debug echoes of the consumed range, when taps are enabled
    pub mirror: Option<DebugMirror>,
}

/// Chirp Spread Spectrum demodulator
///
/// Owns the chirp reference tables, the FFT symbol detector, and the
/// five-state synchronization machine. Single-threaded and step-driven; see
/// the [module docs](self) for the processing model.
#[derive(Debug)]
pub struct Demodulator {
    /// Samples per symbol, 2^SF, fixed at construction
    n: usize,
    /// Sync word, two nibbles checked against the two preamble sync symbols
    sync_word: u8,
    /// Data symbols per frame; latched into the assembler on allocation
    mtu: usize,
    chirps: ChirpTable,
    /// Reference table for the next window
    chirp: ChirpKind,
    detector: SymbolDetector,
    state: DemodState,
    /// Last detected value, used by FRAMESYNC for preamble continuity
    prev_value: Symbol,
    assembler: FrameAssembler,
    /// Absolute input-stream offset of the next unconsumed sample
    position: u64,
    debug_taps: bool,
}

impl Demodulator {
    /// Create a demodulator from a validated parameter set
    pub fn new(params: DemodParams) -> Self {
        let n = params.samples_per_symbol();
        Self {
            n,
            sync_word: params.sync_word,
            mtu: params.mtu,
            chirps: ChirpTable::new(n),
            chirp: ChirpKind::Up,
            detector: SymbolDetector::new(n),
            state: DemodState::FrameSync,
            prev_value: 0,
            assembler: FrameAssembler::new(),
            position: 0,
            debug_taps: false,
        }
    }

    /// Samples per symbol (N = 2^SF)
    pub fn samples_per_symbol(&self) -> usize {
        self.n
    }

    /// Minimum number of buffered samples required for a step to progress
    pub fn reserve(&self) -> usize {
        2 * self.n
    }

    /// Absolute offset of the next unconsumed input sample
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Current sync word
    pub fn sync_word(&self) -> u8 {
        self.sync_word
    }

    /// Replace the sync word
    ///
    /// Takes effect on the next FRAMESYNC evaluation; an in-flight frame is
    /// unaffected.
    pub fn set_sync_word(&mut self, sync: u8) {
        self.sync_word = sync;
    }

    /// Current symbol MTU
    pub fn mtu(&self) -> usize {
        self.mtu
    }

    /// Replace the symbol MTU
    ///
    /// Latched when the next frame buffer is allocated; a frame already in
    /// progress keeps its size.
    pub fn set_mtu(&mut self, mtu: usize) -> DspResult<()> {
        if mtu == 0 {
            return Err(DspError::InvalidMtu(mtu));
        }
        self.mtu = mtu;
        Ok(())
    }

    /// Enable or disable the raw/dechirped debug mirrors
    pub fn set_debug_taps(&mut self, enabled: bool) {
        self.debug_taps = enabled;
    }

    /// Return to the initial state
    ///
    /// Re-selects the up-chirp reference, clears the preamble-continuity
    /// value, and discards any partially assembled frame. The stream
    /// position is retained.
    pub fn reset(&mut self) {
        self.state = DemodState::FrameSync;
        self.chirp = ChirpKind::Up;
        self.prev_value = 0;
        self.assembler.discard();
    }

    /// Dechirp `input` into the detector window, mirroring into `dec`
    fn feed_window(&mut self, input: &[IQSample], dec: &mut IQBuffer) -> Symbol {
        let table = self.chirps.table(self.chirp);
        for i in 0..self.n {
            let decd = input[i] * table[i];
            self.detector.feed(i, decd);
            if self.debug_taps {
                dec.push(decd);
            }
        }
        self.detector.detect()
    }

    /// Process one symbol window from the head of `input`
    ///
    /// Returns `None`, consuming nothing and mutating nothing, when fewer
    /// than 2N samples are offered; the host should buffer more input and
    /// retry. Otherwise runs one state-machine step and reports the samples
    /// consumed, the annotation (if any), and a completed frame (if one
    /// finished).
    pub fn step(&mut self, input: &[IQSample]) -> Option<Step> {
        let n = self.n;
        if input.len() < 2 * n {
            return None;
        }

        let mut dec = IQBuffer::new();
        let value = self.feed_window(&input[..n], &mut dec);

        let mut consumed = n;
        let mut kind = None;
        let mut frame = None;

        match self.state {
            DemodState::FrameSync => {
                // Format as observed from inspecting RN2483 hardware.
                let syncd = (self.prev_value + 1) / 2 == 0;
                let match0 = (value + 4) / 8 == (self.sync_word >> 4) as Symbol;
                let mut match1 = false;

                // If the symbol matches sync nibble 0, check nibble 1 in the
                // following window as well. Otherwise this is still the
                // frame-search phase: skip by the detected value to walk the
                // frequency/timing error toward zero.
                if syncd && match0 {
                    let value1 = self.feed_window(&input[n..2 * n], &mut dec);
                    match1 = (value1 + 4) / 8 == (self.sync_word & 0x0f) as Symbol;
                    trace!(value, value1, "sync nibble 0 matched");
                }

                if syncd && match0 && match1 {
                    consumed = 2 * n;
                    self.state = DemodState::Downchirp0;
                    self.chirp = ChirpKind::Down;
                    kind = Some(LabelKind::Sync);
                    debug!(position = self.position, "sync word matched");
                } else {
                    consumed = n - value as usize;
                    kind = Some(LabelKind::FreqSkip);
                }
            }

            DemodState::Downchirp0 => {
                self.state = DemodState::Downchirp1;
                kind = Some(LabelKind::Downchirp);
            }

            DemodState::Downchirp1 => {
                self.state = DemodState::QuarterChirp;
                self.chirp = ChirpKind::Up;
                self.assembler.begin(self.mtu);
            }

            DemodState::QuarterChirp => {
                // The down-chirp pair is followed by a known quarter-symbol
                // remainder before the first data symbol.
                self.state = DemodState::DataSymbols;
                consumed = n / 4;
                self.assembler.rewind();
                kind = Some(LabelKind::QuarterChirp);
            }

            DemodState::DataSymbols => {
                frame = self.assembler.push(value);
                if let Some(ref symbols) = frame {
                    self.state = DemodState::FrameSync;
                    debug!(
                        symbols = symbols.len(),
                        position = self.position,
                        "frame complete"
                    );
                }
                kind = Some(LabelKind::DataSymbol);
            }
        }

        trace!(state = ?self.state, value, consumed, "demod step");

        let label = kind.map(|kind| Label {
            offset: self.position,
            kind,
        });
        let mirror = if self.debug_taps {
            dec.truncate(consumed);
            Some(DebugMirror {
                raw: input[..consumed].to_vec(),
                dec,
            })
        } else {
            None
        };

        self.prev_value = value;
        self.position += consumed as u64;

        Some(Step {
            consumed,
            value,
            label,
            frame,
            mirror,
        })
    }
}
