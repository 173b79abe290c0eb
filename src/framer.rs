//! Frame Assembler
//!
//! Accumulates detected data symbols into a fixed-capacity frame buffer and
//! hands the buffer off, by value, the moment it fills.
//!
//! The synchronizer allocates a buffer when it commits to a frame
//! (down-chirp phase of the preamble) and pushes one symbol per data step.
//! Exactly `mtu` symbols are emitted per frame; there is no partial-frame
//! emission. If synchronization is lost before the buffer fills, the next
//! full sync simply allocates a fresh buffer and the stale one is dropped.

use crate::types::Symbol;

/// Fixed-size symbol frame assembly
#[derive(Debug, Default)]
pub struct FrameAssembler {
    /// In-progress frame buffer, present only between allocation and handoff
    buf: Option<Vec<Symbol>>,
    /// Write index into the current buffer
    count: usize,
}

impl FrameAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh frame buffer of `mtu` symbols
    ///
    /// Any in-progress buffer is discarded. Frames always carry at least
    /// one symbol; a zero `mtu` only discards and leaves nothing allocated.
    pub fn begin(&mut self, mtu: usize) {
        self.buf = if mtu > 0 { Some(vec![0; mtu]) } else { None };
        self.count = 0;
    }

    /// Reset the write index to the start of the current buffer
    pub fn rewind(&mut self) {
        self.count = 0;
    }

    /// Discard any in-progress buffer
    pub fn discard(&mut self) {
        self.buf = None;
        self.count = 0;
    }

    /// Whether a frame is currently being assembled
    pub fn in_progress(&self) -> bool {
        self.buf.is_some()
    }

    /// Symbols written to the current buffer so far
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Append one symbol; returns the completed frame when the buffer fills
    ///
    /// Ownership of the buffer moves to the caller on completion; no
    /// internal reference is retained. Pushing without an allocated buffer
    /// is a no-op returning `None`.
    pub fn push(&mut self, symbol: Symbol) -> Option<Vec<Symbol>> {
        let buf = self.buf.as_mut()?;
        buf[self.count] = symbol;
        self.count += 1;
        if self.count >= buf.len() {
            self.count = 0;
            self.buf.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emits_exactly_mtu_symbols() {
        let mut asm = FrameAssembler::new();
        asm.begin(4);

        assert_eq!(asm.push(10), None);
        assert_eq!(asm.push(20), None);
        assert_eq!(asm.push(30), None);
        let frame = asm.push(40).expect("frame should complete");
        assert_eq!(frame, vec![10, 20, 30, 40]);
        assert!(!asm.in_progress());
    }

    #[test]
    fn test_push_without_begin_is_noop() {
        let mut asm = FrameAssembler::new();
        assert_eq!(asm.push(1), None);
        assert!(!asm.in_progress());
    }

    #[test]
    fn test_begin_zero_allocates_nothing() {
        let mut asm = FrameAssembler::new();
        asm.begin(3);
        asm.push(7);
        asm.begin(0);
        assert!(!asm.in_progress());
        assert_eq!(asm.push(1), None);
    }

    #[test]
    fn test_begin_discards_partial_frame() {
        let mut asm = FrameAssembler::new();
        asm.begin(3);
        asm.push(7);
        asm.begin(2);
        assert_eq!(asm.len(), 0);
        assert_eq!(asm.push(1), None);
        assert_eq!(asm.push(2), Some(vec![1, 2]));
    }

    #[test]
    fn test_rewind_restarts_fill() {
        let mut asm = FrameAssembler::new();
        asm.begin(2);
        asm.push(9);
        asm.rewind();
        assert_eq!(asm.push(1), None);
        assert_eq!(asm.push(2), Some(vec![1, 2]));
    }
}
