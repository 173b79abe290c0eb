//! Annotation Labels
//!
//! Protocol-relevant points in the input sample stream are marked with
//! labels attached to absolute sample offsets. Consumers tapping the debug
//! mirrors use them to line annotations up with the raw and dechirped
//! signal.
//!
//! | Label  | Meaning                                          |
//! |--------|--------------------------------------------------|
//! | `SYNC` | Sync word matched, frame acquisition begins      |
//! | `DC`   | First preamble down-chirp                        |
//! | `QC`   | Quarter-chirp timing-offset compensation         |
//! | `S`    | One data symbol                                  |
//! | `X`    | Frequency/timing search step (partial skip)      |
//!
//! "No annotation" is the absence of a label, not an empty string.
//!
//! ## Example
//!
//! ```rust
//! use css_demod::tags::{LabelKind, LabelStore};
//!
//! let mut store = LabelStore::new();
//! store.add(0, LabelKind::Sync);
//! store.add(1024, LabelKind::Downchirp);
//!
//! let in_range = store.range(0, 512);
//! assert_eq!(in_range.len(), 1);
//! assert_eq!(in_range[0].kind.as_str(), "SYNC");
//! ```

use std::collections::BTreeMap;
use std::fmt;

/// Kind of synchronization annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    /// Sync word matched (`SYNC`)
    Sync,
    /// Preamble down-chirp (`DC`)
    Downchirp,
    /// Quarter-symbol timing compensation (`QC`)
    QuarterChirp,
    /// Data symbol (`S`)
    DataSymbol,
    /// Partial-block frequency-error skip (`X`)
    FreqSkip,
}

impl LabelKind {
    /// The conventional short annotation string
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelKind::Sync => "SYNC",
            LabelKind::Downchirp => "DC",
            LabelKind::QuarterChirp => "QC",
            LabelKind::DataSymbol => "S",
            LabelKind::FreqSkip => "X",
        }
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An annotation attached to an absolute input-stream sample offset
///
/// The offset marks the start of the sample range the label covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    /// Absolute sample offset into the input stream
    pub offset: u64,
    /// What the offset marks
    pub kind: LabelKind,
}

/// Offset-ordered accumulation of labels
#[derive(Debug, Clone, Default)]
pub struct LabelStore {
    labels: BTreeMap<u64, Vec<LabelKind>>,
    total: usize,
}

impl LabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a label at the given absolute sample offset
    pub fn add(&mut self, offset: u64, kind: LabelKind) {
        self.labels.entry(offset).or_default().push(kind);
        self.total += 1;
    }

    /// Record a [`Label`] event
    pub fn record(&mut self, label: Label) {
        self.add(label.offset, label.kind);
    }

    /// All labels with offsets in `[start, end)`, in offset order
    pub fn range(&self, start: u64, end: u64) -> Vec<Label> {
        self.labels
            .range(start..end)
            .flat_map(|(&offset, kinds)| kinds.iter().map(move |&kind| Label { offset, kind }))
            .collect()
    }

    /// Total number of labels stored
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterate all labels in offset order
    pub fn iter(&self) -> impl Iterator<Item = Label> + '_ {
        self.labels
            .iter()
            .flat_map(|(&offset, kinds)| kinds.iter().map(move |&kind| Label { offset, kind }))
    }

    pub fn clear(&mut self) {
        self.labels.clear();
        self.total = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_strings() {
        assert_eq!(LabelKind::Sync.to_string(), "SYNC");
        assert_eq!(LabelKind::Downchirp.to_string(), "DC");
        assert_eq!(LabelKind::QuarterChirp.to_string(), "QC");
        assert_eq!(LabelKind::DataSymbol.to_string(), "S");
        assert_eq!(LabelKind::FreqSkip.to_string(), "X");
    }

    #[test]
    fn test_store_range_query() {
        let mut store = LabelStore::new();
        store.add(100, LabelKind::FreqSkip);
        store.add(356, LabelKind::Sync);
        store.add(868, LabelKind::Downchirp);

        let hits = store.range(90, 400);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].offset, 100);
        assert_eq!(hits[1].kind, LabelKind::Sync);
        assert_eq!(store.len(), 3);

        store.clear();
        assert!(store.is_empty());
        assert!(store.range(0, u64::MAX).is_empty());
    }

    #[test]
    fn test_multiple_labels_same_offset() {
        let mut store = LabelStore::new();
        store.add(0, LabelKind::Sync);
        store.add(0, LabelKind::DataSymbol);
        assert_eq!(store.range(0, 1).len(), 2);
    }
}
