//! Segment size statistics

use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of a segment's contents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentStats {
    /// Distinct external document ids seen
    pub doc_count: usize,
    pub field_count: usize,
    /// Distinct (field, term) pairs
    pub term_count: usize,
    /// Fields with a built term dictionary
    pub dictionaries: usize,
    /// Total FST size across all fields
    pub dictionary_bytes: usize,
    /// Serialized size of all postings bitmaps
    pub postings_bytes: usize,
}

impl SegmentStats {
    /// Rough in-memory footprint of the index structures
    pub fn index_bytes(&self) -> usize {
        self.dictionary_bytes + self.postings_bytes
    }
}
