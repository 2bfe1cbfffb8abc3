//! Postings store: term id -> (term frequency, roaring bitmap of docnos)

use std::collections::HashMap;

use roaring::RoaringBitmap;

use super::types::{DocNo, TermId};

/// Postings entry for a single term
///
/// The bitmap is a set, so adding the same docno twice is a no-op, while
/// the term frequency counts every addition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TermPostings {
    term_frequency: u32,
    docs: RoaringBitmap,
}

impl TermPostings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of the term in `docno`.
    ///
    /// Returns true if the docno was not already present.
    pub fn add(&mut self, docno: DocNo) -> bool {
        self.term_frequency += 1;
        self.docs.insert(docno.as_u32())
    }

    /// Number of times the term has been added
    pub fn term_frequency(&self) -> u32 {
        self.term_frequency
    }

    /// Number of distinct documents containing the term
    pub fn doc_frequency(&self) -> u64 {
        self.docs.len()
    }

    pub fn docs(&self) -> &RoaringBitmap {
        &self.docs
    }

    pub fn contains(&self, docno: DocNo) -> bool {
        self.docs.contains(docno.as_u32())
    }
}

/// All postings of a segment keyed by the segment-global term id
#[derive(Clone, Debug, Default)]
pub struct PostingsStore {
    entries: HashMap<TermId, TermPostings>,
}

impl PostingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the entry for `term_id` and add `docno` to it
    pub fn record(&mut self, term_id: TermId, docno: DocNo) {
        self.entries.entry(term_id).or_default().add(docno);
    }

    pub fn get(&self, term_id: TermId) -> Option<&TermPostings> {
        self.entries.get(&term_id)
    }

    /// Union the docs of `term_id` into `acc`; returns false if the term has no postings
    pub fn union_into(&self, term_id: TermId, acc: &mut RoaringBitmap) -> bool {
        match self.entries.get(&term_id) {
            Some(postings) => {
                *acc |= postings.docs();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialized size of every bitmap, as a memory footprint estimate
    pub fn bitmap_bytes(&self) -> usize {
        self.entries
            .values()
            .map(|p| p.docs.serialized_size())
            .sum()
    }
}
