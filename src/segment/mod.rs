//! In-memory segment index
//!
//! # Architecture
//!
//! - `Interner`: dense id assignment for documents, fields and terms
//! - `IndexedField`: per-field term map, dirty flag and term dictionary
//! - `TermDictionary`: FST mapping term bytes to term ids, loaded lazily
//! - `PostingsStore`: term id -> frequency + roaring bitmap of docnos
//! - `Segment`: owns all of the above and drives ingestion and leaf queries

mod automaton;
mod field;
mod index;
mod interner;
mod postings;
mod statistics;
mod term_dict;
mod types;

pub use automaton::*;
pub use field::*;
pub use index::*;
pub use interner::*;
pub use postings::*;
pub use statistics::*;
pub use term_dict::*;
pub use types::*;
