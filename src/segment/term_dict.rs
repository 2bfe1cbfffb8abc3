//! Term dictionary using FST (Finite State Transducer)
//!
//! Each field owns one dictionary mapping term bytes to the term id. The
//! FST bytes are built once per ingestion call and deserialized lazily on
//! first search; the loaded handle is cached behind a lock so concurrent
//! first queries against the same field are safe.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use fst::{Automaton, IntoStreamer, Map, MapBuilder, Streamer};
use parking_lot::RwLock;

use super::types::TermId;
use crate::error::{IndexError, Result};

/// Immutable term dictionary for one field
pub struct TermDictionary {
    field: String,
    bytes: Bytes,
    num_terms: usize,
    /// Deserialized FST, populated on first use
    handle: RwLock<Option<Arc<Map<Bytes>>>>,
}

impl TermDictionary {
    /// Wrap FST bytes produced by [`TermDictionaryBuilder`]
    pub fn from_bytes(field: impl Into<String>, bytes: Bytes, num_terms: usize) -> Self {
        Self {
            field: field.into(),
            bytes,
            num_terms,
            handle: RwLock::new(None),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Raw FST bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.num_terms
    }

    pub fn is_empty(&self) -> bool {
        self.num_terms == 0
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.read().is_some()
    }

    /// Return the cached FST handle, deserializing it on first call
    pub fn load(&self) -> Result<Arc<Map<Bytes>>> {
        if let Some(map) = self.handle.read().as_ref() {
            return Ok(Arc::clone(map));
        }

        let mut guard = self.handle.write();
        // Another reader may have loaded it while we waited for the lock
        if let Some(map) = guard.as_ref() {
            return Ok(Arc::clone(map));
        }

        let map = Map::new(self.bytes.clone()).map_err(|source| IndexError::DictionaryLoad {
            field: self.field.clone(),
            source,
        })?;
        let map = Arc::new(map);
        *guard = Some(Arc::clone(&map));
        Ok(map)
    }

    /// Look up the id of an exact term
    pub fn get(&self, term: &str) -> Result<Option<TermId>> {
        if self.is_empty() {
            return Err(IndexError::EmptyDictionary(self.field.clone()));
        }
        let map = self.load()?;
        map.get(term.as_bytes()).map(to_term_id).transpose()
    }

    /// All (term bytes, term id) pairs accepted by `automaton`, in key order
    pub fn search<A: Automaton>(&self, automaton: A) -> Result<Vec<(Vec<u8>, TermId)>> {
        if self.is_empty() {
            return Err(IndexError::EmptyDictionary(self.field.clone()));
        }
        let map = self.load()?;

        let mut matches = Vec::new();
        let mut stream = map.search(automaton).into_stream();
        while let Some((key, value)) = stream.next() {
            matches.push((key.to_vec(), to_term_id(value)?));
        }
        Ok(matches)
    }

    /// Every term in the dictionary, in key order
    pub fn terms(&self) -> Result<Vec<(String, TermId)>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let map = self.load()?;

        let mut terms = Vec::with_capacity(self.num_terms);
        let mut stream = map.stream();
        while let Some((key, value)) = stream.next() {
            terms.push((String::from_utf8_lossy(key).into_owned(), to_term_id(value)?));
        }
        Ok(terms)
    }
}

impl fmt::Debug for TermDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TermDictionary")
            .field("field", &self.field)
            .field("bytes", &self.bytes.len())
            .field("num_terms", &self.num_terms)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

fn to_term_id(value: u64) -> Result<TermId> {
    u32::try_from(value)
        .map(TermId::new)
        .map_err(|_| IndexError::Internal(format!("term id {value} out of range")))
}

/// Builder for term dictionaries
pub struct TermDictionaryBuilder {
    field: String,
    /// Terms and their ids, sorted before insertion
    terms: Vec<(String, TermId)>,
}

impl TermDictionaryBuilder {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            terms: Vec::new(),
        }
    }

    pub fn with_capacity(field: impl Into<String>, capacity: usize) -> Self {
        Self {
            field: field.into(),
            terms: Vec::with_capacity(capacity),
        }
    }

    /// Stage a term; order does not matter
    pub fn add(&mut self, term: impl Into<String>, term_id: TermId) {
        self.terms.push((term.into(), term_id));
    }

    /// Sort the staged terms and stream them into a fresh FST
    pub fn build(mut self) -> Result<TermDictionary> {
        // Equal strings always carry the same id, so any duplicate can go
        self.terms.sort_by(|a, b| a.0.cmp(&b.0));
        self.terms.dedup_by(|a, b| a.0 == b.0);

        let mut fst_builder = MapBuilder::memory();
        for (term, term_id) in &self.terms {
            fst_builder
                .insert(term.as_bytes(), u64::from(term_id.as_u32()))
                .map_err(|source| IndexError::DictionaryBuild {
                    field: self.field.clone(),
                    source,
                })?;
        }

        let fst_data = fst_builder
            .into_inner()
            .map_err(|source| IndexError::DictionaryBuild {
                field: self.field.clone(),
                source,
            })?;

        Ok(TermDictionary::from_bytes(
            self.field,
            Bytes::from(fst_data),
            self.terms.len(),
        ))
    }
}
