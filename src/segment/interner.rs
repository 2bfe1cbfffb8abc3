//! Dense id interning
//!
//! Each segment keeps one interner per namespace: document external ids,
//! field names, and per-field term strings. Ids are handed out on first
//! sight and never change afterwards, so the forward and backward maps
//! stay mutual inverses for the lifetime of the segment.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use super::types::{IdCounter, InternalId};
use crate::error::Result;

/// Bidirectional key <-> dense id map
#[derive(Clone, Debug)]
pub struct Interner<K, I> {
    forward: HashMap<K, I>,
    backward: HashMap<I, K>,
    counter: IdCounter,
}

impl<K, I> Interner<K, I>
where
    K: Hash + Eq + Clone,
    I: InternalId,
{
    pub fn new() -> Self {
        Self {
            forward: HashMap::new(),
            backward: HashMap::new(),
            counter: IdCounter::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            forward: HashMap::with_capacity(capacity),
            backward: HashMap::with_capacity(capacity),
            counter: IdCounter::new(),
        }
    }

    /// Return the id for `key`, assigning the next id from this interner's
    /// own counter if the key is new. Fails only when the id space is
    /// exhausted, in which case nothing is inserted.
    pub fn intern<Q>(&mut self, key: &Q) -> Result<I>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(&id) = self.forward.get(key) {
            return Ok(id);
        }
        let id = self.counter.allocate()?;
        self.insert_new(ToOwned::to_owned(key), id);
        Ok(id)
    }

    /// Like [`intern`](Self::intern) but draws new ids from a shared counter.
    ///
    /// Used for term maps, where every field of a segment allocates from a
    /// single term-id space.
    pub fn intern_with<Q>(&mut self, key: &Q, counter: &mut IdCounter) -> Result<I>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(&id) = self.forward.get(key) {
            return Ok(id);
        }
        let id = counter.allocate()?;
        self.insert_new(ToOwned::to_owned(key), id);
        Ok(id)
    }

    fn insert_new(&mut self, key: K, id: I) {
        self.backward.insert(id, key.clone());
        self.forward.insert(key, id);
    }

    /// Look up the internal id without assigning one
    pub fn internal_id<Q>(&self, key: &Q) -> Option<I>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.get(key).copied()
    }

    /// Look up the external key for an internal id
    pub fn external_id(&self, id: I) -> Option<&K> {
        self.backward.get(&id)
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Iterate over (key, id) pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&K, I)> {
        self.forward.iter().map(|(k, &id)| (k, id))
    }
}

impl<K, I> Default for Interner<K, I>
where
    K: Hash + Eq + Clone,
    I: InternalId,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::types::{DocNo, TermId};

    #[test]
    fn test_intern_assigns_dense_ids() {
        let mut docs: Interner<String, DocNo> = Interner::new();

        assert_eq!(docs.intern("doc_number:0").unwrap(), DocNo::new(0));
        assert_eq!(docs.intern("doc_number:1").unwrap(), DocNo::new(1));
        assert_eq!(docs.intern("doc_number:2").unwrap(), DocNo::new(2));
        assert_eq!(docs.len(), 3);
    }

    #[test]
    fn test_intern_is_idempotent() {
        let mut docs: Interner<String, DocNo> = Interner::new();

        let first = docs.intern("a").unwrap();
        docs.intern("b").unwrap();
        let again = docs.intern("a").unwrap();

        assert_eq!(first, again);
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_forward_and_backward_are_inverse() {
        let mut docs: Interner<String, DocNo> = Interner::new();
        for key in ["x", "y", "z", "y"] {
            docs.intern(key).unwrap();
        }

        for (key, id) in docs.iter() {
            assert_eq!(docs.external_id(id), Some(key));
            assert_eq!(docs.internal_id(key.as_str()), Some(id));
        }
        assert_eq!(docs.external_id(DocNo::new(99)), None);
        assert_eq!(docs.internal_id("missing"), None);
    }

    #[test]
    fn test_shared_counter_across_interners() {
        let mut counter = IdCounter::new();
        let mut first_names: Interner<String, TermId> = Interner::new();
        let mut last_names: Interner<String, TermId> = Interner::new();

        let kevin = first_names.intern_with("kevin", &mut counter).unwrap();
        let smith = last_names.intern_with("smith", &mut counter).unwrap();
        let kevin_last = last_names.intern_with("kevin", &mut counter).unwrap();

        assert_eq!(kevin, TermId::new(0));
        assert_eq!(smith, TermId::new(1));
        // Same string in another field gets its own id
        assert_eq!(kevin_last, TermId::new(2));
        assert_eq!(first_names.intern_with("kevin", &mut counter).unwrap(), kevin);
        assert_eq!(counter.issued(), 3);
    }

    #[test]
    fn test_exhausted_counter_inserts_nothing() {
        let mut counter = IdCounter::starting_at(u32::MAX);
        let mut terms: Interner<String, TermId> = Interner::new();

        let err = terms.intern_with("overflow", &mut counter).unwrap_err();
        assert!(matches!(err, crate::IndexError::Internal(_)));
        assert!(terms.is_empty());
        assert_eq!(terms.internal_id("overflow"), None);
    }
}
