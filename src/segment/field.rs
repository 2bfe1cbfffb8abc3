//! Per-field indexing state
//!
//! A field owns its term map (term string -> segment-global term id) and
//! the last built term dictionary. Staging a term marks the field dirty;
//! the segment rebuilds dirty fields at the end of each ingestion call.

use super::interner::Interner;
use super::term_dict::{TermDictionary, TermDictionaryBuilder};
use super::types::{FieldId, IdCounter, TermId};
use crate::error::{IndexError, Result};

/// Indexing state for a single field
#[derive(Debug)]
pub struct IndexedField {
    id: FieldId,
    name: String,
    terms: Interner<String, TermId>,
    /// Terms were staged since the last successful rebuild
    dirty: bool,
    dictionary: Option<TermDictionary>,
}

impl IndexedField {
    pub fn new(id: FieldId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            terms: Interner::new(),
            dirty: false,
            dictionary: None,
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Intern `term` against the shared term counter and mark the field
    /// for rebuild
    pub fn stage(&mut self, term: &str, term_ids: &mut IdCounter) -> Result<TermId> {
        let term_id = self.terms.intern_with(term, term_ids)?;
        self.dirty = true;
        Ok(term_id)
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.terms.internal_id(term)
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Whether the dictionary is behind the term map
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Rebuild the dictionary from every term this field has seen.
    ///
    /// The dirty flag is cleared only after a successful build; on failure
    /// the previous dictionary stays in place and the field stays dirty.
    pub fn rebuild_dictionary(&mut self) -> Result<&TermDictionary> {
        let mut builder = TermDictionaryBuilder::with_capacity(self.name.clone(), self.terms.len());
        for (term, term_id) in self.terms.iter() {
            builder.add(term.as_str(), term_id);
        }

        let dictionary = builder.build()?;
        self.dirty = false;
        let dictionary = self.dictionary.insert(dictionary);
        Ok(&*dictionary)
    }

    /// The built dictionary, or `MissingDictionary` if none exists yet
    pub fn dictionary(&self) -> Result<&TermDictionary> {
        match &self.dictionary {
            Some(dictionary) if !dictionary.is_empty() => Ok(dictionary),
            _ => Err(IndexError::MissingDictionary(self.name.clone())),
        }
    }

    pub fn has_dictionary(&self) -> bool {
        self.dictionary.is_some()
    }

    /// Size of the built FST in bytes
    pub fn dictionary_bytes(&self) -> usize {
        self.dictionary.as_ref().map_or(0, |d| d.as_bytes().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_reuses_term_ids() {
        let mut counter = IdCounter::new();
        let mut field = IndexedField::new(FieldId::new(0), "first_name");
        assert!(!field.is_dirty());

        let kevin = field.stage("kevin", &mut counter).unwrap();
        let eric = field.stage("eric", &mut counter).unwrap();
        let kevin_again = field.stage("kevin", &mut counter).unwrap();

        assert_eq!(kevin, kevin_again);
        assert_ne!(kevin, eric);
        assert_eq!(field.term_count(), 2);
        assert!(field.is_dirty());
    }

    #[test]
    fn test_failed_stage_leaves_field_clean() {
        let mut counter = IdCounter::starting_at(u32::MAX);
        let mut field = IndexedField::new(FieldId::new(0), "first_name");

        assert!(field.stage("kevin", &mut counter).is_err());
        assert!(!field.is_dirty());
        assert_eq!(field.term_count(), 0);
    }

    #[test]
    fn test_dictionary_missing_before_build() {
        let field = IndexedField::new(FieldId::new(3), "last_name");
        let err = field.dictionary().unwrap_err();
        assert!(matches!(err, IndexError::MissingDictionary(name) if name == "last_name"));
    }

    #[test]
    fn test_rebuild_clears_dirty_flag_and_keeps_old_terms() {
        let mut counter = IdCounter::new();
        let mut field = IndexedField::new(FieldId::new(0), "first_name");

        field.stage("kevin", &mut counter).unwrap();
        field.rebuild_dictionary().unwrap();
        assert!(!field.is_dirty());

        field.stage("angela", &mut counter).unwrap();
        assert!(field.is_dirty());
        let dict = field.rebuild_dictionary().unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("kevin").unwrap(), Some(TermId::new(0)));
        assert_eq!(dict.get("angela").unwrap(), Some(TermId::new(1)));
        assert!(field.dictionary_bytes() > 0);
    }
}
