//! In-memory segment: interners, per-field term dictionaries and postings
//!
//! A segment is written by a single caller through [`Segment::index_documents`]
//! and may be queried by any number of readers between ingestion calls.
//! Every call rebuilds the term dictionary of each field it touched.

use std::collections::HashMap;

use fst::automaton::Str;
use fst::Automaton;
use roaring::RoaringBitmap;
use tracing::{debug, info, warn};

use super::automaton::RegexAutomaton;
use super::field::IndexedField;
use super::interner::Interner;
use super::postings::{PostingsStore, TermPostings};
use super::statistics::SegmentStats;
use super::term_dict::TermDictionary;
use super::types::{DocNo, FieldId, IdCounter, TermId};
use crate::config::SegmentConfig;
use crate::error::{IndexError, Result};
use crate::models::{Document, Value};

/// A self-contained in-memory index over one or more document batches
#[derive(Debug)]
pub struct Segment {
    config: SegmentConfig,
    /// External document id <-> docno
    docs: Interner<String, DocNo>,
    /// Field name <-> field id
    fields: Interner<String, FieldId>,
    indexed_fields: HashMap<FieldId, IndexedField>,
    /// Segment-global term id source shared by every field
    term_ids: IdCounter,
    postings: PostingsStore,
}

impl Segment {
    pub fn new() -> Self {
        Self::from_parts(SegmentConfig::default())
    }

    /// Create a segment with a validated configuration
    pub fn with_config(config: SegmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(config))
    }

    fn from_parts(config: SegmentConfig) -> Self {
        Self {
            config,
            docs: Interner::new(),
            fields: Interner::new(),
            indexed_fields: HashMap::new(),
            term_ids: IdCounter::new(),
            postings: PostingsStore::new(),
        }
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Index a batch of documents, then rebuild the term dictionary of
    /// every field the batch touched.
    ///
    /// Nil, errored and non-string values are skipped. A dictionary build
    /// failure or id exhaustion aborts the call; ids interned before the
    /// failure are kept, and fields left dirty are rebuilt by the next call.
    pub fn index_documents<I>(&mut self, docs: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Document,
    {
        let mut doc_count = 0usize;
        let mut term_count = 0usize;

        for doc in docs {
            // Known ids are reused; earlier postings for them are not retracted
            let docno = self.docs.intern(doc.id())?;
            doc_count += 1;

            for (field, value) in doc.row() {
                if value.is_nil() {
                    debug!(doc_id = doc.id(), field, "skipping nil value");
                    continue;
                }
                if value.is_error() {
                    debug!(doc_id = doc.id(), field, "skipping value in error state");
                    continue;
                }

                match value {
                    Value::String(term) => {
                        self.index_string_term(docno, field, term)?;
                        term_count += 1;
                    }
                    other => {
                        info!(
                            field,
                            value_type = %other.value_type(),
                            "value type isn't currently supported"
                        );
                    }
                }
            }
        }

        let rebuilt = self.build_dictionaries()?;

        debug!(
            docs = doc_count,
            fields = rebuilt,
            terms = term_count,
            "indexed document batch"
        );
        Ok(())
    }

    fn index_string_term(&mut self, docno: DocNo, field: &str, term: &str) -> Result<()> {
        let field_id = self.fields.intern(field)?;
        let indexed = self
            .indexed_fields
            .entry(field_id)
            .or_insert_with(|| IndexedField::new(field_id, field));

        let term_id = indexed.stage(term, &mut self.term_ids)?;
        self.postings.record(term_id, docno);
        Ok(())
    }

    /// Rebuild every dirty field's dictionary in field-id order, returning
    /// how many were rebuilt
    fn build_dictionaries(&mut self) -> Result<usize> {
        let preload = self.config.preload_dictionaries;

        let mut dirty: Vec<FieldId> = self
            .indexed_fields
            .values()
            .filter(|f| f.is_dirty())
            .map(IndexedField::id)
            .collect();
        dirty.sort_unstable();

        for field_id in &dirty {
            let Some(field) = self.indexed_fields.get_mut(field_id) else {
                continue;
            };

            let dictionary = field.rebuild_dictionary().inspect_err(|err| {
                warn!(error = %err, "term dictionary build failed");
            })?;
            if preload {
                dictionary.load()?;
            }

            let (terms, bytes) = (dictionary.len(), dictionary.as_bytes().len());
            debug!(field = field.name(), terms, bytes, "rebuilt term dictionary");
        }
        Ok(dirty.len())
    }

    /// Docs containing any term of `field` that fully matches `pattern`
    pub fn query_regex(&self, field: &str, pattern: &str) -> Result<RoaringBitmap> {
        let indexed = self.indexed_field(field)?;
        let automaton = RegexAutomaton::compile(pattern, &self.config.regex)?;
        self.search_field(indexed, &automaton)
    }

    /// Docs containing any term of `field` starting with `prefix`
    pub fn query_prefix(&self, field: &str, prefix: &str) -> Result<RoaringBitmap> {
        let indexed = self.indexed_field(field)?;
        self.search_field(indexed, Str::new(prefix).starts_with())
    }

    /// Docs containing exactly `term` in `field`
    pub fn query_term(&self, field: &str, term: &str) -> Result<RoaringBitmap> {
        let indexed = self.indexed_field(field)?;
        let mut docs = RoaringBitmap::new();
        if let Some(term_id) = indexed.dictionary()?.get(term)? {
            self.postings.union_into(term_id, &mut docs);
        }
        Ok(docs)
    }

    /// Walk the field's dictionary with `automaton` and union the postings
    /// of every matched term.
    fn search_field<A: Automaton>(&self, field: &IndexedField, automaton: A) -> Result<RoaringBitmap> {
        let dictionary = field.dictionary()?;

        let mut docs = RoaringBitmap::new();
        for (term, term_id) in dictionary.search(automaton)? {
            if !self.postings.union_into(term_id, &mut docs) {
                warn!(
                    field = field.name(),
                    term = %String::from_utf8_lossy(&term),
                    %term_id,
                    "dictionary term has no postings"
                );
            }
        }
        Ok(docs)
    }

    fn indexed_field(&self, name: &str) -> Result<&IndexedField> {
        self.fields
            .internal_id(name)
            .and_then(|id| self.indexed_fields.get(&id))
            .ok_or_else(|| IndexError::UnknownField(name.to_string()))
    }

    /// Translate a bitmap of docnos into external document ids
    pub fn external_ids(&self, docs: &RoaringBitmap) -> Result<Vec<String>> {
        let mut ids = Vec::with_capacity(docs.len() as usize);
        for docno in docs.iter() {
            match self.docs.external_id(DocNo::new(docno)) {
                Some(id) => ids.push(id.clone()),
                None => {
                    warn!(docno, "found an internal doc id without an external doc id mapping");
                    return Err(IndexError::DanglingInternalId(docno));
                }
            }
        }
        Ok(ids)
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Distinct (field, term) pairs seen so far
    pub fn term_count(&self) -> usize {
        self.term_ids.issued() as usize
    }

    /// Field names in field-id order
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<(FieldId, &str)> = self
            .fields
            .iter()
            .map(|(name, id)| (id, name.as_str()))
            .collect();
        names.sort_unstable();
        names.into_iter().map(|(_, name)| name).collect()
    }

    pub fn field_id(&self, field: &str) -> Option<FieldId> {
        self.fields.internal_id(field)
    }

    pub fn internal_doc_id(&self, external_id: &str) -> Option<DocNo> {
        self.docs.internal_id(external_id)
    }

    pub fn external_doc_id(&self, docno: DocNo) -> Option<&str> {
        self.docs.external_id(docno).map(String::as_str)
    }

    pub fn term_id(&self, field: &str, term: &str) -> Option<TermId> {
        self.indexed_field(field).ok()?.term_id(term)
    }

    /// Postings of `term` in `field`, if the pair has been indexed
    pub fn term_postings(&self, field: &str, term: &str) -> Option<&TermPostings> {
        self.postings.get(self.term_id(field, term)?)
    }

    /// The built term dictionary of `field`
    pub fn dictionary(&self, field: &str) -> Result<&TermDictionary> {
        self.indexed_field(field)?.dictionary()
    }

    pub fn stats(&self) -> SegmentStats {
        let fields = self.indexed_fields.values();
        SegmentStats {
            doc_count: self.doc_count(),
            field_count: self.field_count(),
            term_count: self.term_count(),
            dictionaries: fields.clone().filter(|f| f.has_dictionary()).count(),
            dictionary_bytes: fields.map(IndexedField::dictionary_bytes).sum(),
            postings_bytes: self.postings.bitmap_bytes(),
        }
    }
}

impl Default for Segment {
    fn default() -> Self {
        Self::new()
    }
}
