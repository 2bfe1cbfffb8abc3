//! Term query - exact match on a field

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use crate::query::ast::Query;
use crate::segment::Segment;
use crate::Result;

/// Query that matches documents containing an exact term in a field
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermQuery {
    /// Field to search in
    pub field: String,
    /// Exact term to match
    pub term: String,
}

impl TermQuery {
    pub fn new(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            term: term.into(),
        }
    }
}

impl Query for TermQuery {
    fn query_type(&self) -> &'static str {
        "term"
    }

    fn execute(&self, segment: &Segment) -> Result<RoaringBitmap> {
        segment.query_term(&self.field, &self.term)
    }
}
