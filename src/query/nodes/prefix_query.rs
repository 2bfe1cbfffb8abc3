//! Prefix query - matches terms starting with a literal prefix

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use crate::query::ast::Query;
use crate::segment::Segment;
use crate::Result;

/// Query that matches every term of a field beginning with `prefix`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixQuery {
    /// Field to search in
    pub field: String,
    /// Literal prefix; no pattern syntax
    pub prefix: String,
}

impl PrefixQuery {
    pub fn new(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            prefix: prefix.into(),
        }
    }
}

impl Query for PrefixQuery {
    fn query_type(&self) -> &'static str {
        "prefix"
    }

    fn execute(&self, segment: &Segment) -> Result<RoaringBitmap> {
        segment.query_prefix(&self.field, &self.prefix)
    }
}
