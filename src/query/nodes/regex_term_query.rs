//! Regex term query - matches docs whose field holds a term fully matching a pattern
//!
//! # Example
//!
//! ```rust
//! use sidonia::query::RegexTermQuery;
//!
//! let query = RegexTermQuery::new("first_name", "kev.*");
//! ```

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use crate::query::ast::Query;
use crate::segment::Segment;
use crate::Result;

/// Leaf query resolved by walking a field's term dictionary with a regex
///
/// The pattern must match a whole term: `kev.*` matches `kevin`, `evin`
/// does not. A pattern can match several terms, in which case the result
/// is the union of their postings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegexTermQuery {
    /// Field to search in
    pub field: String,
    /// Regular expression over whole terms
    pub pattern: String,
}

impl RegexTermQuery {
    pub fn new(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            pattern: pattern.into(),
        }
    }
}

impl Query for RegexTermQuery {
    fn query_type(&self) -> &'static str {
        "regex_term"
    }

    fn execute(&self, segment: &Segment) -> Result<RoaringBitmap> {
        segment.query_regex(&self.field, &self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SimpleDocument;
    use crate::IndexError;

    #[test]
    fn test_regex_term_query_creation() {
        let query = RegexTermQuery::new("first_name", "kev.*");
        assert_eq!(query.field, "first_name");
        assert_eq!(query.pattern, "kev.*");
        assert_eq!(query.query_type(), "regex_term");
    }

    #[test]
    fn test_regex_term_query_execute() {
        let mut segment = Segment::new();
        segment
            .index_documents(&[
                SimpleDocument::new("a").with_field("first_name", "kevin"),
                SimpleDocument::new("b").with_field("first_name", "kevina"),
                SimpleDocument::new("c").with_field("first_name", "akevin"),
            ])
            .unwrap();

        let docs = RegexTermQuery::new("first_name", "kev.*").execute(&segment).unwrap();
        assert_eq!(docs.iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_regex_term_query_deserialize() {
        let query: RegexTermQuery =
            serde_json::from_str(r#"{"field": "last_name", "pattern": "man.*"}"#).unwrap();
        assert_eq!(query, RegexTermQuery::new("last_name", "man.*"));
    }

    #[test]
    fn test_regex_term_query_unknown_field() {
        let segment = Segment::new();
        let err = RegexTermQuery::new("nope", ".*").execute(&segment).unwrap_err();
        assert!(matches!(err, IndexError::UnknownField(_)));
    }
}
