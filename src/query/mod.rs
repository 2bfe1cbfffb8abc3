//! Query construction and execution
//!
//! Leaf queries resolve against a single field of a [`Segment`](crate::Segment)
//! and produce a bitmap of docnos; the [`QueryBuilder`] composes leaves into
//! groups and translates the final bitmap into external document ids.
//!
//! # Example
//!
//! ```rust
//! use sidonia::query::{Query, QueryBuilder, RegexTermQuery};
//! use sidonia::{Segment, SimpleDocument};
//!
//! let mut segment = Segment::new();
//! segment
//!     .index_documents(&[SimpleDocument::new("doc:1")
//!         .with_field("first_name", "kevin")
//!         .with_field("last_name", "manning")])
//!     .unwrap();
//!
//! let results = QueryBuilder::new(&segment)
//!     .and([
//!         RegexTermQuery::new("first_name", "kev.*").into_ref(),
//!         RegexTermQuery::new("last_name", "manning").into_ref(),
//!     ])
//!     .run()
//!     .unwrap();
//! assert_eq!(results.external_doc_ids, vec!["doc:1"]);
//! ```

pub mod ast;
pub mod builder;
pub mod nodes;

pub use ast::{Query, QueryRef};
pub use builder::{Combinator, QueryBuilder};
pub use nodes::{PrefixQuery, RegexTermQuery, TermQuery};
