//! Core query trait
//!
//! Every query node resolves to a bitmap of docnos within one segment.
//! The builder combines those bitmaps; translating them back to external
//! ids happens once, when the query is run.

use std::fmt::Debug;
use std::sync::Arc;

use roaring::RoaringBitmap;

use crate::error::{IndexError, Result};
use crate::segment::Segment;

/// Reference-counted query node, shareable between builders
pub type QueryRef = Arc<dyn Query>;

/// A node that can be composed by [`QueryBuilder`](super::QueryBuilder)
pub trait Query: Send + Sync + Debug {
    /// Short name used in logs and errors
    fn query_type(&self) -> &'static str;

    /// Resolve the query to matching docnos.
    ///
    /// Node kinds the engine does not know how to evaluate keep the default,
    /// which fails with [`IndexError::UnsupportedQueryType`].
    fn execute(&self, _segment: &Segment) -> Result<RoaringBitmap> {
        Err(IndexError::UnsupportedQueryType(self.query_type()))
    }

    /// Wrap this node for use with the builder
    fn into_ref(self) -> QueryRef
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}
