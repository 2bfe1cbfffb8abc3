//! Query builder: accumulates groups of leaf queries and runs them
//!
//! Each call to [`QueryBuilder::and`] adds one group whose children are
//! intersected. Groups added by successive calls are unioned with each
//! other, so
//!
//! ```text
//! builder.and([a, b]).and([c, d])  ==  (a ∩ b) ∪ (c ∩ d)
//! ```
//!
//! and not `a ∩ b ∩ c ∩ d`. To intersect more queries, pass them all to a
//! single `and` call.

use std::fmt;

use roaring::RoaringBitmap;
use tracing::{debug, error};

use super::ast::QueryRef;
use crate::error::Result;
use crate::models::SearchResults;
use crate::segment::Segment;

/// How the children of one group are combined
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

#[derive(Clone, Debug)]
struct QueryGroup {
    combinator: Combinator,
    queries: Vec<QueryRef>,
}

impl QueryGroup {
    /// Every child is evaluated, so an error in any child surfaces even
    /// when the running intersection is already empty.
    fn evaluate(&self, segment: &Segment) -> Result<RoaringBitmap> {
        let mut result = RoaringBitmap::new();

        for (i, query) in self.queries.iter().enumerate() {
            let matches = query.execute(segment)?;
            match self.combinator {
                // Seed with the first child's docs
                Combinator::And if i == 0 => result |= matches,
                Combinator::And => result &= matches,
                Combinator::Or => result |= matches,
            }
        }

        Ok(result)
    }
}

/// Linear query accumulator bound to one segment
///
/// The builder stays usable after [`run`](Self::run): adding more groups
/// only affects later runs, and nothing is reset implicitly.
pub struct QueryBuilder<'a> {
    segment: &'a Segment,
    groups: Vec<QueryGroup>,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(segment: &'a Segment) -> Self {
        Self {
            segment,
            groups: Vec::new(),
        }
    }

    /// Add a group matching docs that satisfy every query in `queries`.
    ///
    /// The group is unioned with whatever the builder already holds.
    pub fn and<I>(&mut self, queries: I) -> &mut Self
    where
        I: IntoIterator<Item = QueryRef>,
    {
        self.push(Combinator::And, queries)
    }

    /// Add a group matching docs that satisfy any query in `queries`
    pub fn or<I>(&mut self, queries: I) -> &mut Self
    where
        I: IntoIterator<Item = QueryRef>,
    {
        self.push(Combinator::Or, queries)
    }

    fn push<I>(&mut self, combinator: Combinator, queries: I) -> &mut Self
    where
        I: IntoIterator<Item = QueryRef>,
    {
        self.groups.push(QueryGroup {
            combinator,
            queries: queries.into_iter().collect(),
        });
        self
    }

    /// Drop every accumulated group
    pub fn reset(&mut self) -> &mut Self {
        self.groups.clear();
        self
    }

    /// True until the first `and`/`or` call
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Evaluate the accumulated groups to docnos without translating them
    pub fn evaluate(&self) -> Result<RoaringBitmap> {
        let mut result = RoaringBitmap::new();
        // Most recent group first, then everything composed before it
        for group in self.groups.iter().rev() {
            result |= group.evaluate(self.segment)?;
        }
        Ok(result)
    }

    /// Evaluate the query and translate matches to external document ids
    pub fn run(&self) -> Result<SearchResults> {
        let docs = self.evaluate().inspect_err(|err| {
            error!(error = %err, "error running query");
        })?;

        let external = self.segment.external_ids(&docs).inspect_err(|err| {
            error!(error = %err, "error translating internal doc ids");
        })?;

        debug!(groups = self.groups.len(), hits = external.len(), "query finished");
        Ok(SearchResults::new(docs, external))
    }
}

impl fmt::Debug for QueryBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}
