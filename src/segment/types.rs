//! Core id types for the segment index

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IndexError, Result};

/// Dense, zero-based id assigned by an [`Interner`](super::Interner)
pub trait InternalId: Copy + Eq + std::hash::Hash + fmt::Debug {
    fn from_raw(raw: u32) -> Self;

    fn raw(self) -> u32;
}

macro_rules! internal_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn new(n: u32) -> Self {
                Self(n)
            }

            pub fn as_u32(self) -> u32 {
                self.0
            }

            pub fn as_usize(self) -> usize {
                self.0 as usize
            }
        }

        impl InternalId for $name {
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

internal_id!(
    /// Dense document number within a segment (0..doc_count)
    DocNo,
    "doc"
);

internal_id!(
    /// Interned field name
    FieldId,
    "field"
);

internal_id!(
    /// Segment-global term id, shared by every field's term map
    TermId,
    "term"
);

/// Monotonic id source; ids are never reused or compacted.
///
/// At most `u32::MAX` ids are issued, so `issued()` always fits in a `u32`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdCounter {
    next: u32,
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A counter whose next id is `first`
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// Hand out the next id, or `Internal` once the id space is exhausted
    pub fn allocate<I: InternalId>(&mut self) -> Result<I> {
        let raw = self.next;
        self.next = raw
            .checked_add(1)
            .ok_or_else(|| IndexError::Internal(format!("id space exhausted after {raw} ids")))?;
        Ok(I::from_raw(raw))
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u32 {
        self.next
    }
}
