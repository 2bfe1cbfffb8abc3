use roaring::RoaringBitmap;
use serde::Serialize;

/// Result of running a query against a segment
#[derive(Clone, Debug, Default, Serialize)]
pub struct SearchResults {
    #[serde(skip)]
    internal_doc_ids: RoaringBitmap,
    /// External ids in ascending internal-id order
    pub external_doc_ids: Vec<String>,
}

impl SearchResults {
    pub fn new(internal_doc_ids: RoaringBitmap, external_doc_ids: Vec<String>) -> Self {
        Self {
            internal_doc_ids,
            external_doc_ids,
        }
    }

    /// The matching internal doc ids
    pub fn internal_doc_ids(&self) -> &RoaringBitmap {
        &self.internal_doc_ids
    }

    pub fn len(&self) -> usize {
        self.external_doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.external_doc_ids.is_empty()
    }

    pub fn contains(&self, external_id: &str) -> bool {
        self.external_doc_ids.iter().any(|id| id == external_id)
    }
}
