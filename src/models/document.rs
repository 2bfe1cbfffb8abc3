use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::Value;

/// Row accessor consumed by the indexer
///
/// Implement this for whatever record type feeds a segment. The timestamp
/// is carried along but not used when building or querying the index.
pub trait Document {
    /// External, caller-assigned document id
    fn id(&self) -> &str;

    fn get(&self, field: &str) -> Option<&Value>;

    /// All (field name, value) pairs of the document
    fn row(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_>;

    fn timestamp(&self) -> DateTime<Utc>;
}

impl<D: Document + ?Sized> Document for &D {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn get(&self, field: &str) -> Option<&Value> {
        (**self).get(field)
    }

    fn row(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        (**self).row()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        (**self).timestamp()
    }
}

impl<D: Document + ?Sized> Document for Box<D> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn get(&self, field: &str) -> Option<&Value> {
        (**self).get(field)
    }

    fn row(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        (**self).row()
    }

    fn timestamp(&self) -> DateTime<Utc> {
        (**self).timestamp()
    }
}

/// Owned document backed by a hash map
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimpleDocument {
    pub id: String,
    pub fields: HashMap<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl SimpleDocument {
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_timestamp(id, HashMap::new(), Utc::now())
    }

    pub fn with_timestamp(
        id: impl Into<String>,
        fields: HashMap<String, Value>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            fields,
            timestamp,
        }
    }

    /// Set a field, replacing any previous value
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }
}

impl Document for SimpleDocument {
    fn id(&self) -> &str {
        &self.id
    }

    fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    fn row(&self) -> Box<dyn Iterator<Item = (&str, &Value)> + '_> {
        Box::new(self.fields.iter().map(|(k, v)| (k.as_str(), v)))
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
