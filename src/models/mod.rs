pub mod document;
pub mod search;
pub mod value;

pub use document::{Document, SimpleDocument};
pub use search::SearchResults;
pub use value::{Value, ValueType};
