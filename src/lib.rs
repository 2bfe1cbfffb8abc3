pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod segment;

pub use config::{RegexConfig, SegmentConfig};
pub use error::{IndexError, Result};
pub use models::*;
pub use query::{Query, QueryBuilder, QueryRef, RegexTermQuery};
pub use segment::Segment;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
