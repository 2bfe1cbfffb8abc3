use thiserror::Error;

/// Main error type for segment ingestion and query operations
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("no field-id found for field: {0}")]
    UnknownField(String),

    #[error("no term dictionary found for field: {0}")]
    MissingDictionary(String),

    #[error("term dictionary for field {0} has no terms")]
    EmptyDictionary(String),

    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("failed loading term dictionary for field {field}: {source}")]
    DictionaryLoad {
        field: String,
        #[source]
        source: fst::Error,
    },

    #[error("failed building term dictionary for field {field}: {source}")]
    DictionaryBuild {
        field: String,
        #[source]
        source: fst::Error,
    },

    #[error("found an internal doc id without an external doc id mapping: id:{0}")]
    DanglingInternalId(u32),

    #[error("unsupported query type: {0}")]
    UnsupportedQueryType(&'static str),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for index operations
pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    /// Errors caused by the request itself rather than by index state
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            IndexError::UnknownField(_)
                | IndexError::InvalidPattern { .. }
                | IndexError::UnsupportedQueryType(_)
                | IndexError::InvalidConfig(_)
        )
    }

    /// Errors that point at a broken segment invariant
    pub fn is_consistency_error(&self) -> bool {
        matches!(
            self,
            IndexError::DanglingInternalId(_)
                | IndexError::DictionaryLoad { .. }
                | IndexError::Internal(_)
        )
    }
}
