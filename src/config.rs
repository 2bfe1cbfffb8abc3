use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};

/// Segment configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Deserialize every rebuilt term dictionary at the end of ingestion
    /// instead of on the first query that touches its field.
    pub preload_dictionaries: bool,
    pub regex: RegexConfig,
}

/// Options applied when compiling a leaf pattern into an automaton
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegexConfig {
    pub case_insensitive: bool,
    pub unicode: bool,
    /// Minimize the DFA after construction (slower compile, smaller automaton)
    pub minimize: bool,
    /// Maximum nesting depth accepted by the pattern parser
    pub nest_limit: u32,
    /// Upper bound in bytes on the compiled NFA, the DFA, and the memory
    /// spent determinizing; larger patterns are rejected as invalid
    pub size_limit: usize,
}

/// Default compiled-pattern budget (10 MiB)
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

impl Default for RegexConfig {
    fn default() -> Self {
        Self {
            case_insensitive: false,
            unicode: true,
            minimize: false,
            nest_limit: 250,
            size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

impl SegmentConfig {
    /// Parse a configuration from JSON, filling missing keys with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SegmentConfig =
            serde_json::from_str(json).map_err(|e| IndexError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.regex.nest_limit == 0 {
            return Err(IndexError::InvalidConfig(
                "regex.nest_limit must be greater than zero".to_string(),
            ));
        }
        if self.regex.size_limit == 0 {
            return Err(IndexError::InvalidConfig(
                "regex.size_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_preload_dictionaries(mut self, preload: bool) -> Self {
        self.preload_dictionaries = preload;
        self
    }

    pub fn with_regex_size_limit(mut self, size_limit: usize) -> Self {
        self.regex.size_limit = size_limit;
        self
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.regex.case_insensitive = case_insensitive;
        self
    }
}
