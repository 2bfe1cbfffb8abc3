//! Leaf query implementations

mod prefix_query;
mod regex_term_query;
mod term_query;

pub use prefix_query::PrefixQuery;
pub use regex_term_query::RegexTermQuery;
pub use term_query::TermQuery;
