//! Error types for field lookup and key discovery.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while building or querying a catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A raw key matched a field prefix but its tail could not be parsed.
    #[error("malformed key '{key}': {reason}")]
    MalformedKey { key: String, reason: String },

    /// A field name did not match any known field kind.
    #[error("unknown field kind: {0}")]
    UnknownFieldKind(String),
}

impl CatalogError {
    pub fn malformed_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
