//! Error types for grid, unit and component handling.

use thiserror::Error;

/// Result type alias using PicError.
pub type PicResult<T> = Result<T, PicError>;

/// Errors raised by the shared grid and lookup types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PicError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Unknown axis '{axis}' for a {dim}D grid")]
    UnknownAxis { axis: String, dim: usize },

    #[error("Unknown component: {0}")]
    UnknownComponent(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Component '{component}' is not available on a {dim}D grid")]
    UnsupportedDimension { component: String, dim: usize },
}

impl PicError {
    /// Create an InvalidGrid error.
    pub fn invalid_grid(msg: impl Into<String>) -> Self {
        Self::InvalidGrid(msg.into())
    }

    /// Create an UnsupportedDimension error.
    pub fn unsupported_dimension(component: impl Into<String>, dim: usize) -> Self {
        Self::UnsupportedDimension {
            component: component.into(),
            dim,
        }
    }
}
