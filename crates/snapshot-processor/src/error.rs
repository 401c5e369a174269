//! Error types for snapshot loading and field access.

use pic_common::PicError;
use sdf_catalog::CatalogError;
use thiserror::Error;

/// Boxed error produced by a snapshot decoder.
pub type DecoderError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while loading or querying a snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// Grid construction or dimensionality failure.
    #[error(transparent)]
    Grid(#[from] PicError),

    /// Key discovery failure.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Error reported by the decoder, passed through untouched.
    #[error("{0}")]
    Decoder(#[source] DecoderError),

    /// An accessor was called before any snapshot was read.
    #[error("no snapshot loaded")]
    NotLoaded,

    /// The field is not present in the loaded snapshot.
    #[error("field not found: {0}")]
    UnknownField(String),

    /// The field exists but not with the requested component.
    #[error("component '{component}' not found for {field}")]
    UnknownComponent { field: String, component: String },

    /// The field exists but not for the requested species.
    #[error("species '{species}' not found for {field}")]
    UnknownSpecies { field: String, species: String },

    /// The catalog accepted a request but the assembled key was never seen
    /// during discovery.
    #[error("key not found: {0}")]
    MissingKey(String),

    /// Arrays that must line up have different shapes.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Crop bounds are not increasing.
    #[error("invalid crop: {0}")]
    InvalidCrop(String),

    /// Filesystem error while scanning snapshot folders.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SnapshotError {
    /// Wrap a decoder error.
    pub fn decoder<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Decoder(Box::new(err))
    }

    pub fn unknown_component(field: impl Into<String>, component: impl Into<String>) -> Self {
        Self::UnknownComponent {
            field: field.into(),
            component: component.into(),
        }
    }

    pub fn unknown_species(field: impl Into<String>, species: impl Into<String>) -> Self {
        Self::UnknownSpecies {
            field: field.into(),
            species: species.into(),
        }
    }

    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// The original decoder error, if this is one.
    pub fn decoder_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Decoder(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    /// Whether the error is a request for a component beyond the grid's axes.
    pub fn is_unsupported_dimension(&self) -> bool {
        matches!(self, Self::Grid(PicError::UnsupportedDimension { .. }))
    }
}

/// Result type for snapshot operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;
