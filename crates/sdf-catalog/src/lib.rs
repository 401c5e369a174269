//! Structural discovery for EPOCH SDF snapshots.
//!
//! SDF files expose a flat namespace of block names such as
//! `Electric_Field_Ex`, `Derived_Number_Density_electron` or
//! `Particles_Px_proton`. This crate maps those names onto a closed set of
//! [`FieldKind`]s and records which components and species are present.
//!
//! # Example
//!
//! ```
//! use sdf_catalog::{DataCatalog, FieldKind, FieldToken};
//!
//! let catalog = DataCatalog::discover([
//!     "Electric_Field_Ex",
//!     "Derived_Number_Density_electron",
//!     "Particles_Px_electron",
//! ])
//! .unwrap();
//!
//! assert!(catalog.has_grid_token(FieldKind::ElectricField, &FieldToken::component("x")));
//! assert!(catalog.species().contains("electron"));
//! ```

pub mod catalog;
pub mod error;
pub mod fields;

pub use catalog::{DataCatalog, FieldToken, ParticleSlot};
pub use error::{CatalogError, CatalogResult};
pub use fields::{FieldClass, FieldKind, KeyShape};
