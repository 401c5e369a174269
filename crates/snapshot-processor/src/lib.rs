//! Snapshot processing for EPOCH particle-in-cell output.
//!
//! This crate ties a snapshot decoder to the grid model of `pic-common` and
//! the key discovery of `sdf-catalog`:
//!
//! - [`SnapshotHandler`] loads one snapshot at a time and serves density,
//!   temperature, field, current, particle and scalar data by name
//! - [`CoordinateResolver`] derives cylindrical and spherical components of
//!   vector quantities
//! - [`transform`] holds plane projections and crops
//! - [`SnapshotFolder`] lists the snapshots of an output directory
//!
//! # Example
//!
//! ```
//! use pic_common::Component;
//! use snapshot_processor::testdata::{midpoints, MemoryDecoder, MemorySnapshot};
//! use snapshot_processor::{HandlerConfig, SnapshotHandler};
//!
//! let snapshot = MemorySnapshot::new(vec![midpoints(0.0, 1.0, 4)])
//!     .with_block("Electric_Field_Ex", ndarray::arr1(&[1.0, 2.0, 3.0, 4.0]).into_dyn());
//! let decoder = MemoryDecoder::new().with("0000.sdf", snapshot);
//!
//! let mut handler = SnapshotHandler::new(decoder, HandlerConfig::default());
//! handler.read("0000.sdf").unwrap();
//!
//! let ex = handler.electric_field(Component::X).unwrap();
//! assert_eq!(ex.len(), 4);
//! assert!(handler.electric_field(Component::Y).is_err());
//! ```

pub mod config;
pub mod error;
pub mod folder;
pub mod handler;
pub mod logging;
pub mod resolver;
pub mod source;
pub mod testdata;
pub mod transform;

pub use config::HandlerConfig;
pub use error::{DecoderError, Result, SnapshotError};
pub use folder::SnapshotFolder;
pub use handler::{LoadedSnapshot, SnapshotHandler};
pub use logging::LogSession;
pub use resolver::{CoordinateResolver, GridSource, ParticleSource, VectorSource};
pub use source::{SnapshotDecoder, SnapshotHandle, SnapshotHeader};
pub use transform::{GridCrop, PlaneProjection};
