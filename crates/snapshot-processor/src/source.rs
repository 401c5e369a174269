//! Decoder boundary: how snapshots are opened and read.
//!
//! The binary SDF layout is decoded elsewhere. Anything that can turn a
//! path into a flat mapping of block name to array implements
//! [`SnapshotDecoder`].

use std::path::Path;

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// Header and run metadata of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    /// Simulation time in seconds.
    pub time: f64,
    /// Output step number.
    pub step: Option<i64>,
    /// Code that wrote the file (e.g. "Epoch2d").
    pub code_name: Option<String>,
    /// Job identifier shared by all dumps of one run.
    pub job_id: Option<String>,
}

/// An opened snapshot.
///
/// Grid fields are fetched as arrays whose dimensions follow the grid axes
/// in x, y, z order. Particle coordinate blocks are 2-D with shape
/// `(axis, particle)`.
pub trait SnapshotHandle {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every top-level block name in the snapshot.
    fn raw_keys(&self) -> Vec<String>;

    /// Read one block. Fails if the key is absent.
    fn fetch(&self, key: &str) -> Result<ArrayD<f64>, Self::Error>;

    /// Cell mid-point coordinates, one array per axis in x, y, z order.
    fn midpoints(&self) -> Result<Vec<Vec<f64>>, Self::Error>;

    fn header(&self) -> &SnapshotHeader;
}

/// Opens snapshot files.
pub trait SnapshotDecoder {
    type Error: std::error::Error + Send + Sync + 'static;
    type Handle: SnapshotHandle<Error = Self::Error>;

    fn open(&self, path: &Path) -> Result<Self::Handle, Self::Error>;
}
