//! In-memory snapshots for tests and programmatic use.
//!
//! [`MemoryDecoder`] maps paths to [`MemorySnapshot`]s assembled in code, so
//! the handler can be exercised without SDF files on disk. The generator
//! functions build arrays with known values:
//!
//! | Function | Values |
//! |----------|--------|
//! | [`position_field`] | the grid coordinate along one axis |
//! | [`index_field`] | `i*10000 + j*100 + k` for cell `(i, j, k)` |
//! | [`particle_block`] | `(axis, particle)` coordinate rows |

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use ndarray::{Array2, ArrayD, Dimension, IxDyn};
use pic_common::{Axis, Grid};
use thiserror::Error;

use crate::error::Result as SnapshotResult;
use crate::resolver::position_mesh;
use crate::source::{SnapshotDecoder, SnapshotHandle, SnapshotHeader};

/// Errors raised by the in-memory decoder.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    #[error("no snapshot registered at {0}")]
    NotFound(PathBuf),

    #[error("key not found: {0}")]
    MissingKey(String),
}

/// A snapshot held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    blocks: BTreeMap<String, ArrayD<f64>>,
    midpoints: Vec<Vec<f64>>,
    header: SnapshotHeader,
}

impl MemorySnapshot {
    pub fn new(midpoints: Vec<Vec<f64>>) -> Self {
        Self {
            midpoints,
            ..Self::default()
        }
    }

    pub fn with_block(mut self, key: impl Into<String>, data: ArrayD<f64>) -> Self {
        self.blocks.insert(key.into(), data);
        self
    }

    pub fn with_time(mut self, time: f64) -> Self {
        self.header.time = time;
        self
    }

    pub fn with_header(mut self, header: SnapshotHeader) -> Self {
        self.header = header;
        self
    }
}

impl SnapshotHandle for MemorySnapshot {
    type Error = MemoryError;

    fn raw_keys(&self) -> Vec<String> {
        self.blocks.keys().cloned().collect()
    }

    fn fetch(&self, key: &str) -> Result<ArrayD<f64>, MemoryError> {
        self.blocks
            .get(key)
            .cloned()
            .ok_or_else(|| MemoryError::MissingKey(key.to_string()))
    }

    fn midpoints(&self) -> Result<Vec<Vec<f64>>, MemoryError> {
        Ok(self.midpoints.clone())
    }

    fn header(&self) -> &SnapshotHeader {
        &self.header
    }
}

/// Decoder serving registered [`MemorySnapshot`]s by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryDecoder {
    snapshots: BTreeMap<PathBuf, MemorySnapshot>,
}

impl MemoryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, snapshot: MemorySnapshot) {
        self.snapshots.insert(path.into(), snapshot);
    }

    pub fn with(mut self, path: impl Into<PathBuf>, snapshot: MemorySnapshot) -> Self {
        self.insert(path, snapshot);
        self
    }
}

impl SnapshotDecoder for MemoryDecoder {
    type Error = MemoryError;
    type Handle = MemorySnapshot;

    fn open(&self, path: &Path) -> Result<MemorySnapshot, MemoryError> {
        self.snapshots
            .get(path)
            .cloned()
            .ok_or_else(|| MemoryError::NotFound(path.to_path_buf()))
    }
}

/// Evenly spaced mid-points, `count` samples from `min` to `max`.
pub fn midpoints(min: f64, max: f64, count: usize) -> Vec<f64> {
    let step = (max - min) / (count.saturating_sub(1).max(1)) as f64;
    (0..count).map(|i| min + i as f64 * step).collect()
}

/// Field whose value at every cell is the cell's coordinate along `axis`.
pub fn position_field(grid: &Grid, axis: Axis) -> SnapshotResult<ArrayD<f64>> {
    position_mesh(grid, axis, &grid.shape())
}

/// Field of the grid's shape with value `i*10000 + j*100 + k`.
pub fn index_field(grid: &Grid) -> ArrayD<f64> {
    ArrayD::from_shape_fn(IxDyn(&grid.shape()), |idx| {
        idx.slice()
            .iter()
            .fold(0.0, |acc, &i| acc * 100.0 + i as f64)
    })
}

/// Particle coordinate block of shape `(rows.len(), particles)`.
pub fn particle_block(rows: &[Vec<f64>]) -> ArrayD<f64> {
    let particles = rows.first().map(|r| r.len()).unwrap_or(0);
    Array2::from_shape_fn((rows.len(), particles), |(axis, p)| rows[axis][p]).into_dyn()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoints_endpoints() {
        let samples = midpoints(-1.0, 1.0, 5);
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[0], -1.0);
        assert!((samples[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_index_field_pattern() {
        let grid = Grid::from_midpoints(&[midpoints(0.0, 1.0, 3), midpoints(0.0, 1.0, 4)]).unwrap();
        let field = index_field(&grid);
        assert_eq!(field.shape(), &[3, 4]);
        assert_eq!(field[IxDyn(&[2, 3])], 203.0);
    }

    #[test]
    fn test_decoder_lookup() {
        let decoder = MemoryDecoder::new().with("a.sdf", MemorySnapshot::new(vec![]).with_time(1.0));
        assert_eq!(decoder.open(Path::new("a.sdf")).unwrap().header().time, 1.0);
        assert_eq!(
            decoder.open(Path::new("b.sdf")).unwrap_err(),
            MemoryError::NotFound(PathBuf::from("b.sdf"))
        );
    }

    #[test]
    fn test_particle_block_layout() {
        let block = particle_block(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(block.shape(), &[2, 2]);
        assert_eq!(block[IxDyn(&[1, 0])], 3.0);
    }
}
