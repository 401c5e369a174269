//! Cropping a field to a physical range along one axis.

use ndarray::{ArrayD, Axis as NdAxis, Slice};
use pic_common::{Axis, Grid, PicError, Unit};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SnapshotError};

/// Keep the cells whose coordinate along `axis` lies in `[min, max)`.
///
/// Bounds are given in `unit` when set, otherwise in grid units (metres).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCrop {
    min: f64,
    max: f64,
    axis: Axis,
    unit: Option<Unit>,
}

impl GridCrop {
    /// Fails with `InvalidCrop` unless `max > min`.
    pub fn new(min: f64, max: f64, axis: Axis, unit: Option<Unit>) -> Result<Self> {
        if !(max > min) {
            return Err(SnapshotError::InvalidCrop(format!(
                "max ({}) should be greater than min ({})",
                max, min
            )));
        }
        Ok(Self {
            min,
            max,
            axis,
            unit,
        })
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Index range covered on `grid`, clamped to `[0, len]`.
    pub fn index_range(&self, grid: &Grid, len: usize) -> Result<(usize, usize)> {
        let axis_grid = grid.component(self.axis)?;
        let clamp = |i: i64| i.clamp(0, len as i64) as usize;

        let start = clamp(axis_grid.value_to_index(self.min, self.unit));
        let end = clamp(axis_grid.value_to_index(self.max, self.unit)).max(start);
        Ok((start, end))
    }

    /// Slice `array` along the crop axis.
    pub fn apply(&self, grid: &Grid, array: &ArrayD<f64>) -> Result<ArrayD<f64>> {
        let dim = self.axis.ordinal();
        if dim >= array.ndim() {
            return Err(PicError::unsupported_dimension(self.axis.as_str(), array.ndim()).into());
        }

        let (start, end) = self.index_range(grid, array.len_of(NdAxis(dim)))?;
        debug!(axis = %self.axis, start, end, "Cropping field");

        Ok(array
            .slice_axis(NdAxis(dim), Slice::from(start..end))
            .to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, IxDyn};
    use pic_common::AxisGrid;

    fn grid() -> Grid {
        Grid::new(vec![
            AxisGrid::new(0.0, 10.0, 10).unwrap(),
            AxisGrid::new(-20e-6, 20e-6, 4).unwrap(),
        ])
        .unwrap()
    }

    fn field() -> ArrayD<f64> {
        Array2::from_shape_fn((10, 4), |(i, j)| (i * 10 + j) as f64).into_dyn()
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        assert!(matches!(
            GridCrop::new(5.0, 5.0, Axis::X, None),
            Err(SnapshotError::InvalidCrop(_))
        ));
        assert!(GridCrop::new(5.0, 2.0, Axis::X, None).is_err());
    }

    #[test]
    fn test_crop_first_axis() {
        let crop = GridCrop::new(2.5, 5.5, Axis::X, None).unwrap();
        let cropped = crop.apply(&grid(), &field()).unwrap();
        assert_eq!(cropped.shape(), &[3, 4]);
        assert_eq!(cropped[IxDyn(&[0, 0])], 20.0);
    }

    #[test]
    fn test_crop_with_unit_and_clamping() {
        let crop = GridCrop::new(-1.0, 100.0, Axis::Y, Some(Unit::Micro)).unwrap();
        let cropped = crop.apply(&grid(), &field()).unwrap();
        assert_eq!(cropped.shape(), &[10, 3]);
        assert_eq!(cropped[IxDyn(&[0, 0])], 1.0);
    }

    #[test]
    fn test_crop_outside_range_is_empty() {
        let crop = GridCrop::new(20.0, 30.0, Axis::X, None).unwrap();
        let cropped = crop.apply(&grid(), &field()).unwrap();
        assert_eq!(cropped.shape(), &[0, 4]);
    }

    #[test]
    fn test_crop_missing_axis() {
        let crop = GridCrop::new(0.0, 1.0, Axis::Z, None).unwrap();
        let err = crop.apply(&grid(), &field()).unwrap_err();
        assert!(err.is_unsupported_dimension());
    }
}
