//! Projection of a field onto a plane by summing along one axis.

use ndarray::{ArrayD, Axis as NdAxis};
use pic_common::{Axis, PicError};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Sum an array along one grid axis.
///
/// Axis `x` is array dimension 0, `y` dimension 1 and `z` dimension 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneProjection {
    pub axis: Axis,
}

impl PlaneProjection {
    pub fn new(axis: Axis) -> Self {
        Self { axis }
    }

    pub fn apply(&self, array: &ArrayD<f64>) -> Result<ArrayD<f64>> {
        let index = self.axis.ordinal();
        if index >= array.ndim() {
            return Err(PicError::unsupported_dimension(self.axis.as_str(), array.ndim()).into());
        }
        Ok(array.sum_axis(NdAxis(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_sum_along_each_axis() {
        let array = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).into_dyn();

        let along_x = PlaneProjection::new(Axis::X).apply(&array).unwrap();
        assert_eq!(along_x, arr1(&[5.0, 7.0, 9.0]).into_dyn());

        let along_y = PlaneProjection::new(Axis::Y).apply(&array).unwrap();
        assert_eq!(along_y, arr1(&[6.0, 15.0]).into_dyn());
    }

    #[test]
    fn test_too_few_dimensions() {
        let array = arr2(&[[1.0, 2.0], [3.0, 4.0]]).into_dyn();
        let err = PlaneProjection::new(Axis::Z).apply(&array).unwrap_err();
        assert!(err.is_unsupported_dimension());
    }
}
