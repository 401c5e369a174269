//! Regular simulation grids built from cell mid-point coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::error::{PicError, PicResult};
use crate::units::Unit;

/// Spatial axis of a simulation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of the axis in grid and array dimension order.
    pub fn ordinal(&self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Axis at the given ordinal, if any.
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }
}

impl FromStr for Axis {
    type Err = PicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Self::X),
            "y" => Ok(Self::Y),
            "z" => Ok(Self::Z),
            other => Err(PicError::UnknownAxis {
                axis: other.to_string(),
                dim: 3,
            }),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bounds and resolution of a single grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisGrid {
    min: f64,
    max: f64,
    cell_count: usize,
}

impl AxisGrid {
    /// Create an axis, checking that `max > min` and `cell_count > 1`.
    pub fn new(min: f64, max: f64, cell_count: usize) -> PicResult<Self> {
        // Written as a negation so NaN bounds are rejected too.
        if !(max > min) {
            return Err(PicError::invalid_grid(format!(
                "max ({}) should be greater than min ({})",
                max, min
            )));
        }

        if cell_count <= 1 {
            return Err(PicError::invalid_grid(format!(
                "cell count should be greater than 1, got {}",
                cell_count
            )));
        }

        Ok(Self {
            min,
            max,
            cell_count,
        })
    }

    /// Build an axis from its cell mid-point samples.
    ///
    /// The first sample becomes `min`, the last `max`, and the number of
    /// samples the cell count.
    pub fn from_midpoints(samples: &[f64]) -> PicResult<Self> {
        match (samples.first(), samples.last()) {
            (Some(&min), Some(&max)) => Self::new(min, max, samples.len()),
            _ => Err(PicError::invalid_grid("empty mid-point array")),
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Physical extent covered by one cell.
    pub fn cell_width(&self) -> f64 {
        (self.max - self.min) / self.cell_count as f64
    }

    /// Map a physical value onto a cell index.
    ///
    /// The value is scaled by `unit` first when given. No clamping is
    /// applied: values outside `[min, max)` produce indices outside
    /// `[0, cell_count)`.
    pub fn value_to_index(&self, value: f64, unit: Option<Unit>) -> i64 {
        let value = value * Unit::factor_or_one(unit);
        ((value - self.min) / (self.max - self.min) * self.cell_count as f64).floor() as i64
    }

    /// Inverse of [`value_to_index`](Self::value_to_index).
    pub fn index_to_value(&self, index: i64, unit: Option<Unit>) -> f64 {
        (index as f64 * (self.max - self.min) / self.cell_count as f64 + self.min)
            * Unit::factor_or_one(unit)
    }

    /// `cell_count` evenly spaced samples from `min` to `max` inclusive.
    pub fn linspace(&self) -> Vec<f64> {
        let step = (self.max - self.min) / (self.cell_count - 1) as f64;
        (0..self.cell_count)
            .map(|i| {
                if i + 1 == self.cell_count {
                    self.max
                } else {
                    self.min + i as f64 * step
                }
            })
            .collect()
    }
}

/// Ordered composition of one to three axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    axes: Vec<AxisGrid>,
}

impl Grid {
    /// Maximum number of spatial axes.
    pub const MAX_DIM: usize = 3;

    pub fn new(axes: Vec<AxisGrid>) -> PicResult<Self> {
        if axes.is_empty() || axes.len() > Self::MAX_DIM {
            return Err(PicError::invalid_grid(format!(
                "expected 1 to {} axes, got {}",
                Self::MAX_DIM,
                axes.len()
            )));
        }
        Ok(Self { axes })
    }

    /// Build a grid from one mid-point array per axis, in x, y, z order.
    pub fn from_midpoints<S: AsRef<[f64]>>(midpoints: &[S]) -> PicResult<Self> {
        let axes = midpoints
            .iter()
            .enumerate()
            .map(|(i, samples)| {
                AxisGrid::from_midpoints(samples.as_ref()).map_err(|e| match e {
                    PicError::InvalidGrid(msg) => {
                        let name = Axis::from_ordinal(i).map(|a| a.as_str()).unwrap_or("?");
                        PicError::InvalidGrid(format!("axis {}: {}", name, msg))
                    }
                    other => other,
                })
            })
            .collect::<PicResult<Vec<_>>>()?;
        Self::new(axes)
    }

    /// Number of spatial dimensions.
    pub fn dim(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self) -> &[AxisGrid] {
        &self.axes
    }

    /// Cell counts in axis order, i.e. the expected shape of grid fields.
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().map(|a| a.cell_count()).collect()
    }

    /// Look up an axis, failing if the grid has fewer dimensions.
    pub fn component(&self, axis: Axis) -> PicResult<&AxisGrid> {
        self.axis(axis.ordinal()).map_err(|_| PicError::UnknownAxis {
            axis: axis.as_str().to_string(),
            dim: self.dim(),
        })
    }

    /// Look up an axis by ordinal.
    pub fn axis(&self, ordinal: usize) -> PicResult<&AxisGrid> {
        self.axes.get(ordinal).ok_or_else(|| PicError::UnknownAxis {
            axis: ordinal.to_string(),
            dim: self.dim(),
        })
    }

    /// Look up an axis by name (`"x"`, `"y"` or `"z"`).
    pub fn axis_by_name(&self, name: &str) -> PicResult<&AxisGrid> {
        let axis = name.parse::<Axis>().map_err(|_| PicError::UnknownAxis {
            axis: name.to_string(),
            dim: self.dim(),
        })?;
        self.component(axis)
    }

    /// Check that a vector component can be served on this grid.
    ///
    /// `y` needs two axes and `z` three. Derived components need every axis
    /// their Cartesian inputs live on.
    pub fn require(&self, component: Component) -> PicResult<()> {
        let needed = match component {
            Component::X => 1,
            Component::Y => 2,
            Component::Z
            | Component::R
            | Component::Phi
            | Component::R3d
            | Component::Theta => 3,
        };

        if self.dim() < needed {
            return Err(PicError::unsupported_dimension(
                component.as_str(),
                self.dim(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis_0_10() -> AxisGrid {
        AxisGrid::new(0.0, 10.0, 10).unwrap()
    }

    #[test]
    fn test_value_to_index_midpoint() {
        let axis = axis_0_10();
        assert_eq!(axis.value_to_index(5.0, None), 5);
        assert_eq!(axis.index_to_value(5, None), 5.0);
    }

    #[test]
    fn test_value_to_index_out_of_range_is_not_clamped() {
        let axis = axis_0_10();
        assert_eq!(axis.value_to_index(-1.0, None), -1);
        assert_eq!(axis.value_to_index(25.0, None), 25);
    }

    #[test]
    fn test_value_to_index_with_unit() {
        let axis = AxisGrid::new(0.0, 10e-6, 100).unwrap();
        // 5.05 microns on a 10 micron axis with 100 cells.
        assert_eq!(axis.value_to_index(5.05, Some(Unit::Micro)), 50);
        let back = axis.index_to_value(50, Some(Unit::Mega));
        assert!((back - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_axis_rejects_bad_bounds() {
        assert!(matches!(
            AxisGrid::new(1.0, 1.0, 10),
            Err(PicError::InvalidGrid(_))
        ));
        assert!(matches!(
            AxisGrid::new(2.0, 1.0, 10),
            Err(PicError::InvalidGrid(_))
        ));
        assert!(matches!(
            AxisGrid::new(f64::NAN, 1.0, 10),
            Err(PicError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_axis_rejects_single_cell() {
        assert!(matches!(
            AxisGrid::new(0.0, 1.0, 1),
            Err(PicError::InvalidGrid(_))
        ));
        assert!(matches!(
            AxisGrid::from_midpoints(&[]),
            Err(PicError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_linspace_hits_bounds() {
        let axis = AxisGrid::new(1.0, 3.0, 3).unwrap();
        assert_eq!(axis.linspace(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_grid_component_lookup() {
        let grid = Grid::from_midpoints(&[vec![0.0, 1.0, 2.0], vec![-1.0, 0.0, 1.0, 2.0]]).unwrap();
        assert_eq!(grid.dim(), 2);
        assert_eq!(grid.shape(), vec![3, 4]);
        assert_eq!(grid.component(Axis::Y).unwrap().cell_count(), 4);
        assert_eq!(grid.axis_by_name("x").unwrap().max(), 2.0);
        assert!(matches!(
            grid.component(Axis::Z),
            Err(PicError::UnknownAxis { dim: 2, .. })
        ));
        assert!(matches!(
            grid.axis_by_name("w"),
            Err(PicError::UnknownAxis { .. })
        ));
    }

    #[test]
    fn test_grid_rejects_too_many_axes() {
        let axis = vec![0.0, 1.0];
        let err = Grid::from_midpoints(&[&axis, &axis, &axis, &axis]).unwrap_err();
        assert!(matches!(err, PicError::InvalidGrid(_)));
    }

    #[test]
    fn test_grid_require() {
        let grid = Grid::from_midpoints(&[vec![0.0, 1.0], vec![0.0, 1.0]]).unwrap();
        assert!(grid.require(Component::X).is_ok());
        assert!(grid.require(Component::Y).is_ok());
        assert_eq!(
            grid.require(Component::Z).unwrap_err(),
            PicError::unsupported_dimension("z", 2)
        );
        assert!(grid.require(Component::R).is_err());
    }
}
