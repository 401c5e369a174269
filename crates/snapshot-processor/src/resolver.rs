//! Cylindrical and spherical views of Cartesian vector fields.
//!
//! Snapshots only store the x, y and z components of vector quantities.
//! [`CoordinateResolver`] derives the other components on demand from a
//! [`VectorSource`], which supplies the Cartesian components and the
//! position of every sample:
//!
//! | Component | Formula |
//! |-----------|---------|
//! | `phi`     | `atan2(z, y)` |
//! | `theta`   | `arccos(z / sqrt(x² + y² + z²))` |
//! | `r`       | `sqrt(y² + z²) * sign(y·y_pos + z·z_pos)` |
//! | `r3d`     | `sqrt(x² + y² + z²) * sign(x·x_pos + y·y_pos + z·z_pos)` |
//!
//! The sign of the radial components comes from projecting the vector onto
//! the sample's position vector, so outward-pointing vectors are positive
//! and inward-pointing ones negative.
//!
//! Nothing is cached: every call recomputes its inputs.

use ndarray::{ArrayD, Axis as NdAxis, Zip};
use pic_common::{Axis, Component, Grid, PicError};
use tracing::trace;

use crate::error::{Result, SnapshotError};
use crate::transform::math::{
    cartesian_to_cylindrical, cartesian_to_spherical, direction, ensure_same_shape, sign,
};

/// Supplier of Cartesian components and sample positions for one vector
/// quantity.
pub trait VectorSource {
    /// Number of spatial axes available.
    fn dim(&self) -> usize;

    /// Cartesian component along `axis`.
    fn cartesian(&self, axis: Axis) -> Result<ArrayD<f64>>;

    /// Position of every sample along `axis`, shaped like the field.
    fn position(&self, axis: Axis, shape: &[usize]) -> Result<ArrayD<f64>>;
}

/// Computes any [`Component`] of a vector quantity from a [`VectorSource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CoordinateResolver;

impl CoordinateResolver {
    pub fn new() -> Self {
        Self
    }

    /// Compute one component.
    ///
    /// Cartesian requests are passed to the source after a dimension check;
    /// derived components fetch the Cartesian components they need, so a
    /// missing axis surfaces as `UnsupportedDimension` either way.
    pub fn resolve<S>(&self, source: &S, component: Component) -> Result<ArrayD<f64>>
    where
        S: VectorSource + ?Sized,
    {
        trace!(component = %component, dim = source.dim(), "Resolving vector component");

        match component {
            Component::X => self.cartesian(source, Axis::X),
            Component::Y => self.cartesian(source, Axis::Y),
            Component::Z => self.cartesian(source, Axis::Z),
            Component::Phi => {
                let y = self.cartesian(source, Axis::Y)?;
                let z = self.cartesian(source, Axis::Z)?;
                let (_, phi) = cartesian_to_cylindrical(&y, &z)?;
                Ok(phi)
            }
            Component::Theta => {
                let x = self.cartesian(source, Axis::X)?;
                let y = self.cartesian(source, Axis::Y)?;
                let z = self.cartesian(source, Axis::Z)?;
                let (_, _, theta) = cartesian_to_spherical(&x, &y, &z)?;
                Ok(theta)
            }
            Component::R => self.signed_magnitude(source, &[Axis::Y, Axis::Z]),
            Component::R3d => self.signed_magnitude(source, &[Axis::X, Axis::Y, Axis::Z]),
        }
    }

    fn cartesian<S>(&self, source: &S, axis: Axis) -> Result<ArrayD<f64>>
    where
        S: VectorSource + ?Sized,
    {
        if axis.ordinal() >= source.dim() {
            return Err(PicError::unsupported_dimension(axis.as_str(), source.dim()).into());
        }
        source.cartesian(axis)
    }

    /// `|v| * sign(v · pos)` over the given axes.
    fn signed_magnitude<S>(&self, source: &S, axes: &[Axis]) -> Result<ArrayD<f64>>
    where
        S: VectorSource + ?Sized,
    {
        let components = axes
            .iter()
            .map(|&axis| self.cartesian(source, axis))
            .collect::<Result<Vec<_>>>()?;
        let refs: Vec<&ArrayD<f64>> = components.iter().collect();
        ensure_same_shape(&refs, "vector components")?;

        let shape = components[0].shape().to_vec();
        let positions = axes
            .iter()
            .map(|&axis| source.position(axis, &shape))
            .collect::<Result<Vec<_>>>()?;

        let pairs: Vec<(&ArrayD<f64>, &ArrayD<f64>)> =
            components.iter().zip(positions.iter()).collect();
        let dot = direction(&pairs)?;

        let mut squared = ArrayD::<f64>::zeros(dot.raw_dim());
        for component in &components {
            Zip::from(&mut squared)
                .and(component)
                .for_each(|s, &c| *s += c * c);
        }

        Ok(Zip::from(&squared)
            .and(&dot)
            .map_collect(|&s, &d| s.sqrt() * sign(d)))
    }
}

/// Grid-field source: positions come from the grid's evenly spaced axis
/// samples broadcast over the field shape.
pub struct GridSource<'a, F> {
    grid: &'a Grid,
    fetch: F,
}

impl<'a, F> GridSource<'a, F>
where
    F: Fn(Axis) -> Result<ArrayD<f64>>,
{
    pub fn new(grid: &'a Grid, fetch: F) -> Self {
        Self { grid, fetch }
    }
}

impl<'a, F> VectorSource for GridSource<'a, F>
where
    F: Fn(Axis) -> Result<ArrayD<f64>>,
{
    fn dim(&self) -> usize {
        self.grid.dim()
    }

    fn cartesian(&self, axis: Axis) -> Result<ArrayD<f64>> {
        (self.fetch)(axis)
    }

    fn position(&self, axis: Axis, shape: &[usize]) -> Result<ArrayD<f64>> {
        position_mesh(self.grid, axis, shape)
    }
}

/// Particle-field source: positions are the particles' own coordinates.
pub struct ParticleSource<F, G> {
    dim: usize,
    fetch: F,
    coordinates: G,
}

impl<F, G> ParticleSource<F, G>
where
    F: Fn(Axis) -> Result<ArrayD<f64>>,
    G: Fn(Axis) -> Result<ArrayD<f64>>,
{
    pub fn new(dim: usize, fetch: F, coordinates: G) -> Self {
        Self {
            dim,
            fetch,
            coordinates,
        }
    }
}

impl<F, G> VectorSource for ParticleSource<F, G>
where
    F: Fn(Axis) -> Result<ArrayD<f64>>,
    G: Fn(Axis) -> Result<ArrayD<f64>>,
{
    fn dim(&self) -> usize {
        self.dim
    }

    fn cartesian(&self, axis: Axis) -> Result<ArrayD<f64>> {
        (self.fetch)(axis)
    }

    fn position(&self, axis: Axis, shape: &[usize]) -> Result<ArrayD<f64>> {
        let positions = (self.coordinates)(axis)?;
        if positions.shape() != shape {
            return Err(SnapshotError::shape_mismatch(format!(
                "particle positions {:?} vs values {:?}",
                positions.shape(),
                shape
            )));
        }
        Ok(positions)
    }
}

/// Coordinate of every grid cell along `axis`, broadcast to `shape`.
///
/// Array dimension `i` corresponds to grid axis `i`; `shape` must equal the
/// grid shape.
pub fn position_mesh(grid: &Grid, axis: Axis, shape: &[usize]) -> Result<ArrayD<f64>> {
    let grid_shape = grid.shape();
    if shape != grid_shape.as_slice() {
        return Err(SnapshotError::shape_mismatch(format!(
            "field {:?} vs grid {:?}",
            shape, grid_shape
        )));
    }

    let samples = ndarray::Array1::from(grid.component(axis)?.linspace());
    let mut view_shape = vec![1; shape.len()];
    view_shape[axis.ordinal()] = samples.len();

    let column = samples
        .into_shape_with_order(view_shape)
        .map_err(|e| SnapshotError::shape_mismatch(e.to_string()))?;
    let mesh = column
        .broadcast(shape)
        .ok_or_else(|| SnapshotError::shape_mismatch(format!("cannot broadcast to {:?}", shape)))?
        .to_owned();

    debug_assert_eq!(mesh.len_of(NdAxis(axis.ordinal())), shape[axis.ordinal()]);
    Ok(mesh)
}
