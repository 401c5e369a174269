//! Element-wise coordinate conversions on arrays.

use ndarray::{ArrayD, Zip};

use crate::error::{Result, SnapshotError};

/// Sign of a value: `1.0`, `-1.0`, or `0.0` for zero (and NaN for NaN).
pub fn sign(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        // Zero stays zero, NaN stays NaN.
        value
    }
}

/// Fail unless every array has the same shape.
pub fn ensure_same_shape(arrays: &[&ArrayD<f64>], what: &str) -> Result<()> {
    if let Some((first, rest)) = arrays.split_first() {
        for other in rest {
            if other.shape() != first.shape() {
                return Err(SnapshotError::shape_mismatch(format!(
                    "{}: {:?} vs {:?}",
                    what,
                    first.shape(),
                    other.shape()
                )));
            }
        }
    }
    Ok(())
}

/// Radius and azimuth of the 2-vector `(a, b)`.
///
/// The azimuth is `atan2(b, a)`, measured from the `a` direction.
pub fn cartesian_to_cylindrical(a: &ArrayD<f64>, b: &ArrayD<f64>) -> Result<(ArrayD<f64>, ArrayD<f64>)> {
    ensure_same_shape(&[a, b], "cylindrical conversion")?;
    let radius = Zip::from(a).and(b).map_collect(|&a, &b| a.hypot(b));
    let azimuth = Zip::from(a).and(b).map_collect(|&a, &b| b.atan2(a));
    Ok((radius, azimuth))
}

/// Radius, azimuth and polar angle of the 3-vector `(x, y, z)`.
///
/// The azimuth is `atan2(y, x)` and the polar angle `arccos(z / radius)`,
/// which is NaN for a zero vector.
pub fn cartesian_to_spherical(
    x: &ArrayD<f64>,
    y: &ArrayD<f64>,
    z: &ArrayD<f64>,
) -> Result<(ArrayD<f64>, ArrayD<f64>, ArrayD<f64>)> {
    ensure_same_shape(&[x, y, z], "spherical conversion")?;
    let radius = Zip::from(x)
        .and(y)
        .and(z)
        .map_collect(|&x, &y, &z| (x * x + y * y + z * z).sqrt());
    let azimuth = Zip::from(x).and(y).map_collect(|&x, &y| y.atan2(x));
    let polar = Zip::from(z).and(&radius).map_collect(|&z, &r| (z / r).acos());
    Ok((radius, azimuth, polar))
}

/// Element-wise dot product of paired vector components.
///
/// `pairs` holds `(vector_component, position_component)` for each axis.
pub fn direction(pairs: &[(&ArrayD<f64>, &ArrayD<f64>)]) -> Result<ArrayD<f64>> {
    let Some((first, _)) = pairs.first() else {
        return Err(SnapshotError::shape_mismatch("direction needs at least one axis"));
    };

    let mut dot = ArrayD::zeros(first.raw_dim());
    for (component, position) in pairs {
        ensure_same_shape(&[*first, *component, *position], "direction")?;
        Zip::from(&mut dot)
            .and(*component)
            .and(*position)
            .for_each(|d, &c, &p| *d += c * p);
    }
    Ok(dot)
}
