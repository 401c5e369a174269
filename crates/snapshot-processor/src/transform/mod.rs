//! Array transforms applied to fetched fields.

pub mod crop;
pub mod math;
pub mod projection;

pub use crop::GridCrop;
pub use math::{cartesian_to_cylindrical, cartesian_to_spherical, direction, sign};
pub use projection::PlaneProjection;
