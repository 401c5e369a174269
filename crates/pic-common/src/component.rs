//! Vector components in Cartesian and derived coordinate systems.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PicError;
use crate::grid::Axis;

/// A component of a vector quantity.
///
/// `X`, `Y` and `Z` are stored natively in snapshots. The remaining
/// variants are computed from them: `R` and `Phi` are cylindrical around
/// the x axis (radius and azimuth in the y-z plane), `R3d` and `Theta` are
/// spherical (radius and polar angle from the z axis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    X,
    Y,
    Z,
    R,
    R3d,
    Phi,
    Theta,
}

impl Default for Component {
    /// Accessors that take an optional component use `x`.
    fn default() -> Self {
        Self::X
    }
}

impl Component {
    pub const ALL: [Component; 7] = [
        Component::X,
        Component::Y,
        Component::Z,
        Component::R,
        Component::R3d,
        Component::Phi,
        Component::Theta,
    ];

    /// Whether the component is stored natively in Cartesian form.
    pub fn is_cartesian(&self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Z)
    }

    /// Spatial axis backing a Cartesian component.
    pub fn axis(&self) -> Option<Axis> {
        match self {
            Self::X => Some(Axis::X),
            Self::Y => Some(Axis::Y),
            Self::Z => Some(Axis::Z),
            _ => None,
        }
    }

    /// Token used in raw snapshot keys and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::R => "r",
            Self::R3d => "r3d",
            Self::Phi => "phi",
            Self::Theta => "theta",
        }
    }
}

impl From<Axis> for Component {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::X,
            Axis::Y => Self::Y,
            Axis::Z => Self::Z,
        }
    }
}

impl FromStr for Component {
    type Err = PicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Component::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| PicError::UnknownComponent(s.to_string()))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
