//! Metric scale factors applied to coordinates and time readouts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PicError;

/// SI prefix used to scale physical values.
///
/// Coordinates are multiplied by the factor before being mapped onto a grid
/// (a value given in microns becomes metres), and time readouts are divided
/// by it (seconds become femtoseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    Centi,
    Deci,
    Kilo,
    Mega,
    Giga,
    Tera,
    Peta,
}

impl Unit {
    /// Every unit, smallest first.
    pub const ALL: [Unit; 12] = [
        Unit::Femto,
        Unit::Pico,
        Unit::Nano,
        Unit::Micro,
        Unit::Milli,
        Unit::Centi,
        Unit::Deci,
        Unit::Kilo,
        Unit::Mega,
        Unit::Giga,
        Unit::Tera,
        Unit::Peta,
    ];

    /// Multiplicative factor relative to the base SI unit.
    pub fn factor(&self) -> f64 {
        match self {
            Self::Femto => 1e-15,
            Self::Pico => 1e-12,
            Self::Nano => 1e-9,
            Self::Micro => 1e-6,
            Self::Milli => 1e-3,
            Self::Centi => 1e-2,
            Self::Deci => 1e-1,
            Self::Kilo => 1e3,
            Self::Mega => 1e6,
            Self::Giga => 1e9,
            Self::Tera => 1e12,
            Self::Peta => 1e15,
        }
    }

    /// Prefix name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Femto => "femto",
            Self::Pico => "pico",
            Self::Nano => "nano",
            Self::Micro => "micro",
            Self::Milli => "milli",
            Self::Centi => "centi",
            Self::Deci => "deci",
            Self::Kilo => "kilo",
            Self::Mega => "mega",
            Self::Giga => "giga",
            Self::Tera => "tera",
            Self::Peta => "peta",
        }
    }

    /// Factor of an optional unit, 1.0 when absent.
    pub fn factor_or_one(unit: Option<Unit>) -> f64 {
        unit.map(|u| u.factor()).unwrap_or(1.0)
    }
}

impl FromStr for Unit {
    type Err = PicError;

    /// Parse a prefix name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Unit::ALL
            .into_iter()
            .find(|u| u.as_str() == lower)
            .ok_or_else(|| PicError::UnknownUnit(s.to_string()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_factors_are_increasing() {
        for pair in Unit::ALL.windows(2) {
            assert!(pair[0].factor() < pair[1].factor());
        }
        assert_eq!(Unit::Micro.factor(), 1e-6);
        assert_eq!(Unit::Peta.factor(), 1e15);
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("femto".parse::<Unit>().unwrap(), Unit::Femto);
        assert_eq!("MICRO".parse::<Unit>().unwrap(), Unit::Micro);
        assert_eq!(" kilo ".parse::<Unit>().unwrap(), Unit::Kilo);
    }

    #[test]
    fn test_unit_from_str_unknown() {
        let err = "furlong".parse::<Unit>().unwrap_err();
        assert_eq!(err, PicError::UnknownUnit("furlong".to_string()));
    }

    #[test]
    fn test_factor_or_one() {
        assert_eq!(Unit::factor_or_one(None), 1.0);
        assert_eq!(Unit::factor_or_one(Some(Unit::Nano)), 1e-9);
    }

    #[test]
    fn test_unit_serde_lowercase() {
        let json = serde_json::to_string(&Unit::Femto).unwrap();
        assert_eq!(json, "\"femto\"");
        let unit: Unit = serde_json::from_str("\"giga\"").unwrap();
        assert_eq!(unit, Unit::Giga);
    }
}
