//! The closed set of physical quantities understood by the catalog.
//!
//! Each [`FieldKind`] is bound to the raw block-name prefix EPOCH writes for
//! it. Prefixes are matched in [`FieldKind::ALL`] order during discovery.

use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Broad class of a field, which decides how raw key tails are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldClass {
    /// Mesh variables sampled on the simulation grid.
    Grid,
    /// Per-particle variables.
    Particle,
    /// Single-valued diagnostics.
    Scalar,
}

/// How the raw key of a field is assembled from its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyShape {
    /// `<prefix>` for the total, `<prefix>_<species>` per species.
    Species,
    /// `<prefix><component>` for grid fields,
    /// `<prefix><component>_<species>` for particle fields.
    Component,
    /// `<prefix>` exactly.
    Exact,
}

/// Canonical field identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKind {
    // Grid fields
    Density,
    Temperature,
    MassDensity,
    ElectricField,
    MagneticField,
    Current,
    // Particle fields
    Coordinates,
    Momentum,
    // Scalar fields
    TotalFieldEnergy,
    TotalParticleEnergy,
    LaserEnergyInjected,
    LaserEnergyAbsorbed,
}

impl FieldKind {
    /// Every kind in discovery order: grid fields, then particle fields,
    /// then scalar fields.
    pub const ALL: [FieldKind; 12] = [
        FieldKind::Density,
        FieldKind::Temperature,
        FieldKind::MassDensity,
        FieldKind::ElectricField,
        FieldKind::MagneticField,
        FieldKind::Current,
        FieldKind::Coordinates,
        FieldKind::Momentum,
        FieldKind::TotalFieldEnergy,
        FieldKind::TotalParticleEnergy,
        FieldKind::LaserEnergyInjected,
        FieldKind::LaserEnergyAbsorbed,
    ];

    /// Raw block-name prefix written by EPOCH.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Density => "Derived_Number_Density",
            Self::Temperature => "Derived_Temperature",
            Self::MassDensity => "Derived_Mass_Density",
            Self::ElectricField => "Electric_Field_E",
            Self::MagneticField => "Magnetic_Field_B",
            Self::Current => "Current_J",
            Self::Coordinates => "Grid_Particles",
            Self::Momentum => "Particles_P",
            Self::TotalFieldEnergy => "Total_Field_Energy_in_Simulation__J_",
            Self::TotalParticleEnergy => "Total_Particle_Energy_in_Simulation__J_",
            Self::LaserEnergyInjected => "Absorption_Total_Laser_Energy_Injected__J_",
            Self::LaserEnergyAbsorbed => "Absorption_Fraction_of_Laser_Energy_Absorbed____",
        }
    }

    /// Human-readable snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Density => "density",
            Self::Temperature => "temperature",
            Self::MassDensity => "mass_density",
            Self::ElectricField => "electric_field",
            Self::MagneticField => "magnetic_field",
            Self::Current => "current",
            Self::Coordinates => "coordinates",
            Self::Momentum => "momentum",
            Self::TotalFieldEnergy => "total_field_energy",
            Self::TotalParticleEnergy => "total_particle_energy",
            Self::LaserEnergyInjected => "laser_energy_injected",
            Self::LaserEnergyAbsorbed => "laser_energy_absorbed",
        }
    }

    pub fn class(&self) -> FieldClass {
        match self {
            Self::Density
            | Self::Temperature
            | Self::MassDensity
            | Self::ElectricField
            | Self::MagneticField
            | Self::Current => FieldClass::Grid,
            Self::Coordinates | Self::Momentum => FieldClass::Particle,
            Self::TotalFieldEnergy
            | Self::TotalParticleEnergy
            | Self::LaserEnergyInjected
            | Self::LaserEnergyAbsorbed => FieldClass::Scalar,
        }
    }

    pub fn key_shape(&self) -> KeyShape {
        match self {
            Self::Density | Self::Temperature | Self::MassDensity | Self::Coordinates => {
                KeyShape::Species
            }
            Self::ElectricField | Self::MagneticField | Self::Current | Self::Momentum => {
                KeyShape::Component
            }
            _ => KeyShape::Exact,
        }
    }

    /// Whether the field is a vector with Cartesian components.
    pub fn is_vector(&self) -> bool {
        self.key_shape() == KeyShape::Component
    }

    /// Kinds belonging to one class, in discovery order.
    pub fn of_class(class: FieldClass) -> impl Iterator<Item = FieldKind> {
        Self::ALL.into_iter().filter(move |k| k.class() == class)
    }

    /// Assemble the raw key for this field.
    ///
    /// `component` is used by [`KeyShape::Component`] kinds and `species` by
    /// species-tagged keys. Parts that do not apply to the key shape are
    /// ignored.
    pub fn raw_key(&self, component: Option<&str>, species: Option<&str>) -> String {
        let prefix = self.prefix();
        match (self.key_shape(), self.class()) {
            (KeyShape::Exact, _) => prefix.to_string(),
            (KeyShape::Species, _) => match species {
                Some(s) => format!("{}_{}", prefix, s),
                None => prefix.to_string(),
            },
            (KeyShape::Component, FieldClass::Particle) => format!(
                "{}{}_{}",
                prefix,
                component.unwrap_or_default(),
                species.unwrap_or_default()
            ),
            (KeyShape::Component, _) => format!("{}{}", prefix, component.unwrap_or_default()),
        }
    }
}

impl FromStr for FieldKind {
    type Err = CatalogError;

    /// Look up a kind by its [`name`](FieldKind::name).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| CatalogError::UnknownFieldKind(s.to_string()))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
