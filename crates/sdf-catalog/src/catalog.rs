//! Key discovery: which fields, components and species a snapshot holds.

use std::collections::{BTreeMap, BTreeSet};

use pic_common::Component;
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::fields::{FieldClass, FieldKind};

/// What a grid-field key contributes after its prefix is stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldToken {
    /// The key was exactly the prefix (a total, not resolved by component
    /// or species).
    Bare,
    /// A Cartesian component token such as `"x"`.
    Component(String),
    /// A species name.
    Species(String),
}

impl FieldToken {
    pub fn component(token: impl Into<String>) -> Self {
        Self::Component(token.into())
    }

    pub fn species(name: impl Into<String>) -> Self {
        Self::Species(name.into())
    }
}

impl From<Component> for FieldToken {
    fn from(component: Component) -> Self {
        Self::Component(component.as_str().to_string())
    }
}

/// Index of a particle-field entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParticleSlot {
    /// Field without vector components (e.g. `Grid_Particles_<species>`).
    SpeciesOnly,
    /// One Cartesian component of a vector field.
    Component(String),
}

impl From<Component> for ParticleSlot {
    fn from(component: Component) -> Self {
        Self::Component(component.as_str().to_string())
    }
}

/// Structural index of a loaded snapshot.
///
/// Built in one pass by [`DataCatalog::discover`] and never mutated
/// afterwards. Every instance owns its own containers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataCatalog {
    grid: BTreeMap<FieldKind, BTreeSet<FieldToken>>,
    particle: BTreeMap<FieldKind, BTreeMap<ParticleSlot, BTreeSet<String>>>,
    scalar: BTreeMap<FieldKind, bool>,
    species: BTreeSet<String>,
    claimed: BTreeMap<String, FieldKind>,
    unclaimed: BTreeSet<String>,
}

impl DataCatalog {
    /// Scan raw keys and build the catalog.
    ///
    /// Kinds are matched in [`FieldKind::ALL`] order (grid fields, then
    /// particle fields, then scalar fields). A key is claimed by the first
    /// kind whose prefix it matches and is not offered to later kinds.
    /// Within a kind, keys are visited in sorted order.
    ///
    /// Fails with [`CatalogError::MalformedKey`] if a particle key's tail
    /// does not split into `component_species`. No partial catalog is
    /// returned in that case. Keys whose species suffix is empty (`<prefix>_`)
    /// are left unclaimed.
    ///
    /// Discovery logs through the current dispatcher, so callers that want
    /// its events attributed should enter their span first.
    pub fn discover<I, S>(keys: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pending: BTreeSet<String> =
            keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        let mut catalog = Self::default();

        for kind in FieldKind::ALL {
            let matched: Vec<String> = match kind.class() {
                FieldClass::Scalar => pending
                    .iter()
                    .filter(|k| k.as_str() == kind.prefix())
                    .cloned()
                    .collect(),
                _ => pending
                    .iter()
                    .filter(|k| k.starts_with(kind.prefix()))
                    .cloned()
                    .collect(),
            };

            if kind.class() == FieldClass::Scalar {
                catalog.scalar.insert(kind, !matched.is_empty());
            }

            for key in matched {
                let tail = &key[kind.prefix().len()..];
                let claimed = match kind.class() {
                    FieldClass::Grid => catalog.add_grid_key(kind, tail),
                    FieldClass::Particle => catalog.add_particle_key(kind, &key, tail)?,
                    FieldClass::Scalar => true,
                };
                if !claimed {
                    debug!(key = %key, kind = %kind, "Empty species suffix, leaving key unclaimed");
                    continue;
                }
                pending.remove(&key);
                catalog.claimed.insert(key, kind);
            }
        }

        catalog.unclaimed = pending;

        debug!(
            fields = catalog.present_kinds().len(),
            species = ?catalog.species,
            claimed = catalog.claimed.len(),
            unclaimed = catalog.unclaimed.len(),
            "Discovered snapshot structure"
        );

        Ok(catalog)
    }

    /// Returns `false` if the key carries an empty species suffix.
    fn add_grid_key(&mut self, kind: FieldKind, tail: &str) -> bool {
        let token = if let Some(species) = tail.strip_prefix('_') {
            if species.is_empty() {
                return false;
            }
            self.species.insert(species.to_string());
            FieldToken::Species(species.to_string())
        } else if !tail.is_empty() {
            FieldToken::Component(tail.to_string())
        } else {
            FieldToken::Bare
        };

        self.grid.entry(kind).or_default().insert(token);
        true
    }

    /// Returns `Ok(false)` if the key carries an empty species suffix.
    fn add_particle_key(&mut self, kind: FieldKind, key: &str, tail: &str) -> CatalogResult<bool> {
        let (slot, species) = if let Some(species) = tail.strip_prefix('_') {
            if species.is_empty() {
                return Ok(false);
            }
            (ParticleSlot::SpeciesOnly, species)
        } else {
            let parts: Vec<&str> = tail.split('_').collect();
            match parts.as_slice() {
                [component, species] if !component.is_empty() && !species.is_empty() => {
                    (ParticleSlot::Component(component.to_string()), *species)
                }
                _ => {
                    return Err(CatalogError::malformed_key(
                        key,
                        format!(
                            "expected '<component>_<species>' after '{}', got '{}'",
                            kind.prefix(),
                            tail
                        ),
                    ))
                }
            }
        };

        self.species.insert(species.to_string());
        self.particle
            .entry(kind)
            .or_default()
            .entry(slot)
            .or_default()
            .insert(species.to_string());
        Ok(true)
    }

    /// All species seen in any species-tagged key.
    pub fn species(&self) -> &BTreeSet<String> {
        &self.species
    }

    /// Whether any key was claimed by the kind (for scalars: the flag).
    pub fn contains(&self, kind: FieldKind) -> bool {
        match kind.class() {
            FieldClass::Grid => self.grid.contains_key(&kind),
            FieldClass::Particle => self.particle.contains_key(&kind),
            FieldClass::Scalar => self.has_scalar(kind),
        }
    }

    /// Kinds with at least one claimed key, in discovery order.
    pub fn present_kinds(&self) -> Vec<FieldKind> {
        FieldKind::ALL
            .into_iter()
            .filter(|k| self.contains(*k))
            .collect()
    }

    /// Tokens found for a grid field.
    pub fn grid_tokens(&self, kind: FieldKind) -> Option<&BTreeSet<FieldToken>> {
        self.grid.get(&kind)
    }

    pub fn has_grid_token(&self, kind: FieldKind, token: &FieldToken) -> bool {
        self.grid
            .get(&kind)
            .map(|tokens| tokens.contains(token))
            .unwrap_or(false)
    }

    /// Slots and their species for a particle field.
    pub fn particle_slots(&self, kind: FieldKind) -> Option<&BTreeMap<ParticleSlot, BTreeSet<String>>> {
        self.particle.get(&kind)
    }

    /// Species recorded under one particle slot.
    pub fn particle_species(&self, kind: FieldKind, slot: &ParticleSlot) -> Option<&BTreeSet<String>> {
        self.particle.get(&kind).and_then(|slots| slots.get(slot))
    }

    pub fn has_scalar(&self, kind: FieldKind) -> bool {
        self.scalar.get(&kind).copied().unwrap_or(false)
    }

    /// Component tokens present for a grid or particle field.
    pub fn components(&self, kind: FieldKind) -> BTreeSet<&str> {
        match kind.class() {
            FieldClass::Grid => self
                .grid
                .get(&kind)
                .into_iter()
                .flatten()
                .filter_map(|t| match t {
                    FieldToken::Component(c) => Some(c.as_str()),
                    _ => None,
                })
                .collect(),
            FieldClass::Particle => self
                .particle
                .get(&kind)
                .into_iter()
                .flat_map(|slots| slots.keys())
                .filter_map(|s| match s {
                    ParticleSlot::Component(c) => Some(c.as_str()),
                    ParticleSlot::SpeciesOnly => None,
                })
                .collect(),
            FieldClass::Scalar => BTreeSet::new(),
        }
    }

    /// Species present for a grid or particle field.
    pub fn species_for(&self, kind: FieldKind) -> BTreeSet<&str> {
        match kind.class() {
            FieldClass::Grid => self
                .grid
                .get(&kind)
                .into_iter()
                .flatten()
                .filter_map(|t| match t {
                    FieldToken::Species(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect(),
            FieldClass::Particle => self
                .particle
                .get(&kind)
                .into_iter()
                .flat_map(|slots| slots.values())
                .flatten()
                .map(|s| s.as_str())
                .collect(),
            FieldClass::Scalar => BTreeSet::new(),
        }
    }

    /// Kind that claimed a raw key during discovery.
    pub fn kind_of(&self, key: &str) -> Option<FieldKind> {
        self.claimed.get(key).copied()
    }

    pub fn claimed_keys(&self) -> &BTreeMap<String, FieldKind> {
        &self.claimed
    }

    /// Keys that matched no field prefix.
    pub fn unclaimed_keys(&self) -> &BTreeSet<String> {
        &self.unclaimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_species() {
        let catalog = DataCatalog::discover([
            "Derived_Number_Density_electron",
            "Derived_Number_Density_ion",
        ])
        .unwrap();

        let expected: BTreeSet<FieldToken> =
            [FieldToken::species("electron"), FieldToken::species("ion")]
                .into_iter()
                .collect();
        assert_eq!(catalog.grid_tokens(FieldKind::Density), Some(&expected));

        let species: Vec<&str> = catalog.species().iter().map(|s| s.as_str()).collect();
        assert_eq!(species, vec!["electron", "ion"]);
    }

    #[test]
    fn test_field_components() {
        let catalog = DataCatalog::discover(["Electric_Field_Ex", "Electric_Field_Ey"]).unwrap();

        let expected: BTreeSet<FieldToken> = [FieldToken::component("x"), FieldToken::component("y")]
            .into_iter()
            .collect();
        assert_eq!(catalog.grid_tokens(FieldKind::ElectricField), Some(&expected));
        assert!(catalog.species().is_empty());
    }

    #[test]
    fn test_momentum_component_and_species() {
        let catalog = DataCatalog::discover(["Particles_Px_electron"]).unwrap();

        let slots = catalog.particle_slots(FieldKind::Momentum).unwrap();
        assert_eq!(slots.len(), 1);
        let species = slots.get(&ParticleSlot::from(Component::X)).unwrap();
        assert_eq!(species.iter().collect::<Vec<_>>(), vec!["electron"]);
        assert!(catalog.species().contains("electron"));
    }

    #[test]
    fn test_bare_grid_key() {
        let catalog = DataCatalog::discover(["Derived_Number_Density"]).unwrap();
        assert!(catalog.has_grid_token(FieldKind::Density, &FieldToken::Bare));
        assert!(catalog.species().is_empty());
    }

    #[test]
    fn test_particle_coordinates_species_only() {
        let catalog = DataCatalog::discover(["Grid_Particles_proton"]).unwrap();
        assert_eq!(
            catalog
                .particle_species(FieldKind::Coordinates, &ParticleSlot::SpeciesOnly)
                .map(|s| s.len()),
            Some(1)
        );
        assert!(catalog.components(FieldKind::Coordinates).is_empty());
    }

    #[test]
    fn test_malformed_particle_key_aborts() {
        let err = DataCatalog::discover(["Particles_Px_electron", "Particles_Px"]).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedKey { ref key, .. } if key == "Particles_Px"));

        let err = DataCatalog::discover(["Particles_Px_hot_electron"]).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedKey { .. }));
    }

    #[test]
    fn test_empty_species_suffix_is_left_unclaimed() {
        let catalog = DataCatalog::discover([
            "Derived_Number_Density_electron",
            "Derived_Temperature_",
            "Grid_Particles_",
        ])
        .unwrap();

        assert_eq!(catalog.species().iter().collect::<Vec<_>>(), vec!["electron"]);
        assert!(!catalog.contains(FieldKind::Temperature));
        assert!(!catalog.contains(FieldKind::Coordinates));
        assert!(catalog.unclaimed_keys().contains("Derived_Temperature_"));
        assert!(catalog.unclaimed_keys().contains("Grid_Particles_"));
        assert_eq!(catalog.kind_of("Derived_Temperature_"), None);
    }

    #[test]
    fn test_scalar_exact_match_only() {
        let catalog = DataCatalog::discover([
            "Total_Field_Energy_in_Simulation__J_",
            "Total_Particle_Energy_in_Simulation__J_extra",
        ])
        .unwrap();

        assert!(catalog.has_scalar(FieldKind::TotalFieldEnergy));
        assert!(!catalog.has_scalar(FieldKind::TotalParticleEnergy));
        assert!(catalog
            .unclaimed_keys()
            .contains("Total_Particle_Energy_in_Simulation__J_extra"));
    }

    #[test]
    fn test_unmatched_keys_are_not_errors() {
        let catalog = DataCatalog::discover(["Grid_Grid", "Grid_Grid_mid", "Wall-time"]).unwrap();
        assert!(catalog.present_kinds().is_empty());
        assert_eq!(catalog.unclaimed_keys().len(), 3);
    }
}
