//! Typed access to one loaded snapshot.
//!
//! [`SnapshotHandler`] opens snapshots through a [`SnapshotDecoder`], builds
//! the [`Grid`] and [`DataCatalog`] for them and answers field requests.
//! Every request is checked against the catalog before any raw key is
//! assembled, so a missing quantity is reported by name
//! ([`SnapshotError::UnknownField`], [`SnapshotError::UnknownComponent`] or
//! [`SnapshotError::UnknownSpecies`]) rather than as a decoder lookup
//! failure.
//!
//! Non-Cartesian components are computed by the [`CoordinateResolver`] from
//! the Cartesian components on every call.
//!
//! Reads and field requests enter the handler's span. [`SnapshotHandler::read`]
//! runs key discovery inside it, so catalog events carry the same context as
//! the handler's own.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use ndarray::{ArrayD, Axis as NdAxis};
use pic_common::{Axis, Component, Grid, Unit};
use sdf_catalog::{DataCatalog, FieldClass, FieldKind, FieldToken, KeyShape, ParticleSlot};
use tracing::{debug, info, info_span, Span};

use crate::config::HandlerConfig;
use crate::error::{Result, SnapshotError};
use crate::resolver::{CoordinateResolver, GridSource, ParticleSource};
use crate::source::{SnapshotDecoder, SnapshotHandle, SnapshotHeader};
use crate::transform::GridCrop;

/// A snapshot whose grid and catalog were both built successfully.
#[derive(Debug)]
pub struct LoadedSnapshot<H> {
    path: PathBuf,
    handle: H,
    grid: Grid,
    catalog: DataCatalog,
}

impl<H: SnapshotHandle> LoadedSnapshot<H> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn catalog(&self) -> &DataCatalog {
        &self.catalog
    }

    pub fn header(&self) -> &SnapshotHeader {
        self.handle.header()
    }
}

/// Loads snapshots and serves their fields.
pub struct SnapshotHandler<D: SnapshotDecoder> {
    decoder: D,
    config: HandlerConfig,
    span: Span,
    resolver: CoordinateResolver,
    loaded: Option<LoadedSnapshot<D::Handle>>,
}

impl<D: SnapshotDecoder> SnapshotHandler<D> {
    pub fn new(decoder: D, config: HandlerConfig) -> Self {
        Self::with_span(decoder, config, info_span!("handler"))
    }

    /// Create a handler that records its events inside `span`.
    pub fn with_span(decoder: D, config: HandlerConfig, span: Span) -> Self {
        Self {
            decoder,
            config,
            span,
            resolver: CoordinateResolver::new(),
            loaded: None,
        }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Load a snapshot.
    ///
    /// The grid and catalog are built before anything is replaced. If the
    /// decoder fails, the grid is invalid or a key is malformed, the
    /// previously loaded snapshot (if any) stays in place.
    pub fn read(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let span = self.span.clone();
        let _enter = span.enter();

        info!(path = %path.display(), "Reading snapshot");
        let handle = self.decoder.open(path).map_err(SnapshotError::decoder)?;

        let midpoints = handle.midpoints().map_err(SnapshotError::decoder)?;
        let grid = Grid::from_midpoints(midpoints.as_slice())?;
        debug!(dim = grid.dim(), shape = ?grid.shape(), "Created grid");

        let catalog = DataCatalog::discover(handle.raw_keys())?;

        info!(
            path = %path.display(),
            time = handle.header().time,
            dim = grid.dim(),
            species = ?catalog.species(),
            "Snapshot loaded"
        );

        self.loaded = Some(LoadedSnapshot {
            path: path.to_path_buf(),
            handle,
            grid,
            catalog,
        });
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn loaded(&self) -> Result<&LoadedSnapshot<D::Handle>> {
        self.loaded.as_ref().ok_or(SnapshotError::NotLoaded)
    }

    pub fn grid(&self) -> Result<&Grid> {
        Ok(self.loaded()?.grid())
    }

    pub fn catalog(&self) -> Result<&DataCatalog> {
        Ok(self.loaded()?.catalog())
    }

    pub fn species(&self) -> Result<&BTreeSet<String>> {
        Ok(self.loaded()?.catalog().species())
    }

    pub fn header(&self) -> Result<&SnapshotHeader> {
        Ok(self.loaded()?.header())
    }

    /// Simulation time in the configured time unit (seconds if unset).
    pub fn time(&self) -> Result<f64> {
        let time = self.header()?.time;
        Ok(time / Unit::factor_or_one(self.config.time_unit))
    }

    /// Cell index of a value given in the configured unit.
    pub fn value_to_index(&self, axis: Axis, value: f64) -> Result<i64> {
        Ok(self.grid()?.component(axis)?.value_to_index(value, self.config.unit))
    }

    pub fn index_to_value(&self, axis: Axis, index: i64) -> Result<f64> {
        Ok(self.grid()?.component(axis)?.index_to_value(index, self.config.unit))
    }

    /// Crop `array` to `[min, max)` along `axis`, bounds in the configured unit.
    pub fn crop(&self, array: &ArrayD<f64>, min: f64, max: f64, axis: Axis) -> Result<ArrayD<f64>> {
        GridCrop::new(min, max, axis, self.config.unit)?.apply(self.grid()?, array)
    }

    // ------------------------------------------------------------------
    // Grid fields
    // ------------------------------------------------------------------

    /// Number density, total or for one species.
    pub fn density(&self, species: Option<&str>) -> Result<ArrayD<f64>> {
        self.grid_field(FieldKind::Density, None, species)
    }

    pub fn temperature(&self, species: Option<&str>) -> Result<ArrayD<f64>> {
        self.grid_field(FieldKind::Temperature, None, species)
    }

    pub fn mass_density(&self, species: Option<&str>) -> Result<ArrayD<f64>> {
        self.grid_field(FieldKind::MassDensity, None, species)
    }

    /// Electric field component; `None` selects `x`.
    pub fn electric_field(&self, component: impl Into<Option<Component>>) -> Result<ArrayD<f64>> {
        self.grid_field(FieldKind::ElectricField, Some(component.into().unwrap_or_default()), None)
    }

    /// Magnetic field component; `None` selects `x`.
    pub fn magnetic_field(&self, component: impl Into<Option<Component>>) -> Result<ArrayD<f64>> {
        self.grid_field(FieldKind::MagneticField, Some(component.into().unwrap_or_default()), None)
    }

    /// Current density component; `None` selects `x`.
    pub fn current(&self, component: impl Into<Option<Component>>) -> Result<ArrayD<f64>> {
        self.grid_field(FieldKind::Current, Some(component.into().unwrap_or_default()), None)
    }

    /// Fetch any grid field.
    ///
    /// Vector fields take a component (`x` when `None`) and no species.
    /// Species-tagged fields take an optional species and no component;
    /// `None` selects the total over all species.
    pub fn grid_field(
        &self,
        kind: FieldKind,
        component: Option<Component>,
        species: Option<&str>,
    ) -> Result<ArrayD<f64>> {
        let _enter = self.span.enter();
        let loaded = self.loaded()?;

        if kind.class() != FieldClass::Grid {
            return Err(SnapshotError::UnknownField(format!(
                "{} is not a grid field",
                kind
            )));
        }

        match kind.key_shape() {
            KeyShape::Component => {
                if let Some(species) = species {
                    return Err(SnapshotError::unknown_species(kind.name(), species));
                }
                let component = component.unwrap_or_default();
                loaded.grid.require(component)?;

                match component.axis() {
                    Some(axis) => self.grid_component(loaded, kind, axis),
                    None => {
                        let source = GridSource::new(&loaded.grid, |axis| {
                            self.grid_component(loaded, kind, axis)
                        });
                        self.resolver.resolve(&source, component)
                    }
                }
            }
            _ => {
                if let Some(component) = component {
                    return Err(SnapshotError::unknown_component(kind.name(), component.as_str()));
                }

                let token = match species {
                    Some(s) => FieldToken::species(s),
                    None => FieldToken::Bare,
                };
                if !loaded.catalog.has_grid_token(kind, &token) {
                    return Err(match species {
                        _ if !loaded.catalog.contains(kind) => {
                            SnapshotError::UnknownField(kind.name().to_string())
                        }
                        Some(s) => SnapshotError::unknown_species(kind.name(), s),
                        None => SnapshotError::UnknownField(format!("{} (total)", kind.name())),
                    });
                }

                self.fetch(loaded, kind, kind.raw_key(None, species))
            }
        }
    }

    fn grid_component(
        &self,
        loaded: &LoadedSnapshot<D::Handle>,
        kind: FieldKind,
        axis: Axis,
    ) -> Result<ArrayD<f64>> {
        let token = FieldToken::from(Component::from(axis));
        if !loaded.catalog.has_grid_token(kind, &token) {
            return Err(if loaded.catalog.contains(kind) {
                SnapshotError::unknown_component(kind.name(), axis.as_str())
            } else {
                SnapshotError::UnknownField(kind.name().to_string())
            });
        }
        self.fetch(loaded, kind, kind.raw_key(Some(axis.as_str()), None))
    }

    // ------------------------------------------------------------------
    // Particle fields
    // ------------------------------------------------------------------

    /// Raw coordinate block of a species, shaped `(axis, particle)`.
    pub fn coordinates(&self, species: &str) -> Result<ArrayD<f64>> {
        let _enter = self.span.enter();
        let loaded = self.loaded()?;
        self.coordinate_block(loaded, species)
    }

    /// One component of the particle positions of a species.
    pub fn coordinate(&self, species: &str, component: Component) -> Result<ArrayD<f64>> {
        let _enter = self.span.enter();
        let loaded = self.loaded()?;
        loaded.grid.require(component)?;

        match component.axis() {
            Some(axis) => self.coordinate_row(loaded, species, axis),
            None => {
                let source = ParticleSource::new(
                    loaded.grid.dim(),
                    |axis| self.coordinate_row(loaded, species, axis),
                    |axis| self.coordinate_row(loaded, species, axis),
                );
                self.resolver.resolve(&source, component)
            }
        }
    }

    /// One component of the particle momentum of a species.
    ///
    /// `None` selects `x`. Derived components use the particle positions
    /// for the sign of `r` and `r3d`.
    pub fn momentum(
        &self,
        species: &str,
        component: impl Into<Option<Component>>,
    ) -> Result<ArrayD<f64>> {
        let component = component.into().unwrap_or_default();
        let _enter = self.span.enter();
        let loaded = self.loaded()?;
        loaded.grid.require(component)?;

        match component.axis() {
            Some(axis) => self.momentum_component(loaded, species, axis),
            None => {
                let source = ParticleSource::new(
                    loaded.grid.dim(),
                    |axis| self.momentum_component(loaded, species, axis),
                    |axis| self.coordinate_row(loaded, species, axis),
                );
                self.resolver.resolve(&source, component)
            }
        }
    }

    fn coordinate_block(&self, loaded: &LoadedSnapshot<D::Handle>, species: &str) -> Result<ArrayD<f64>> {
        let kind = FieldKind::Coordinates;
        let present = loaded
            .catalog
            .particle_species(kind, &ParticleSlot::SpeciesOnly)
            .map(|set| set.contains(species));

        match present {
            Some(true) => self.fetch(loaded, kind, kind.raw_key(None, Some(species))),
            Some(false) => Err(SnapshotError::unknown_species(kind.name(), species)),
            None => Err(SnapshotError::UnknownField(kind.name().to_string())),
        }
    }

    fn coordinate_row(
        &self,
        loaded: &LoadedSnapshot<D::Handle>,
        species: &str,
        axis: Axis,
    ) -> Result<ArrayD<f64>> {
        let block = self.coordinate_block(loaded, species)?;
        if block.ndim() != 2 || axis.ordinal() >= block.shape()[0] {
            return Err(SnapshotError::shape_mismatch(format!(
                "coordinates of {} have shape {:?}, no row for axis {}",
                species,
                block.shape(),
                axis
            )));
        }
        Ok(block.index_axis(NdAxis(0), axis.ordinal()).to_owned())
    }

    fn momentum_component(
        &self,
        loaded: &LoadedSnapshot<D::Handle>,
        species: &str,
        axis: Axis,
    ) -> Result<ArrayD<f64>> {
        let kind = FieldKind::Momentum;
        let slot = ParticleSlot::from(Component::from(axis));

        if !loaded.catalog.contains(kind) {
            return Err(SnapshotError::UnknownField(kind.name().to_string()));
        }
        match loaded.catalog.particle_species(kind, &slot) {
            None => Err(SnapshotError::unknown_component(kind.name(), axis.as_str())),
            Some(set) if !set.contains(species) => {
                Err(SnapshotError::unknown_species(kind.name(), species))
            }
            Some(_) => self.fetch(loaded, kind, kind.raw_key(Some(axis.as_str()), Some(species))),
        }
    }

    // ------------------------------------------------------------------
    // Scalar fields
    // ------------------------------------------------------------------

    /// Value of a scalar diagnostic.
    pub fn scalar(&self, kind: FieldKind) -> Result<f64> {
        let _enter = self.span.enter();
        let loaded = self.loaded()?;

        if kind.class() != FieldClass::Scalar || !loaded.catalog.has_scalar(kind) {
            return Err(SnapshotError::UnknownField(kind.name().to_string()));
        }

        let block = self.fetch(loaded, kind, kind.raw_key(None, None))?;
        block
            .iter()
            .next()
            .copied()
            .ok_or_else(|| SnapshotError::shape_mismatch(format!("{} block is empty", kind.name())))
    }

    fn fetch(
        &self,
        loaded: &LoadedSnapshot<D::Handle>,
        kind: FieldKind,
        key: String,
    ) -> Result<ArrayD<f64>> {
        if loaded.catalog.kind_of(&key) != Some(kind) {
            return Err(SnapshotError::MissingKey(key));
        }
        debug!(key = %key, "Fetching block");
        loaded.handle.fetch(&key).map_err(SnapshotError::decoder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata::{midpoints, particle_block, MemoryDecoder, MemorySnapshot};
    use ndarray::{arr1, IxDyn};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::registry::LookupSpan;
    use tracing_subscriber::Layer;

    fn handler_with(snapshot: MemorySnapshot) -> SnapshotHandler<MemoryDecoder> {
        let decoder = MemoryDecoder::new().with("snap.sdf", snapshot);
        let mut handler = SnapshotHandler::new(decoder, HandlerConfig::default());
        handler.read("snap.sdf").unwrap();
        handler
    }

    #[test]
    fn test_accessors_before_read() {
        let handler = SnapshotHandler::new(MemoryDecoder::new(), HandlerConfig::default());
        assert!(!handler.is_loaded());
        assert!(matches!(handler.time(), Err(SnapshotError::NotLoaded)));
        assert!(matches!(handler.density(None), Err(SnapshotError::NotLoaded)));
    }

    #[test]
    fn test_species_field_selection() {
        let handler = handler_with(
            MemorySnapshot::new(vec![midpoints(0.0, 1.0, 3)])
                .with_block("Derived_Number_Density", arr1(&[1.0, 1.0, 1.0]).into_dyn())
                .with_block("Derived_Number_Density_electron", arr1(&[2.0, 2.0, 2.0]).into_dyn()),
        );

        assert_eq!(handler.density(None).unwrap()[IxDyn(&[0])], 1.0);
        assert_eq!(handler.density(Some("electron")).unwrap()[IxDyn(&[0])], 2.0);
        assert!(matches!(
            handler.density(Some("ion")),
            Err(SnapshotError::UnknownSpecies { .. })
        ));
        assert!(matches!(
            handler.temperature(None),
            Err(SnapshotError::UnknownField(_))
        ));
        assert!(matches!(
            handler.grid_field(FieldKind::Density, Some(Component::X), None),
            Err(SnapshotError::UnknownComponent { .. })
        ));
    }

    #[test]
    fn test_missing_total() {
        let handler = handler_with(
            MemorySnapshot::new(vec![midpoints(0.0, 1.0, 3)])
                .with_block("Derived_Temperature_electron", arr1(&[2.0, 2.0, 2.0]).into_dyn()),
        );
        let err = handler.temperature(None).unwrap_err();
        assert_eq!(err.to_string(), "field not found: temperature (total)");
    }

    #[test]
    fn test_non_grid_kind_rejected() {
        let handler = handler_with(MemorySnapshot::new(vec![midpoints(0.0, 1.0, 3)]));
        assert!(matches!(
            handler.grid_field(FieldKind::Momentum, None, None),
            Err(SnapshotError::UnknownField(_))
        ));
        assert!(matches!(
            handler.scalar(FieldKind::Density),
            Err(SnapshotError::UnknownField(_))
        ));
    }

    #[test]
    fn test_scalar_value() {
        let handler = handler_with(
            MemorySnapshot::new(vec![midpoints(0.0, 1.0, 3)]).with_block(
                "Total_Field_Energy_in_Simulation__J_",
                arr1(&[12.5]).into_dyn(),
            ),
        );
        assert_eq!(handler.scalar(FieldKind::TotalFieldEnergy).unwrap(), 12.5);
        assert!(handler.scalar(FieldKind::TotalParticleEnergy).is_err());
    }

    #[test]
    fn test_vector_accessors_default_to_x() {
        let handler = handler_with(
            MemorySnapshot::new(vec![midpoints(0.0, 1.0, 3)])
                .with_block("Electric_Field_Ex", arr1(&[1.0, 2.0, 3.0]).into_dyn())
                .with_block("Grid_Particles_electron", particle_block(&[vec![0.5, 1.0]]))
                .with_block("Particles_Px_electron", arr1(&[4.0, 5.0]).into_dyn()),
        );

        assert_eq!(
            handler.electric_field(None).unwrap(),
            handler.electric_field(Component::X).unwrap()
        );
        assert_eq!(
            handler.momentum("electron", None).unwrap(),
            arr1(&[4.0, 5.0]).into_dyn()
        );
        assert!(matches!(
            handler.magnetic_field(None),
            Err(SnapshotError::UnknownField(_))
        ));
    }

    /// Records the spans enclosing every event from the catalog crate.
    #[derive(Clone, Default)]
    struct CatalogEventScopes(Arc<Mutex<Vec<Vec<String>>>>);

    impl<S> Layer<S> for CatalogEventScopes
    where
        S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    {
        fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
            if !event.metadata().target().starts_with("sdf_catalog") {
                return;
            }
            let names = ctx
                .event_scope(event)
                .map(|scope| scope.map(|span| span.name().to_string()).collect())
                .unwrap_or_default();
            self.0.lock().unwrap().push(names);
        }
    }

    #[test]
    fn test_discovery_events_inside_handler_span() {
        let scopes = CatalogEventScopes::default();
        let subscriber = tracing_subscriber::registry().with(scopes.clone());

        tracing::subscriber::with_default(subscriber, || {
            let handler = handler_with(
                MemorySnapshot::new(vec![midpoints(0.0, 1.0, 3)])
                    .with_block("Derived_Temperature_", arr1(&[0.0, 0.0, 0.0]).into_dyn()),
            );
            assert!(handler.is_loaded());
        });

        let recorded = scopes.0.lock().unwrap();
        assert!(recorded.len() >= 2);
        for names in recorded.iter() {
            assert_eq!(names.first().map(String::as_str), Some("handler"));
        }
    }
}
