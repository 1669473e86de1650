//! The store locator controller
//!
//! Owns the selection state, the off-screen probe and the centering engine,
//! and drives an injected [`MapSurface`]. Hosts feed it snapshots of the
//! surrounding state and tell it when the map has loaded and when a layout
//! pass has completed.

use crate::{
    centering::CenteringEngine,
    core::{config::LocatorOptions, geo::LatLng},
    directive::{
        decide_viewport_directive, initial_map_position, LocatorSnapshot, MapPosition,
        ViewportDirective,
    },
    store::Store,
    traits::{LayoutBackend, MapSurface},
    ui::probe::OffscreenProbe,
};

pub struct StoreLocator<S: MapSurface, B: LayoutBackend> {
    options: LocatorOptions,
    surface: Option<S>,
    probe: OffscreenProbe<B>,
    engine: CenteringEngine,
    snapshot: LocatorSnapshot,
    /// Position to apply once the map surface loads
    deferred: Option<MapPosition>,
    /// Whether the map has been moved to an initial position yet
    viewport_established: bool,
}

impl<S: MapSurface, B: LayoutBackend> StoreLocator<S, B> {
    pub fn new(options: LocatorOptions, backend: B, snapshot: LocatorSnapshot) -> Self {
        let engine = CenteringEngine::new(options.popup_placement(), options.centering);
        let deferred = initial_map_position(&snapshot);

        Self {
            options,
            surface: None,
            probe: OffscreenProbe::new(backend),
            engine,
            snapshot,
            deferred,
            viewport_established: false,
        }
    }

    pub fn options(&self) -> &LocatorOptions {
        &self.options
    }

    pub fn snapshot(&self) -> &LocatorSnapshot {
        &self.snapshot
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn probe(&self) -> &OffscreenProbe<B> {
        &self.probe
    }

    pub fn engine(&self) -> &CenteringEngine {
        &self.engine
    }

    /// Applies the deferred initial position and starts measuring a preselected store's popup
    pub fn map_loaded(&mut self, surface: S) {
        let surface = self.surface.insert(surface);

        if let Some(position) = self.deferred.take() {
            log::debug!("map loaded, applying initial position {:?}", position);
            match position {
                MapPosition::FitBounds(bounds) => {
                    surface.fit_bounds(&bounds, self.options.centering.fit_bounds_padding)
                }
                MapPosition::Center(at) => surface.fly_to(at),
            }
            self.viewport_established = true;
        }

        if let Some(store) = self.snapshot.selected.clone() {
            self.start_measurement(&store);
        }
    }

    /// Moves to `next`, issuing whatever the transition calls for. Returns the directive.
    pub fn update(&mut self, next: LocatorSnapshot) -> ViewportDirective {
        let Some(surface) = self.surface.as_mut() else {
            // Not loaded yet: the latest state decides where the map starts
            self.deferred = initial_map_position(&next);
            self.snapshot = next;
            return ViewportDirective::NoOp;
        };

        // Until the map has an initial position, every change is a first position
        let established = self.viewport_established;
        let prev = established.then_some(&self.snapshot);
        let directive = decide_viewport_directive(prev, &next)
            .with_padding(self.options.centering.fit_bounds_padding);
        log::debug!("viewport directive: {:?}", directive);

        match &directive {
            ViewportDirective::CenterOn(at) => surface.fly_to(*at),
            ViewportDirective::FitBounds { bounds, padding } => surface.fit_bounds(bounds, *padding),
            ViewportDirective::AwaitPopup { .. } | ViewportDirective::NoOp => {}
        }
        if directive != ViewportDirective::NoOp {
            self.viewport_established = true;
        }

        match &next.selected {
            Some(store) => {
                let first_position = !established && self.viewport_established;
                if first_position || matches!(directive, ViewportDirective::AwaitPopup { .. }) {
                    self.start_measurement(store);
                }
            }
            None => {
                self.probe.unmount();
                self.engine.cancel();
            }
        }

        self.snapshot = next;
        directive
    }

    /// Marker click
    pub fn select_store(&mut self, store: Store) -> ViewportDirective {
        let next = self.snapshot.clone().with_selected(Some(store));
        self.update(next)
    }

    /// Popup close button
    pub fn close_popup(&mut self) -> ViewportDirective {
        let next = self.snapshot.clone().with_selected(None);
        self.update(next)
    }

    /// Sets the parsed query-string coordinate; malformed values are ignored
    pub fn set_query(&mut self, query: Option<&str>) -> ViewportDirective {
        let query_lat_lng = query.and_then(|q| match LatLng::parse_query(q) {
            Ok(at) => Some(at),
            Err(e) => {
                log::warn!("ignoring query coordinate: {}", e);
                None
            }
        });
        let next = self.snapshot.clone().with_query_lat_lng(query_lat_lng);
        self.update(next)
    }

    /// Called by the host once layout has settled. Returns the center flown to, if any.
    pub fn layout_pass_completed(&mut self) -> Option<LatLng> {
        let ready = self.probe.complete_layout_pass()?;
        let surface = self.surface.as_mut()?;
        self.engine.on_dimensions_ready(&ready, surface)
    }

    fn start_measurement(&mut self, store: &Store) {
        let ticket = self.engine.request(store.slug.clone(), store.position());
        let scheduled = self.probe.measure(store.popup_content(), store.slug.clone());

        if scheduled || self.probe.is_pending() {
            self.engine.bind_pass(&ticket, self.probe.pass());
        } else if let Some(surface) = self.surface.as_mut() {
            // Content already measured under this key; no new pass will report it
            self.engine
                .resolve(&ticket, self.probe.measured_size(), surface);
        }
    }
}
