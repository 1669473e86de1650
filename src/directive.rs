//! Viewport fit decisions
//!
//! Each time the locator's inputs change (results, selection, query
//! coordinate, device location) the previous and next snapshots are compared
//! to decide how the map should move. The decision is a pure function; the
//! locator carries it out against the map surface.

use crate::{
    core::{
        constants::DEFAULT_FIT_BOUNDS_PADDING,
        geo::{LatLng, LatLngBounds},
    },
    prelude::HashSet,
    store::{bounds_from_stores, Store, StoreId},
};

/// Immutable view of everything the map position depends on
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocatorSnapshot {
    pub stores: Vec<Store>,
    pub selected: Option<Store>,
    pub query_lat_lng: Option<LatLng>,
    pub geolocation: Option<LatLng>,
}

impl LocatorSnapshot {
    pub fn new(stores: Vec<Store>) -> Self {
        Self {
            stores,
            ..Self::default()
        }
    }

    pub fn with_selected(mut self, store: Option<Store>) -> Self {
        self.selected = store;
        self
    }

    pub fn with_query_lat_lng(mut self, at: Option<LatLng>) -> Self {
        self.query_lat_lng = at;
        self
    }

    pub fn with_geolocation(mut self, at: Option<LatLng>) -> Self {
        self.geolocation = at;
        self
    }

    fn selected_id(&self) -> Option<StoreId> {
        self.selected.as_ref().map(|s| s.id)
    }
}

/// Where the map should start out
#[derive(Debug, Clone, PartialEq)]
pub enum MapPosition {
    Center(LatLng),
    FitBounds(LatLngBounds),
}

/// What the map should do after a state change
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportDirective {
    CenterOn(LatLng),
    FitBounds { bounds: LatLngBounds, padding: f64 },
    /// Wait for the selected store's popup to be measured, then center around it
    AwaitPopup { key: String, target: LatLng },
    NoOp,
}

impl From<MapPosition> for ViewportDirective {
    fn from(position: MapPosition) -> Self {
        match position {
            MapPosition::Center(at) => ViewportDirective::CenterOn(at),
            MapPosition::FitBounds(bounds) => ViewportDirective::FitBounds {
                bounds,
                padding: DEFAULT_FIT_BOUNDS_PADDING,
            },
        }
    }
}

/// Initial map position: selected store, then result bounds, then query coordinate, then device location
pub fn initial_map_position(snapshot: &LocatorSnapshot) -> Option<MapPosition> {
    if let Some(store) = &snapshot.selected {
        return Some(MapPosition::Center(store.position()));
    }
    if let Some(bounds) = bounds_from_stores(&snapshot.stores) {
        return Some(MapPosition::FitBounds(bounds));
    }
    snapshot
        .query_lat_lng
        .or(snapshot.geolocation)
        .map(MapPosition::Center)
}

/// Same size and the same store ids on both sides, ignoring order
pub fn equal_store_results(a: &[Store], b: &[Store]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let ids_a: HashSet<StoreId> = a.iter().map(|s| s.id).collect();
    let ids_b: HashSet<StoreId> = b.iter().map(|s| s.id).collect();
    ids_a == ids_b
}

/// Decides the map movement for a transition from `prev` to `next`.
///
/// `prev` is `None` until a viewport has been established.
pub fn decide_viewport_directive(
    prev: Option<&LocatorSnapshot>,
    next: &LocatorSnapshot,
) -> ViewportDirective {
    let Some(prev) = prev else {
        return initial_map_position(next)
            .map(ViewportDirective::from)
            .unwrap_or(ViewportDirective::NoOp);
    };

    if let Some(store) = &next.selected {
        if prev.selected_id() == Some(store.id) {
            return ViewportDirective::NoOp;
        }
        return ViewportDirective::AwaitPopup {
            key: store.slug.clone(),
            target: store.position(),
        };
    }

    if let Some(bounds) = bounds_from_stores(&next.stores) {
        let selection_closed = prev.selected.is_some();
        if selection_closed || !equal_store_results(&prev.stores, &next.stores) {
            return ViewportDirective::FitBounds {
                bounds,
                padding: DEFAULT_FIT_BOUNDS_PADDING,
            };
        }
        return ViewportDirective::NoOp;
    }

    // Results just went empty: fall back to where the user is
    if !prev.stores.is_empty() {
        if let Some(at) = next.geolocation.or(next.query_lat_lng) {
            return ViewportDirective::CenterOn(at);
        }
    }

    ViewportDirective::NoOp
}

impl ViewportDirective {
    /// Overrides the fit-bounds padding of a directive
    pub fn with_padding(self, padding: f64) -> Self {
        match self {
            ViewportDirective::FitBounds { bounds, .. } => {
                ViewportDirective::FitBounds { bounds, padding }
            }
            other => other,
        }
    }
}
