//! Prelude module for common storemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use storemap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{CenteringConfig, LocatorOptions},
    geo::{LatLng, LatLngBounds, Point},
    viewport::Viewport,
};

pub use crate::centering::{
    compute_corrected_center, popup_fits, remaining_overflow, try_corrected_center, CenteringEngine,
    CenteringError, MeasurementTicket, PendingMeasurement,
};

pub use crate::directive::{
    decide_viewport_directive, equal_store_results, initial_map_position, LocatorSnapshot,
    MapPosition, ViewportDirective,
};

pub use crate::store::{bounds_from_stores, Coordinates, Store, StoreId};

pub use crate::traits::{LayoutBackend, MapSurface, Projection};

pub use crate::ui::{
    AnchorSide, DimensionsReady, HeuristicLayout, MeasuredSize, OffscreenProbe, PopupContent,
    PopupOffset, PopupPlacement, ProbeState, ViewportSize,
};

#[cfg(feature = "egui")]
pub use crate::ui::EguiLayout;

pub use crate::locator::StoreLocator;

pub use crate::{Error as LocatorError, Result};

pub use fxhash::FxHashSet as HashSet;
