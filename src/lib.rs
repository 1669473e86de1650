//! # storemap
//!
//! The logical core of a storefront store-locator map.
//!
//! When a store marker is selected, its popup is measured off-screen and the
//! map is panned so the popup, still anchored to the store, fits inside the
//! visible map. Result-set and selection changes are turned into fit-bounds or
//! center moves. Rendering, tiles and gestures belong to the host map; the
//! core talks to it only through the [`MapSurface`] and [`LayoutBackend`]
//! traits.

pub mod centering;
pub mod core;
pub mod directive;
pub mod locator;
pub mod prelude;
pub mod store;
pub mod traits;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    config::{CenteringConfig, LocatorOptions},
    geo::{LatLng, LatLngBounds, Point},
    viewport::Viewport,
};

pub use centering::{compute_corrected_center, CenteringEngine, CenteringError};

pub use directive::{decide_viewport_directive, equal_store_results, ViewportDirective};

pub use locator::StoreLocator;

pub use store::Store;

pub use traits::{LayoutBackend, MapSurface, Projection};

pub use ui::{
    AnchorSide, DimensionsReady, MeasuredSize, OffscreenProbe, PopupOffset, PopupPlacement,
    ViewportSize,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, LocatorError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid popup anchor: {0} (expected top, bottom, left or right)")]
    InvalidAnchor(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = LocatorError;
