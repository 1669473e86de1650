//! Core constants derived from Mapbox GL defaults and the storefront locator's conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Pixels kept free between a popup and the viewport edge.
pub const DEFAULT_SAFETY_MARGIN: f64 = 20.0;

/// Extra clearance added to the pan once a popup is known to overflow.
pub const DEFAULT_CLEARANCE_PADDING: f64 = 20.0;

/// Added to both measured popup dimensions to cover the popup's chrome
/// (tip, border, close button) which the off-screen content does not include.
pub const DEFAULT_MEASUREMENT_PADDING: f64 = 40.0;

/// Padding used whenever the map fits the store result set.
pub const DEFAULT_FIT_BOUNDS_PADDING: f64 = 40.0;

/// Map style used when the options do not name one.
pub const DEFAULT_STYLE_TEMPLATE: &str = "mapbox://styles/mapbox/streets-v9";

/// Popup offset `(dx, dy)` lifting the popup above the pin head.
pub const DEFAULT_POPUP_OFFSET: (f64, f64) = (0.1, -20.0);
