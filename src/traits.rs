//! Seams between the locator core and the collaborators it drives
//!
//! The map surface and the layout host are external: a GL map, an egui
//! painter, or a test stub. The core only ever talks to them through these
//! traits, never through a global handle.

use crate::{
    core::geo::{LatLng, LatLngBounds, Point},
    ui::popup::{MeasuredSize, PopupContent, ViewportSize},
};

/// Forward and inverse projection between geographic and container pixel space
pub trait Projection {
    /// Transform geographic coordinates to pixel coordinates
    fn project(&self, lat_lng: LatLng) -> Point;

    /// Transform pixel coordinates to geographic coordinates
    fn unproject(&self, point: Point) -> LatLng;
}

/// A live map the locator can read and move
pub trait MapSurface: Projection {
    /// Current pixel size of the map container; read on every use
    fn size(&self) -> ViewportSize;

    /// Animate the map center to `center`
    fn fly_to(&mut self, center: LatLng);

    /// Zoom and center the map so `bounds` fit with `padding` pixels spare
    fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64);
}

/// Host capable of laying popup content out somewhere invisible and reporting its box.
///
/// Implementations must lay content out at its natural size (far outside the
/// visible area rather than collapsed or hidden) and must not let it capture
/// pointer or focus.
pub trait LayoutBackend {
    /// Lay out `content` off-screen and return its rendered size, or `None` if nothing rendered
    fn layout_offscreen(&mut self, content: &PopupContent) -> Option<MeasuredSize>;
}
