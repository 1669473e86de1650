use crate::core::constants::TILE_SIZE;
use crate::core::geo::{LatLng, LatLngBounds, Point, EARTH_RADIUS};
use crate::ui::popup::ViewportSize;
use crate::traits::{MapSurface, Projection};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(0.0, 18.0),
            size,
            min_zoom: 0.0,
            max_zoom: 18.0,
        }
    }

    /// Sets the center of the viewport, clamped to the world
    pub fn set_center(&mut self, center: LatLng) {
        self.center = LatLng::new(
            LatLng::clamp_lat(center.lat),
            center.lng.clamp(-180.0, 180.0),
        );
    }

    /// Sets the zoom level, clamping to valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level (EPSG:3857)
    pub fn project_world(&self, lat_lng: &LatLng, zoom: Option<f64>) -> Point {
        let scale = TILE_SIZE as f64 * 2_f64.powf(zoom.unwrap_or(self.zoom));
        let mercator = lat_lng.to_mercator();
        let world = 2.0 * PI * EARTH_RADIUS;

        Point::new(
            (mercator.x + PI * EARTH_RADIUS) / world * scale,
            (-mercator.y + PI * EARTH_RADIUS) / world * scale,
        )
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom level
    pub fn unproject_world(&self, pixel: &Point, zoom: Option<f64>) -> LatLng {
        let scale = TILE_SIZE as f64 * 2_f64.powf(zoom.unwrap_or(self.zoom));
        let world = 2.0 * PI * EARTH_RADIUS;

        LatLng::from_mercator(Point::new(
            (pixel.x / scale) * world - PI * EARTH_RADIUS,
            PI * EARTH_RADIUS - (pixel.y / scale) * world,
        ))
    }

    /// Converts a geographical coordinate to container pixel coordinates
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let origin = self.project_world(&self.center, None);
        self.project_world(lat_lng, None)
            .subtract(&origin)
            .add(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
    }

    /// Converts container pixel coordinates back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = self.project_world(&self.center, None);
        let world = pixel
            .subtract(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
            .add(&origin);
        self.unproject_world(&world, None)
    }

    /// Fits the viewport to contain the given bounds, keeping `padding` pixels clear on each side
    pub fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) {
        let available = Point::new(self.size.x - 2.0 * padding, self.size.y - 2.0 * padding);

        let nw = LatLng::new(bounds.north_east.lat, bounds.south_west.lng);
        let se = LatLng::new(bounds.south_west.lat, bounds.north_east.lng);

        // Center on the projected midpoint so the padding is symmetric in pixels
        let mid = {
            let a = self.project_world(&nw, Some(0.0));
            let b = self.project_world(&se, Some(0.0));
            self.unproject_world(&Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0), Some(0.0))
        };

        let span = bounds.span();
        let mut best_zoom = self.min_zoom;
        if span.lat == 0.0 && span.lng == 0.0 {
            // A single point fits at any zoom; keep the current one
            best_zoom = self.zoom;
        } else {
            for test_zoom in (self.min_zoom as i32)..=(self.max_zoom as i32) {
                let zoom = test_zoom as f64;
                let a = self.project_world(&nw, Some(zoom));
                let b = self.project_world(&se, Some(zoom));

                if (b.x - a.x).abs() <= available.x && (b.y - a.y).abs() <= available.y {
                    best_zoom = zoom;
                } else {
                    break;
                }
            }
        }

        log::debug!(
            "fit bounds SW({:.5}, {:.5}) NE({:.5}, {:.5}) -> zoom {}",
            bounds.south_west.lat,
            bounds.south_west.lng,
            bounds.north_east.lat,
            bounds.north_east.lng,
            best_zoom
        );

        self.set_center(mid);
        self.set_zoom(best_zoom);
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

impl Projection for Viewport {
    fn project(&self, lat_lng: LatLng) -> Point {
        self.lat_lng_to_pixel(&lat_lng)
    }

    fn unproject(&self, point: Point) -> LatLng {
        self.pixel_to_lat_lng(&point)
    }
}

/// A bare viewport acts as a map surface whose fly-to lands instantly
impl MapSurface for Viewport {
    fn size(&self) -> ViewportSize {
        ViewportSize::new(self.size.x, self.size.y)
    }

    fn fly_to(&mut self, center: LatLng) {
        self.set_center(center);
    }

    fn fit_bounds(&mut self, bounds: &LatLngBounds, padding: f64) {
        Viewport::fit_bounds(self, bounds, padding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(
            LatLng::new(40.7128, -74.0060),
            10.0,
            Point::new(800.0, 600.0),
        );

        assert_eq!(viewport.zoom, 10.0);
        assert_eq!(viewport.center.lat, 40.7128);
        assert_eq!(viewport.size.x, 800.0);
    }

    #[test]
    fn test_coordinate_conversion() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));

        let center_lat_lng = viewport.pixel_to_lat_lng(&Point::new(256.0, 256.0));
        assert!(center_lat_lng.lat.abs() < 1e-9);
        assert!(center_lat_lng.lng.abs() < 1e-9);

        let p = LatLng::new(12.5, -30.25);
        let back = viewport.pixel_to_lat_lng(&viewport.lat_lng_to_pixel(&p));
        assert!((back.lat - p.lat).abs() < 1e-9);
        assert!((back.lng - p.lng).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_clamped_to_limits() {
        let mut viewport = Viewport::default();

        viewport.set_zoom(-1.0);
        assert_eq!(viewport.zoom, 0.0);

        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 18.0);
    }

    #[test]
    fn test_fit_bounds_contains_every_corner() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 3.0, Point::new(800.0, 600.0));
        let bounds = LatLngBounds::from_coords(40.0, -75.0, 41.0, -73.0);

        viewport.fit_bounds(&bounds, 40.0);

        for corner in [bounds.south_west, bounds.north_east] {
            let px = viewport.lat_lng_to_pixel(&corner);
            assert!(px.x >= 40.0 - 1e-6 && px.x <= 760.0 + 1e-6, "x = {}", px.x);
            assert!(px.y >= 40.0 - 1e-6 && px.y <= 560.0 + 1e-6, "y = {}", px.y);
        }
        assert!(viewport.zoom > 3.0);
    }

    #[test]
    fn test_fit_bounds_single_point_keeps_zoom() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 7.0, Point::new(800.0, 600.0));
        let p = LatLng::new(48.85, 2.35);
        viewport.fit_bounds(&LatLngBounds::new(p, p), 40.0);

        assert_eq!(viewport.zoom, 7.0);
        assert!((viewport.center.lat - p.lat).abs() < 1e-9);
        assert!((viewport.center.lng - p.lng).abs() < 1e-9);
    }
}
