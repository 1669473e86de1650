use crate::{LocatorError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Web Mercator projection constants
pub(crate) const EARTH_RADIUS: f64 = 6378137.0;
pub(crate) const MAX_LATITUDE: f64 = 85.0511287798;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Parses a `"lat,lng"` pair as carried in the locator's query string.
    pub fn parse_query(value: &str) -> Result<Self> {
        let (lat, lng) = value
            .split_once(',')
            .ok_or_else(|| LocatorError::ParseError(format!("expected `lat,lng`, got `{value}`")))?;

        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| LocatorError::ParseError(format!("`{}`: {}", part.trim(), e)))
        };
        let coord = LatLng::new(parse(lat)?, parse(lng)?);

        if !coord.is_valid() {
            return Err(LocatorError::InvalidCoordinates(format!(
                "{}, {} is outside the valid range",
                coord.lat, coord.lng
            )));
        }
        Ok(coord)
    }

    /// Clamps latitude to the range Web Mercator can represent
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }

    /// Converts to Web Mercator projection (EPSG:3857)
    pub fn to_mercator(&self) -> Point {
        let x = self.lng.to_radians() * EARTH_RADIUS;
        let y = ((PI / 4.0 + self.lat.to_radians() / 2.0).tan().ln()) * EARTH_RADIUS;
        Point::new(x, y)
    }

    /// Creates LatLng from Web Mercator coordinates
    pub fn from_mercator(point: Point) -> Self {
        let lng = (point.x / EARTH_RADIUS).to_degrees();
        let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Self::new(lat, lng)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a bounding box of geographical coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Smallest bounds containing every point, or `None` for an empty iterator
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = LatLngBounds::new(first, first);
        for point in points {
            bounds.extend(&point);
        }
        Some(bounds)
    }

    /// Extends the bounds to include a point
    pub fn extend(&mut self, point: &LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Gets the span of the bounds
    pub fn span(&self) -> LatLng {
        LatLng::new(
            self.north_east.lat - self.south_west.lat,
            self.north_east.lng - self.south_west.lng,
        )
    }

    /// `[[west, south], [east, north]]`, the lng/lat pair order map surfaces expect
    pub fn to_array(&self) -> [[f64; 2]; 2] {
        [
            [self.south_west.lng, self.south_west.lat],
            [self.north_east.lng, self.north_east.lat],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(40.7128, -74.0060);
        assert_eq!(coord.lat, 40.7128);
        assert_eq!(coord.lng, -74.0060);
        assert!(coord.is_valid());
    }

    #[test]
    fn test_mercator_round_trip() {
        let coord = LatLng::new(40.7128, -74.0060);
        let back = LatLng::from_mercator(coord.to_mercator());
        assert!((back.lat - coord.lat).abs() < 1e-9);
        assert!((back.lng - coord.lng).abs() < 1e-9);
    }

    #[test]
    fn test_parse_query() {
        let coord = LatLng::parse_query("40.7128, -74.006").unwrap();
        assert_eq!(coord, LatLng::new(40.7128, -74.006));

        assert!(matches!(
            LatLng::parse_query("40.7128"),
            Err(LocatorError::ParseError(_))
        ));
        assert!(matches!(
            LatLng::parse_query("abc,1"),
            Err(LocatorError::ParseError(_))
        ));
        assert!(matches!(
            LatLng::parse_query("95,10"),
            Err(LocatorError::InvalidCoordinates(_))
        ));
    }

    #[test]
    fn test_bounds_from_points() {
        assert!(LatLngBounds::from_points(Vec::new()).is_none());

        let bounds = LatLngBounds::from_points(vec![
            LatLng::new(40.0, -74.0),
            LatLng::new(41.0, -75.0),
            LatLng::new(40.5, -73.0),
        ])
        .unwrap();

        assert_eq!(bounds.south_west, LatLng::new(40.0, -75.0));
        assert_eq!(bounds.north_east, LatLng::new(41.0, -73.0));
        assert_eq!(bounds.to_array(), [[-75.0, 40.0], [-73.0, 41.0]]);
    }
}
