use crate::{
    core::{bounds::Bounds, geo::Point},
    LocatorError, Result,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Which edge of the popup touches its anchor coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AnchorSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl AnchorSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Left and right anchors push the popup sideways; top and bottom push it vertically
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

impl FromStr for AnchorSide {
    type Err = LocatorError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(LocatorError::InvalidAnchor(value.to_string())),
        }
    }
}

impl TryFrom<String> for AnchorSide {
    type Error = LocatorError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AnchorSide> for String {
    fn from(anchor: AnchorSide) -> Self {
        anchor.as_str().to_string()
    }
}

impl fmt::Display for AnchorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pixel displacement applied when anchoring the popup, written `[dx, dy]` in options
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct PopupOffset {
    pub dx: f64,
    pub dy: f64,
}

impl PopupOffset {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

impl From<[f64; 2]> for PopupOffset {
    fn from([dx, dy]: [f64; 2]) -> Self {
        Self::new(dx, dy)
    }
}

impl From<PopupOffset> for [f64; 2] {
    fn from(offset: PopupOffset) -> Self {
        [offset.dx, offset.dy]
    }
}

/// Anchor side and offset together describe where a popup sits relative to its coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupPlacement {
    pub anchor: AnchorSide,
    pub offset: PopupOffset,
}

impl PopupPlacement {
    pub fn new(anchor: AnchorSide, offset: PopupOffset) -> Self {
        Self { anchor, offset }
    }

    /// Screen rectangle of a popup of `size` whose anchor coordinate projects to `anchor_px`
    pub fn screen_rect(&self, anchor_px: Point, size: MeasuredSize) -> Bounds {
        let a = Point::new(anchor_px.x + self.offset.dx, anchor_px.y + self.offset.dy);
        let (w, h) = (size.width, size.height);

        match self.anchor {
            AnchorSide::Bottom => Bounds::from_coords(a.x - w / 2.0, a.y - h, a.x + w / 2.0, a.y),
            AnchorSide::Top => Bounds::from_coords(a.x - w / 2.0, a.y, a.x + w / 2.0, a.y + h),
            AnchorSide::Left => Bounds::from_coords(a.x, a.y - h / 2.0, a.x + w, a.y + h / 2.0),
            AnchorSide::Right => Bounds::from_coords(a.x - w, a.y - h / 2.0, a.x, a.y + h / 2.0),
        }
    }

    /// How far the popup's far edge crosses the viewport's safety margin.
    ///
    /// Only the edge the popup grows towards is considered, the same axis the
    /// centering engine corrects. Zero or negative means it fits.
    pub fn overflow(&self, rect: &Bounds, viewport: ViewportSize, margin: f64) -> f64 {
        match self.anchor {
            AnchorSide::Left => rect.max.x - (viewport.width - margin),
            AnchorSide::Right => margin - rect.min.x,
            AnchorSide::Bottom => margin - rect.min.y,
            AnchorSide::Top => rect.max.y - (viewport.height - margin),
        }
    }
}

/// Rendered box of popup content in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasuredSize {
    pub width: f64,
    pub height: f64,
}

impl MeasuredSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Grows both dimensions by `padding`, accounting for popup chrome around measured content
    pub fn inflated(&self, padding: f64) -> Self {
        Self::new(self.width + padding, self.height + padding)
    }

    /// Non-finite or negative readings collapse to zero
    pub fn sanitized(&self) -> Self {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(clean(self.width), clean(self.height))
    }
}

/// Pixel size of the live map surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    pub fn as_bounds(&self) -> Bounds {
        Bounds::from_coords(0.0, 0.0, self.width, self.height)
    }
}

/// Text content of a store popup, laid out off-screen to learn its size
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PopupContent {
    pub title: String,
    pub lines: Vec<String>,
}

impl PopupContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.lines.iter().all(|l| l.is_empty())
    }

    /// Title followed by each line, newline separated
    pub fn to_text(&self) -> String {
        std::iter::once(self.title.as_str())
            .chain(self.lines.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_parsing() {
        assert_eq!("left".parse::<AnchorSide>().unwrap(), AnchorSide::Left);
        assert_eq!(" Bottom ".parse::<AnchorSide>().unwrap(), AnchorSide::Bottom);
        assert!(matches!(
            "top-left".parse::<AnchorSide>(),
            Err(LocatorError::InvalidAnchor(_))
        ));
    }

    #[test]
    fn test_anchor_serde() {
        let anchor: AnchorSide = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(anchor, AnchorSide::Right);
        assert_eq!(serde_json::to_string(&AnchorSide::Top).unwrap(), "\"top\"");
        assert!(serde_json::from_str::<AnchorSide>("\"center\"").is_err());
    }

    #[test]
    fn test_offset_from_array() {
        let offset: PopupOffset = serde_json::from_str("[0.1, -20]").unwrap();
        assert_eq!(offset, PopupOffset::new(0.1, -20.0));
    }

    #[test]
    fn test_screen_rect_per_anchor() {
        let size = MeasuredSize::new(100.0, 50.0);
        let at = Point::new(200.0, 150.0);
        let offset = PopupOffset::new(0.0, -10.0);

        let bottom = PopupPlacement::new(AnchorSide::Bottom, offset).screen_rect(at, size);
        assert_eq!(bottom, Bounds::from_coords(150.0, 90.0, 250.0, 140.0));

        let left = PopupPlacement::new(AnchorSide::Left, offset).screen_rect(at, size);
        assert_eq!(left, Bounds::from_coords(200.0, 115.0, 300.0, 165.0));

        let right = PopupPlacement::new(AnchorSide::Right, offset).screen_rect(at, size);
        assert_eq!(right.max.x, 200.0);
        assert_eq!(right.width(), 100.0);
    }

    #[test]
    fn test_overflow_sign() {
        let viewport = ViewportSize::new(400.0, 300.0);
        let placement = PopupPlacement::new(AnchorSide::Left, PopupOffset::default());

        let fits = placement.screen_rect(Point::new(200.0, 150.0), MeasuredSize::new(180.0, 10.0));
        assert_eq!(placement.overflow(&fits, viewport, 20.0), 0.0);

        let spills = placement.screen_rect(Point::new(200.0, 150.0), MeasuredSize::new(220.0, 10.0));
        assert_eq!(placement.overflow(&spills, viewport, 20.0), 40.0);
    }

    #[test]
    fn test_measured_size_sanitizing() {
        let size = MeasuredSize::new(f64::NAN, -3.0).sanitized();
        assert_eq!(size, MeasuredSize::zero());
        assert_eq!(MeasuredSize::new(10.0, 5.0).inflated(40.0), MeasuredSize::new(50.0, 45.0));
    }

    #[test]
    fn test_degenerate_viewport() {
        assert!(ViewportSize::new(0.0, 300.0).is_degenerate());
        assert!(ViewportSize::new(400.0, f64::NAN).is_degenerate());
        assert!(!ViewportSize::new(400.0, 300.0).is_degenerate());
    }
}
