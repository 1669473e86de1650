//! Configuration for the store locator
//!
//! Options mirror what a storefront theme passes to the locator widget: the
//! map style, pin and popup anchors, the popup offset and whether pins carry
//! numbers. Centering distances live in [`CenteringConfig`].

use crate::{
    core::constants::{
        DEFAULT_CLEARANCE_PADDING, DEFAULT_FIT_BOUNDS_PADDING, DEFAULT_MEASUREMENT_PADDING,
        DEFAULT_POPUP_OFFSET, DEFAULT_SAFETY_MARGIN, DEFAULT_STYLE_TEMPLATE,
    },
    ui::popup::{AnchorSide, PopupOffset, PopupPlacement},
    LocatorError, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocatorOptions {
    pub style_template: String,
    pub pin_anchor: AnchorSide,
    pub popup_anchor: AnchorSide,
    pub popup_offset: PopupOffset,
    pub number_pins: bool,
    pub centering: CenteringConfig,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self {
            style_template: DEFAULT_STYLE_TEMPLATE.to_string(),
            pin_anchor: AnchorSide::Bottom,
            popup_anchor: AnchorSide::Bottom,
            popup_offset: PopupOffset::new(DEFAULT_POPUP_OFFSET.0, DEFAULT_POPUP_OFFSET.1),
            number_pins: false,
            centering: CenteringConfig::default(),
        }
    }
}

impl LocatorOptions {
    /// Parses options from JSON; missing fields take their defaults, bad anchors are rejected here
    pub fn from_json(json: &str) -> Result<Self> {
        let options: LocatorOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.popup_offset.dx.is_finite() && self.popup_offset.dy.is_finite()) {
            return Err(LocatorError::Config(format!(
                "popup offset must be finite, got {:?}",
                self.popup_offset
            )));
        }
        self.centering.validate()
    }

    pub fn popup_placement(&self) -> PopupPlacement {
        PopupPlacement::new(self.popup_anchor, self.popup_offset)
    }

    /// 1-based pin label for the store at `index`, when pins are numbered
    pub fn marker_label(&self, index: usize) -> Option<String> {
        self.number_pins.then(|| (index + 1).to_string())
    }
}

/// Pixel distances used by the centering engine and bounds fitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CenteringConfig {
    /// Space kept between the popup and the viewport edge
    pub safety_margin: f64,
    /// Extra clearance added once the popup is known to overflow
    pub clearance_padding: f64,
    /// Added to both measured dimensions before centering
    pub measurement_padding: f64,
    /// Padding for fit-bounds moves over the result set
    pub fit_bounds_padding: f64,
}

impl Default for CenteringConfig {
    fn default() -> Self {
        Self {
            safety_margin: DEFAULT_SAFETY_MARGIN,
            clearance_padding: DEFAULT_CLEARANCE_PADDING,
            measurement_padding: DEFAULT_MEASUREMENT_PADDING,
            fit_bounds_padding: DEFAULT_FIT_BOUNDS_PADDING,
        }
    }
}

impl CenteringConfig {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("safetyMargin", self.safety_margin),
            ("clearancePadding", self.clearance_padding),
            ("measurementPadding", self.measurement_padding),
            ("fitBoundsPadding", self.fit_bounds_padding),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(LocatorError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_storefront_widget() {
        let options = LocatorOptions::default();
        assert_eq!(options.style_template, "mapbox://styles/mapbox/streets-v9");
        assert_eq!(options.pin_anchor, AnchorSide::Bottom);
        assert_eq!(options.popup_anchor, AnchorSide::Bottom);
        assert_eq!(options.popup_offset, PopupOffset::new(0.1, -20.0));
        assert!(!options.number_pins);
        assert_eq!(options.centering.safety_margin, 20.0);
        assert_eq!(options.centering.fit_bounds_padding, 40.0);
    }

    #[test]
    fn test_from_json_partial() {
        let options = LocatorOptions::from_json(
            r#"{"popupAnchor": "left", "popupOffset": [12, 0], "numberPins": true}"#,
        )
        .unwrap();

        assert_eq!(options.popup_anchor, AnchorSide::Left);
        assert_eq!(options.popup_offset, PopupOffset::new(12.0, 0.0));
        assert_eq!(options.pin_anchor, AnchorSide::Bottom);
        assert_eq!(options.marker_label(0), Some("1".to_string()));
        assert_eq!(options.centering, CenteringConfig::default());
    }

    #[test]
    fn test_invalid_anchor_rejected_at_configuration() {
        let err = LocatorOptions::from_json(r#"{"popupAnchor": "top-left"}"#).unwrap_err();
        assert!(matches!(err, LocatorError::Serialization(_)));
        assert!(err.to_string().contains("top-left"));
    }

    #[test]
    fn test_negative_padding_rejected() {
        let err =
            LocatorOptions::from_json(r#"{"centering": {"safetyMargin": -5}}"#).unwrap_err();
        assert!(matches!(err, LocatorError::Config(_)));
    }

    #[test]
    fn test_unnumbered_pins() {
        assert_eq!(LocatorOptions::default().marker_label(3), None);
    }
}
