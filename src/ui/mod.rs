pub mod layout;
pub mod popup;
pub mod probe;

pub use popup::{
    AnchorSide, MeasuredSize, PopupContent, PopupOffset, PopupPlacement, ViewportSize,
};

pub use probe::{DimensionsReady, OffscreenProbe, ProbeState};

pub use layout::HeuristicLayout;

#[cfg(feature = "egui")]
pub use layout::EguiLayout;
