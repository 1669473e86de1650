//! Layout backends for the off-screen probe

use crate::{
    traits::LayoutBackend,
    ui::popup::{MeasuredSize, PopupContent},
};

/// Estimates popup size from character counts, for headless hosts without a font engine.
///
/// Assumes a fixed average glyph width and line height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicLayout {
    pub char_width: f64,
    pub line_height: f64,
    pub padding: f64,
    /// Lines longer than this wrap
    pub max_width: Option<f64>,
}

impl Default for HeuristicLayout {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 18.0,
            padding: 10.0,
            max_width: Some(280.0),
        }
    }
}

impl LayoutBackend for HeuristicLayout {
    fn layout_offscreen(&mut self, content: &PopupContent) -> Option<MeasuredSize> {
        if content.is_empty() {
            return Some(MeasuredSize::zero());
        }

        let mut width: f64 = 0.0;
        let mut rows = 0usize;
        for line in content.to_text().lines() {
            let natural = line.chars().count() as f64 * self.char_width;
            match self.max_width {
                Some(max) if natural > max && max > 0.0 => {
                    width = width.max(max);
                    rows += (natural / max).ceil() as usize;
                }
                _ => {
                    width = width.max(natural);
                    rows += 1;
                }
            }
        }

        Some(MeasuredSize::new(
            width + 2.0 * self.padding,
            rows as f64 * self.line_height + 2.0 * self.padding,
        ))
    }
}

#[cfg(feature = "egui")]
pub use self::egui_layout::EguiLayout;

#[cfg(feature = "egui")]
mod egui_layout {
    use super::*;
    use egui::{Color32, Context, FontId};

    /// Measures popup text with egui's font layout.
    ///
    /// Fonts only exist after the context has run its first frame, so the
    /// probe must not complete a layout pass before that.
    pub struct EguiLayout {
        ctx: Context,
        pub font_id: FontId,
        pub wrap_width: f32,
        pub padding: f32,
    }

    impl EguiLayout {
        pub fn new(ctx: Context) -> Self {
            Self {
                ctx,
                font_id: FontId::proportional(12.0),
                wrap_width: 300.0,
                padding: 8.0,
            }
        }

        pub fn with_font(mut self, font_id: FontId) -> Self {
            self.font_id = font_id;
            self
        }

        pub fn with_wrap_width(mut self, wrap_width: f32) -> Self {
            self.wrap_width = wrap_width;
            self
        }
    }

    impl LayoutBackend for EguiLayout {
        fn layout_offscreen(&mut self, content: &PopupContent) -> Option<MeasuredSize> {
            let text = content.to_text();
            let size = self
                .ctx
                .fonts(|f| f.layout(text, self.font_id.clone(), Color32::BLACK, self.wrap_width))
                .size();

            Some(MeasuredSize::new(
                (size.x + self.padding * 2.0) as f64,
                (size.y + self.padding * 2.0) as f64,
            ))
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heuristic_single_line() {
        let mut layout = HeuristicLayout::default();
        let size = layout
            .layout_offscreen(&PopupContent::new("Downtown"))
            .unwrap();

        assert_eq!(size, MeasuredSize::new(8.0 * 7.0 + 20.0, 18.0 + 20.0));
    }

    #[test]
    fn test_heuristic_wraps_long_lines() {
        let mut layout = HeuristicLayout {
            max_width: Some(70.0),
            ..HeuristicLayout::default()
        };
        // 25 chars * 7px = 175px → 3 rows of at most 70px
        let content = PopupContent::new("Store").with_line("1234 Some Long Street Ave");
        let size = layout.layout_offscreen(&content).unwrap();

        assert_eq!(size.width, 70.0 + 20.0);
        assert_eq!(size.height, 4.0 * 18.0 + 20.0);
    }

    #[test]
    fn test_heuristic_empty_content() {
        let mut layout = HeuristicLayout::default();
        assert_eq!(
            layout.layout_offscreen(&PopupContent::default()),
            Some(MeasuredSize::zero())
        );
    }
}
