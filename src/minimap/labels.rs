//! Verse number labels
//!
//! A label sits left of the last word of its verse. Its font shrinks until
//! the number fits the scaled row height and the room left of the word.

use crate::models::MinimapConfig;

/// Measures rendered text width (canvas `measureText` on the JS side)
pub trait TextMeasurer {
    fn width(&self, text: &str, font_px: f32) -> f32;
}

/// Fixed-advance approximation for bold digits
#[derive(Debug, Clone, Copy)]
pub struct DigitWidthMeasurer {
    pub em_ratio: f32,
}

impl Default for DigitWidthMeasurer {
    fn default() -> Self {
        Self { em_ratio: 0.556 }
    }
}

impl TextMeasurer for DigitWidthMeasurer {
    fn width(&self, text: &str, font_px: f32) -> f32 {
        text.chars().count() as f32 * font_px * self.em_ratio
    }
}

const FIT_STEPS: usize = 12;

/// Largest font size in `[labelMinFontPx, labelMaxFontPx]` that fits
///
/// A size fits when it is no taller than `row_height` and the padded text is
/// no wider than `max_width`. When even the minimum does not fit, the
/// minimum is used.
pub fn fit_font_size(
    text: &str,
    row_height: f32,
    max_width: f32,
    config: &MinimapConfig,
    measurer: &dyn TextMeasurer,
) -> f32 {
    let fits = |font: f32| {
        font <= row_height && measurer.width(text, font) + config.label_padding_px <= max_width
    };

    let (mut lo, mut hi) = (config.label_min_font_px, config.label_max_font_px);
    if fits(hi) {
        return hi;
    }
    if !fits(lo) {
        return lo;
    }
    for _ in 0..FIT_STEPS {
        let mid = (lo + hi) / 2.0;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Label box width for the chosen font
pub fn label_width(text: &str, font_px: f32, config: &MinimapConfig, measurer: &dyn TextMeasurer) -> f32 {
    (measurer.width(text, font_px) + config.label_padding_px).max(config.label_min_width_px)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roomy_row_keeps_max_font() {
        let config = MinimapConfig::default();
        let font = fit_font_size("12", 20.0, 100.0, &config, &DigitWidthMeasurer::default());
        assert_eq!(font, 8.0);
    }

    #[test]
    fn test_short_row_shrinks_font() {
        let config = MinimapConfig::default();
        let font = fit_font_size("12", 5.0, 100.0, &config, &DigitWidthMeasurer::default());
        assert!(font <= 5.0 && font > 4.9, "font {}", font);
    }

    #[test]
    fn test_tiny_row_uses_minimum() {
        let config = MinimapConfig::default();
        let font = fit_font_size("286", 1.0, 100.0, &config, &DigitWidthMeasurer::default());
        assert_eq!(font, 3.0);
    }

    #[test]
    fn test_label_width_has_minimum() {
        let config = MinimapConfig::default();
        let m = DigitWidthMeasurer::default();
        assert_eq!(label_width("1", 8.0, &config, &m), 12.0);
        assert!(label_width("286", 8.0, &config, &m) > 12.0);
    }
}
