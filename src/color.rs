use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::Sex;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` distinct colours with hues spread evenly over
/// `[hue_start, hue_start + hue_span)` degrees.
pub fn generate_palette(n: usize, hue_start: f32, hue_span: f32) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (hue_start + (i as f32 / n as f32) * hue_span).rem_euclid(360.0);
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Accent colour for headings and aggregated lines: orange for females,
/// violet for males.
pub fn sex_color(sex: Sex) -> Color32 {
    match sex {
        Sex::Female => Color32::from_rgb(255, 140, 0),
        Sex::Male => Color32::from_rgb(148, 103, 189),
    }
}

/// Warm hues for female charts, cool hues for male charts.
fn hue_range(sex: Sex) -> (f32, f32) {
    match sex {
        Sex::Female => (330.0, 120.0),
        Sex::Male => (150.0, 150.0),
    }
}

// ---------------------------------------------------------------------------
// Color mapping: series label → Color32
// ---------------------------------------------------------------------------

/// Maps the names drawn in one chart to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given series labels of one sex.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>, sex: Sex) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let (start, span) = hue_range(sex);
        let palette = generate_palette(labels.len(), start, span);
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(label, c)| (label.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: sex_color(sex),
        }
    }

    /// Look up the colour for a series label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size_and_distinct() {
        assert!(generate_palette(0, 0.0, 360.0).is_empty());
        let colors = generate_palette(4, 0.0, 360.0);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_color_map_lookup_and_fallback() {
        let map = ColorMap::new(["Alison", "Allison"], Sex::Female);
        assert_ne!(map.color_for("Alison"), map.color_for("Allison"));
        assert_eq!(map.color_for("Nobody"), sex_color(Sex::Female));
    }
}
