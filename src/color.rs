use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Saturation / lightness presets for the bar charts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tone {
    /// Light, washed-out colours (season chart).
    Pastel,
    /// Darker, low-saturation colours (weather chart).
    Muted,
}

impl Tone {
    fn saturation_lightness(self) -> (f32, f32) {
        match self {
            Tone::Pastel => (0.70, 0.78),
            Tone::Muted => (0.45, 0.50),
        }
    }
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize, tone: Tone) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let (saturation, lightness) = tone.saturation_lightness();
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, saturation, lightness);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Assigns each label of a fixed label set its own colour, so a category keeps
/// its colour regardless of which other categories are filtered out.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<&'static str, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(labels: impl IntoIterator<Item = &'static str>, tone: Tone) -> Self {
        let labels: Vec<&'static str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len(), tone);
        ColorMap {
            mapping: labels.into_iter().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}
