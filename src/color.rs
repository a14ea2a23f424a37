use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous scales for heatmaps, bars and the correlation matrix
// ---------------------------------------------------------------------------

/// Which end-to-end hue sweep a continuous scale follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Dark purple → yellow (risk factor bars).
    Viridis,
    /// Pale → deep red (cause bars).
    Reds,
    /// Blue → yellow → red (heatmaps, treemap).
    Heat,
}

/// Colour for `t` in `[0, 1]` along `scale`. Out-of-range values are clamped.
pub fn sequential(scale: Scale, t: f64) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) as f32 } else { 0.0 };
    match scale {
        Scale::Viridis => hsl_to_color32(270.0 - 210.0 * t, 0.7, 0.3 + 0.35 * t),
        Scale::Reds => hsl_to_color32(0.0, 0.75, 0.85 - 0.5 * t),
        Scale::Heat => hsl_to_color32(240.0 * (1.0 - t), 0.8, 0.5),
    }
}

/// Blue (-1) → near white (0) → red (+1). NaN maps to grey.
pub fn diverging(r: f64) -> Color32 {
    if r.is_nan() {
        return Color32::GRAY;
    }
    let r = r.clamp(-1.0, 1.0) as f32;
    let hue = if r < 0.0 { 220.0 } else { 0.0 };
    hsl_to_color32(hue, 0.7, 0.95 - 0.5 * r.abs())
}

/// Position of `value` in `[min, max]`, 0.5 when the range is degenerate.
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range.abs() < f64::EPSILON {
        0.5
    } else {
        (value - min) / range
    }
}

// ---------------------------------------------------------------------------
// Color mapping: series label → Color32
// ---------------------------------------------------------------------------

/// Maps series labels (countries, categories) to distinct colours so a
/// country keeps its colour across every chart.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let palette = generate_palette(labels.len());
        let mapping = labels
            .iter()
            .zip(palette)
            .map(|(label, c)| (label.as_ref().to_string(), c))
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a label; unknown labels are grey.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn color_map_is_stable_and_defaults_to_grey() {
        let cm = ColorMap::new(&["France", "Japan"]);
        assert_eq!(cm.color_for("France"), cm.color_for("France"));
        assert_ne!(cm.color_for("France"), cm.color_for("Japan"));
        assert_eq!(cm.color_for("Chad"), Color32::GRAY);
    }

    #[test]
    fn diverging_handles_nan_and_extremes() {
        assert_eq!(diverging(f64::NAN), Color32::GRAY);
        assert_ne!(diverging(-1.0), diverging(1.0));
    }

    #[test]
    fn normalize_degenerate_range() {
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(10.0, 0.0, 10.0), 1.0);
    }
}
