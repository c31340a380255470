// Copyright 2025 the Glyphtrace Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::f64::consts::PI;

/// Offset of the first hue.
const HUE_START: f64 = 0.23;
/// The golden section, so consecutive hues are spread around the wheel.
const HUE_STEP: f64 = 0.381_966_011_25;

/// Distinct colors for telling pooled glyphs apart when inspecting output.
///
/// Color `i` is the same in every palette, but each palette computes it at
/// most once. Create one palette per rendering session.
///
/// ```
/// use glyphtrace::DebugPalette;
///
/// let mut palette = DebugPalette::new();
/// let first = palette.color(0).to_owned();
/// assert_eq!(first.len(), 7);
/// assert_ne!(palette.color(1), first);
/// ```
#[derive(Clone, Debug, Default)]
pub struct DebugPalette {
    colors: Vec<Option<String>>,
}

impl DebugPalette {
    /// Create an empty palette.
    pub fn new() -> Self {
        DebugPalette { colors: Vec::new() }
    }

    /// The color for `index`, as `#RRGGBB`.
    pub fn color(&mut self, index: usize) -> &str {
        if index >= self.colors.len() {
            self.colors.resize(index + 1, None);
        }
        self.colors[index].get_or_insert_with(|| debug_color(index))
    }
}

/// Walk the hue by the golden section and darken bright hues, so that
/// yellows and blues read about equally strong. Later indices drift toward a
/// common light tone.
fn debug_color(index: usize) -> String {
    let hue = (HUE_START + HUE_STEP * index as f64).fract();
    let [r, g, b] = hsl_to_rgb(hue, 1.0, 0.5);
    let luma = 0.299 * r + 0.587 * g + 0.114 * b;
    let lightness = 0.5 + (2.0 * (0.333 - luma)).atan() / PI;
    let fade = 1.0 + (index as f64 - 1.0) / 18.0;
    let [r, g, b] = hsl_to_rgb(hue, 1.0, 0.9 - (0.9 - lightness / 1.5) / fade);
    format!("#{:02X}{:02X}{:02X}", channel(r), channel(g), channel(b))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is clamped to the range of u8 first"
)]
fn channel(value: f64) -> u8 {
    (255.0 * value).round().clamp(0.0, 255.0) as u8
}

/// HSL to RGB with a square-root response on each channel.
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> [f64; 3] {
    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;
    [hue + 1.0 / 3.0, hue, hue - 1.0 / 3.0].map(|t| hue_to_channel(p, q, t).sqrt())
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
