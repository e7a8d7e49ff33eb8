//! Per-pixel light accumulation and 8-bit conversion.

use glint_core::{Color, Light};
use glint_math::Interval;

use crate::shading::LightContribution;

/// Sums light contributions for one pixel.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compositor {
    sum: Color,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one light's diffuse and specular terms, scaled by its color.
    pub fn add_light(&mut self, light: &Light, contribution: &LightContribution) {
        self.sum += light.color * contribution.total();
    }

    /// Add the ambient term once and clamp each channel to [0, 1].
    pub fn finish(self, ambient: Color) -> Color {
        let c = self.sum + ambient;
        Color::new(
            Interval::UNIT.clamp(c.x),
            Interval::UNIT.clamp(c.y),
            Interval::UNIT.clamp(c.z),
        )
    }
}

/// Convert a color to 8-bit RGB by scaling by 255 and truncating.
///
/// Out-of-range values saturate and NaN becomes 0.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let channel = |v: f64| (v * 255.0) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}
