//! Bloom
//!
//! A flat, white bloom term: surfaces brighter than the threshold get the
//! excess luminance (scaled by intensity) added to every channel. There is no
//! spatial blur; `radius` is carried for configuration compatibility only.

use serde::{Deserialize, Serialize};

use crate::foundation::color::{luminance, Color3};

/// Bloom configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomSettings {
    /// Whether bloom runs at all
    pub enabled: bool,
    /// Luminance a surface must exceed to bloom
    pub threshold: f32,
    /// Multiplier on the excess luminance (negative values act as 0)
    pub intensity: f32,
    /// Blur radius (unused by the flat bloom term)
    pub radius: f32,
}

impl Default for BloomSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 1.0,
            intensity: 0.0,
            radius: 1.0,
        }
    }
}

/// Apply bloom to a color
///
/// Returns the bloomed color and the bloom strength reported for the surface,
/// `min(1, bloom_factor)`, or 0 when the surface does not bloom.
pub fn apply_bloom(color: Color3, settings: &BloomSettings) -> (Color3, f32) {
    if !settings.enabled {
        return (color, 0.0);
    }
    let brightness = luminance(color);
    if brightness <= settings.threshold {
        return (color, 0.0);
    }
    let bloom_factor = (brightness - settings.threshold) * settings.intensity.max(0.0);
    let bloomed = color.map(|channel| channel + bloom_factor);
    (bloomed, bloom_factor.min(1.0))
}
