//! Linear RGB color type used throughout the shading pipeline
//!
//! Colors entering the pipeline from configuration or per-instruction
//! metadata are clamped to [0, 1] on construction via [`Color3::new`].
//! Intermediate values produced while shading (ambient + light sums, bloom,
//! exposure) may leave that range and are built with [`Color3::hdr`]; every
//! stage clamps again before handing colors to its consumer.

use std::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

use super::math::utils::saturate;

/// Rec. 709 luma weights
const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Three-channel linear color
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color3 {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl Color3 {
    /// Black, also the "no emission" color
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0 };

    /// White, also the identity tint
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0 };

    /// Create a color from external input, clamping each channel to [0, 1]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r: saturate(r), g: saturate(g), b: saturate(b) }
    }

    /// Create a color without clamping
    ///
    /// Only for intermediate high-range values inside the pipeline.
    pub const fn hdr(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a clamped color from a channel array
    pub fn from_array(channels: [f32; 3]) -> Self {
        Self::new(channels[0], channels[1], channels[2])
    }

    /// Convert an 8-bit tint into a unit-range color
    pub fn from_rgb8(tint: [u8; 3]) -> Self {
        Self::new(
            f32::from(tint[0]) / 255.0,
            f32::from(tint[1]) / 255.0,
            f32::from(tint[2]) / 255.0,
        )
    }

    /// Channels as an array
    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Channel-wise product
    pub fn modulate(self, other: Self) -> Self {
        Self::hdr(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    /// Apply `f` to every channel
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::hdr(f(self.r), f(self.g), f(self.b))
    }

    /// Clamp every channel to [0, 1]
    pub fn clamped(self) -> Self {
        Self::new(self.r, self.g, self.b)
    }

    /// Perceptual brightness (Rec. 709 weights)
    pub fn luminance(self) -> f32 {
        LUMA_WEIGHTS[0] * self.r + LUMA_WEIGHTS[1] * self.g + LUMA_WEIGHTS[2] * self.b
    }
}

impl Add for Color3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::hdr(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Mul<f32> for Color3 {
    type Output = Self;

    fn mul(self, scale: f32) -> Self {
        Self::hdr(self.r * scale, self.g * scale, self.b * scale)
    }
}

impl From<[f32; 3]> for Color3 {
    fn from(channels: [f32; 3]) -> Self {
        Self::from_array(channels)
    }
}

/// Perceptual brightness of a color
pub fn luminance(color: Color3) -> f32 {
    color.luminance()
}
