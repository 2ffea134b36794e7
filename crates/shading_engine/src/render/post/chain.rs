//! Post-processing chain
//!
//! Runs bloom then tone mapping on every lit surface independently and
//! collects the results into parallel sequences.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::foundation::color::Color3;
use crate::foundation::parallel::ordered_map;
use crate::render::lighting::LitSurface;

use super::bloom::{apply_bloom, BloomSettings};
use super::tone_mapping::{apply_tone_mapping, ToneMappingSettings};

/// Post-processing configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessingSettings {
    /// Bloom stage
    pub bloom: BloomSettings,
    /// Tone mapping stage
    pub tone_mapping: ToneMappingSettings,
}

impl PostProcessingSettings {
    /// Replace non-finite numbers with their defaults
    ///
    /// `enabled` and `operator` pass through unchanged.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let bloom_defaults = BloomSettings::default();
        let tone_defaults = ToneMappingSettings::default();
        Self {
            bloom: BloomSettings {
                enabled: self.bloom.enabled,
                threshold: finite_or("bloom.threshold", self.bloom.threshold, bloom_defaults.threshold),
                intensity: finite_or("bloom.intensity", self.bloom.intensity, bloom_defaults.intensity),
                radius: finite_or("bloom.radius", self.bloom.radius, bloom_defaults.radius),
            },
            tone_mapping: ToneMappingSettings {
                exposure: finite_or("tone_mapping.exposure", self.tone_mapping.exposure, tone_defaults.exposure),
                operator: self.tone_mapping.operator,
            },
        }
    }
}

fn finite_or(field: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        log::warn!("Post-processing {} is not finite ({}); using {}", field, value, default);
        default
    }
}

/// Final composited output produced by the post-processing chain
///
/// `surfaces`, `final_colors` and `bloom_strength` are index-aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct PostProcessResult {
    /// Lit surfaces, in frame order
    pub surfaces: Vec<Arc<LitSurface>>,
    /// Tone-mapped colors, each channel in [0, 1]
    pub final_colors: Vec<Color3>,
    /// Bloom strength per surface, in [0, 1]
    pub bloom_strength: Vec<f32>,
    /// Operator name as configured
    pub tone_mapping_operator: String,
}

/// Executes the configured post-processing pipeline
#[derive(Debug, Clone, Default)]
pub struct PostProcessingChain {
    settings: PostProcessingSettings,
}

impl PostProcessingChain {
    /// Create a chain with the given settings
    pub const fn new(settings: PostProcessingSettings) -> Self {
        Self { settings }
    }

    /// Active settings
    pub const fn settings(&self) -> &PostProcessingSettings {
        &self.settings
    }

    /// Bloom and tone map a single color
    ///
    /// Returns the final color and the surface's bloom strength.
    pub fn process_color(&self, color: Color3) -> (Color3, f32) {
        let (bloomed, strength) = apply_bloom(color, &self.settings.bloom);
        (apply_tone_mapping(bloomed, &self.settings.tone_mapping), strength)
    }

    /// Apply the chain to every surface, preserving order
    pub fn apply(&self, surfaces: &[Arc<LitSurface>]) -> PostProcessResult {
        let (final_colors, bloom_strength): (Vec<_>, Vec<_>) =
            ordered_map(surfaces, |surface| self.process_color(surface.color))
                .into_iter()
                .unzip();
        log::debug!(
            "Post-processing chain finished {} surfaces with '{}' tone mapping",
            final_colors.len(),
            self.settings.tone_mapping.operator
        );
        PostProcessResult {
            surfaces: surfaces.to_vec(),
            final_colors,
            bloom_strength,
            tone_mapping_operator: self.settings.tone_mapping.operator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::frame::{AppliedRenderInstruction, DrawInstruction, SpriteDescriptor};
    use crate::render::gbuffer::GBufferSample;
    use crate::render::material::MaterialDefinition;
    use crate::render::sprite::SpriteHandle;
    use approx::assert_relative_eq;

    fn surface(color: Color3) -> Arc<LitSurface> {
        let instruction = DrawInstruction::new("node", SpriteDescriptor::new("s", "s.png"));
        let sprite = SpriteHandle::fallback(&instruction.sprite);
        let sample = GBufferSample {
            applied: Arc::new(AppliedRenderInstruction { instruction, sprite }),
            material: Arc::new(MaterialDefinition::new("m", Color3::WHITE)),
            albedo: Color3::WHITE,
            normal: Vec3::z(),
            emissive: Color3::BLACK,
            metallic: 0.0,
            roughness: 1.0,
            depth: 0.0,
            world_position: Vec3::zeros(),
        };
        Arc::new(LitSurface { sample: Arc::new(sample), color, contributions: Vec::new() })
    }

    fn chain(operator: &str) -> PostProcessingChain {
        PostProcessingChain::new(PostProcessingSettings {
            bloom: BloomSettings { enabled: true, threshold: 0.5, intensity: 1.0, radius: 1.0 },
            tone_mapping: ToneMappingSettings { operator: operator.to_string(), exposure: 1.0 },
        })
    }

    #[test]
    fn test_bloom_runs_before_tone_mapping() {
        let (color, strength) = chain("linear").process_color(Color3::new(0.8, 0.8, 0.8));

        assert_relative_eq!(strength, 0.3, epsilon = 1e-6);
        assert_eq!(color, Color3::WHITE);

        let (color, strength) = chain("reinhard").process_color(Color3::new(0.8, 0.8, 0.8));
        assert_relative_eq!(strength, 0.3, epsilon = 1e-6);
        assert_relative_eq!(color.r, 1.1 / 2.1, epsilon = 1e-6);
    }

    #[test]
    fn test_apply_produces_aligned_sequences() {
        let surfaces = vec![
            surface(Color3::new(0.1, 0.1, 0.1)),
            surface(Color3::WHITE),
            surface(Color3::new(0.3, 0.2, 0.1)),
        ];

        let result = chain("Reinhard").apply(&surfaces);

        assert_eq!(result.surfaces.len(), 3);
        assert_eq!(result.final_colors.len(), 3);
        assert_eq!(result.bloom_strength.len(), 3);
        assert_eq!(result.tone_mapping_operator, "Reinhard");
        assert_eq!(result.bloom_strength[0], 0.0);
        assert_relative_eq!(result.bloom_strength[1], 0.5, epsilon = 1e-6);
        assert_eq!(result.bloom_strength[2], 0.0);
        for (observed, original) in result.surfaces.iter().zip(&surfaces) {
            assert!(Arc::ptr_eq(observed, original));
        }
    }

    #[test]
    fn test_default_chain_is_aces_without_bloom() {
        let result = PostProcessingChain::default().apply(&[surface(Color3::WHITE)]);

        assert_eq!(result.tone_mapping_operator, "aces");
        assert_eq!(result.bloom_strength, [0.0]);
        assert_relative_eq!(result.final_colors[0].r, 2.54 / 3.16, epsilon = 1e-5);
    }
}
