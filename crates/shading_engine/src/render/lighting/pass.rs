//! Lighting pass
//!
//! Lambertian shading of G-buffer samples against a shared lighting
//! environment:
//!
//! ```text
//! color = clamp(albedo * ambient + Σ albedo * light.color * scalar + emissive)
//! ```
//!
//! where `scalar` is `intensity * max(0, n·l)` for directional lights and
//! additionally multiplied by the linear falloff `max(0, 1 - d / range)` for
//! point lights. Lights whose scalar is not positive leave no trace.

use std::sync::Arc;

use crate::foundation::color::Color3;
use crate::foundation::math::{Vec3, VIEWER_FACING};
use crate::foundation::parallel::ordered_map;
use crate::render::gbuffer::{GBuffer, GBufferSample};

use super::light::{Light, LightKind, LightingEnvironment};

/// Below this distance a point light is considered coincident with the surface
const COINCIDENT_DISTANCE: f32 = 1e-5;

/// One light's effect on one surface, for diagnostics and tests
#[derive(Debug, Clone, PartialEq)]
pub struct LightingContribution {
    /// Light name
    pub light: String,
    /// Scalar intensity after falloff and the cosine term
    pub intensity: f32,
}

/// A shaded G-buffer sample
#[derive(Debug, Clone, PartialEq)]
pub struct LitSurface {
    /// Sample that was shaded
    pub sample: Arc<GBufferSample>,
    /// Shaded color, clamped to [0, 1]
    pub color: Color3,
    /// Contributing lights in registration order
    pub contributions: Vec<LightingContribution>,
}

/// Lighting output for a frame
#[derive(Debug, Clone, PartialEq)]
pub struct LightingResult {
    /// One surface per sample, in sample order
    pub surfaces: Vec<Arc<LitSurface>>,
    /// Ambient color the frame was shaded with
    pub ambient_color: Color3,
}

/// Computes lighting contributions from the deferred inputs
#[derive(Debug, Clone)]
pub struct LightingPass {
    environment: Arc<LightingEnvironment>,
}

impl LightingPass {
    /// Create the pass over a shared lighting environment
    pub const fn new(environment: Arc<LightingEnvironment>) -> Self {
        Self { environment }
    }

    /// The environment samples are shaded against
    pub const fn environment(&self) -> &Arc<LightingEnvironment> {
        &self.environment
    }

    /// Shade every sample, preserving order
    pub fn shade(&self, gbuffer: &GBuffer) -> LightingResult {
        let surfaces = ordered_map(&gbuffer.samples, |sample| {
            Arc::new(shade_sample(sample, &self.environment))
        });
        log::debug!(
            "Lighting pass shaded {} surfaces against {} lights",
            surfaces.len(),
            self.environment.lights.len()
        );
        LightingResult {
            surfaces,
            ambient_color: self.environment.ambient_color,
        }
    }
}

/// Shade a single sample
pub fn shade_sample(sample: &Arc<GBufferSample>, environment: &LightingEnvironment) -> LitSurface {
    let mut color = sample.albedo.modulate(environment.ambient_color);
    let mut contributions = Vec::new();

    for light in &environment.lights {
        let scalar = match light.kind {
            LightKind::Directional => directional_intensity(sample, light),
            LightKind::Point => point_intensity(sample, light),
            LightKind::Other(_) => continue,
        };
        let Some(intensity) = scalar.filter(|intensity| *intensity > 0.0) else {
            continue;
        };
        color += sample.albedo.modulate(light.color * intensity);
        contributions.push(LightingContribution {
            light: light.name.clone(),
            intensity,
        });
    }

    LitSurface {
        sample: Arc::clone(sample),
        color: (color + sample.emissive).clamped(),
        contributions,
    }
}

/// `intensity * max(0, n · -direction)`, or `None` without a direction
pub fn directional_intensity(sample: &GBufferSample, light: &Light) -> Option<f32> {
    let direction = light.direction?;
    let n_dot_l = sample.normal.dot(&-direction).max(0.0);
    Some(light.intensity * n_dot_l)
}

/// `intensity * attenuation * max(0, n · l)`, or `None` without position or range
pub fn point_intensity(sample: &GBufferSample, light: &Light) -> Option<f32> {
    let position = light.position?;
    let range = light.range.filter(|range| *range != 0.0)?;

    let to_light = position - sample.world_position;
    let distance = to_light.norm();
    let (direction, attenuation) = if distance <= COINCIDENT_DISTANCE {
        (Vec3::from(VIEWER_FACING), 1.0)
    } else {
        (to_light / distance, (1.0 - distance / range).max(0.0))
    };
    let n_dot_l = sample.normal.dot(&direction).max(0.0);
    Some(light.intensity * attenuation * n_dot_l)
}
