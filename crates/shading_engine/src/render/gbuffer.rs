//! G-buffer pass
//!
//! Turns resolved draw instructions into deferred shading inputs. Each sample
//! depends only on its own instruction plus the shared, read-only material
//! registry, so samples are built with an ordered parallel map.
//!
//! Sprites are flat quads: a sample's world position is the sprite's screen
//! position extended with its depth, and its normal faces the viewer unless
//! metadata supplies one. The instruction's rotation does not tilt the
//! default normal.

use std::sync::Arc;

use crate::foundation::color::Color3;
use crate::foundation::math::{Vec3, VIEWER_FACING};
use crate::foundation::parallel::ordered_map;

use super::frame::AppliedRenderInstruction;
use super::material::{InstructionOverrides, MaterialDefinition, MaterialRegistry};

/// Deferred shading inputs for a single instruction
#[derive(Debug, Clone, PartialEq)]
pub struct GBufferSample {
    /// Instruction and sprite this sample was built from
    pub applied: Arc<AppliedRenderInstruction>,
    /// Resolved material (overrides applied)
    pub material: Arc<MaterialDefinition>,
    /// Surface color
    pub albedo: Color3,
    /// Unit surface normal
    pub normal: Vec3,
    /// Self-illumination
    pub emissive: Color3,
    /// Metallic factor
    pub metallic: f32,
    /// Roughness factor
    pub roughness: f32,
    /// Depth (explicit metadata depth or z-index)
    pub depth: f32,
    /// (screen x, screen y, depth)
    pub world_position: Vec3,
}

/// All samples of a frame, in instruction order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GBuffer {
    /// One sample per instruction
    pub samples: Vec<Arc<GBufferSample>>,
}

impl GBuffer {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Iterate samples in instruction order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<GBufferSample>> {
        self.samples.iter()
    }
}

/// Produces deferred shading inputs from resolved instructions
#[derive(Debug, Clone)]
pub struct GBufferPass {
    materials: Arc<MaterialRegistry>,
}

impl GBufferPass {
    /// Create the pass over a shared material registry
    pub const fn new(materials: Arc<MaterialRegistry>) -> Self {
        Self { materials }
    }

    /// The registry materials are resolved against
    pub const fn materials(&self) -> &Arc<MaterialRegistry> {
        &self.materials
    }

    /// Build one sample per instruction, preserving order
    pub fn build(&self, instructions: &[Arc<AppliedRenderInstruction>]) -> GBuffer {
        let samples = ordered_map(instructions, |applied| Arc::new(self.build_sample(applied)));
        log::debug!("G-buffer pass produced {} samples", samples.len());
        GBuffer { samples }
    }

    /// Build the sample for a single instruction
    pub fn build_sample(&self, applied: &Arc<AppliedRenderInstruction>) -> GBufferSample {
        let overrides = InstructionOverrides::decode(&applied.instruction.metadata);
        let material = self
            .materials
            .resolve_with_overrides(&overrides, applied.sprite.manifest.as_ref());

        let albedo = resolve_albedo(&material, applied, &overrides);
        let emissive = overrides.emissive.unwrap_or(material.emissive);
        let normal = overrides.normal.unwrap_or_else(|| Vec3::from(VIEWER_FACING));
        let depth = overrides
            .depth
            .unwrap_or(applied.instruction.z_index as f32);
        let (x, y) = applied.instruction.position;

        GBufferSample {
            applied: Arc::clone(applied),
            metallic: material.metallic,
            roughness: material.roughness,
            material,
            albedo,
            normal,
            emissive,
            depth,
            world_position: Vec3::new(x, y, depth),
        }
    }
}

/// Material albedo tinted by the sprite, unless metadata replaces it outright
fn resolve_albedo(
    material: &MaterialDefinition,
    applied: &AppliedRenderInstruction,
    overrides: &InstructionOverrides,
) -> Color3 {
    if let Some(albedo) = overrides.albedo {
        return albedo.clamped();
    }
    let tint = applied.sprite.tint.map_or(Color3::WHITE, Color3::from_rgb8);
    material.albedo.modulate(tint).clamped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::frame::{DrawInstruction, SpriteDescriptor};
    use crate::render::sprite::SpriteHandle;
    use approx::assert_relative_eq;

    fn pass() -> GBufferPass {
        let registry = MaterialRegistry::new(
            [
                MaterialDefinition::new("default_lit", Color3::new(0.8, 0.6, 0.4))
                    .with_metallic(0.1)
                    .with_roughness(0.7),
                MaterialDefinition::new("glow", Color3::WHITE).with_emissive(Color3::new(0.2, 0.4, 0.6)),
            ],
            None,
        )
        .unwrap();
        GBufferPass::new(Arc::new(registry))
    }

    fn applied(instruction: DrawInstruction) -> Arc<AppliedRenderInstruction> {
        let sprite = SpriteHandle::fallback(&instruction.sprite);
        Arc::new(AppliedRenderInstruction { instruction, sprite })
    }

    fn sprite() -> SpriteDescriptor {
        SpriteDescriptor::new("hero", "hero.png")
    }

    #[test]
    fn test_defaults_face_viewer_at_z_index_depth() {
        let sample = pass().build_sample(&applied(
            DrawInstruction::new("a", sprite()).at(12.0, -3.0).with_z_index(4),
        ));

        assert_eq!(sample.normal, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(sample.depth, 4.0);
        assert_eq!(sample.world_position, Vec3::new(12.0, -3.0, 4.0));
        assert_eq!(sample.albedo, Color3::new(0.8, 0.6, 0.4));
        assert_eq!(sample.emissive, Color3::BLACK);
        assert_eq!(sample.metallic, 0.1);
        assert_eq!(sample.roughness, 0.7);
    }

    #[test]
    fn test_rotation_does_not_tilt_default_normal() {
        let mut instruction = DrawInstruction::new("a", sprite());
        instruction.rotation = std::f32::consts::FRAC_PI_2;

        assert_eq!(pass().build_sample(&applied(instruction)).normal, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_tint_multiplies_material_albedo() {
        let sample = pass().build_sample(&applied(DrawInstruction::new(
            "a",
            sprite().with_tint([255, 0, 51]),
        )));

        assert_relative_eq!(sample.albedo.r, 0.8, epsilon = 1e-6);
        assert_relative_eq!(sample.albedo.g, 0.0, epsilon = 1e-6);
        assert_relative_eq!(sample.albedo.b, 0.08, epsilon = 1e-6);
    }

    #[test]
    fn test_albedo_override_replaces_tinted_product() {
        let sample = pass().build_sample(&applied(
            DrawInstruction::new("a", sprite().with_tint([0, 0, 0]))
                .with_metadata("albedo", [0.3, 0.2, 0.1]),
        ));

        assert_eq!(sample.albedo, Color3::new(0.3, 0.2, 0.1));
    }

    #[test]
    fn test_emissive_override_replaces_material_emissive() {
        let plain = pass().build_sample(&applied(
            DrawInstruction::new("a", sprite()).with_metadata("material", "glow"),
        ));
        let overridden = pass().build_sample(&applied(
            DrawInstruction::new("a", sprite())
                .with_metadata("material", "glow")
                .with_metadata("emissive", [1.0, 1.0, 1.0]),
        ));

        assert_eq!(plain.emissive, Color3::new(0.2, 0.4, 0.6));
        assert_eq!(overridden.emissive, Color3::WHITE);
    }

    #[test]
    fn test_metadata_normal_and_depth() {
        let sample = pass().build_sample(&applied(
            DrawInstruction::new("a", sprite())
                .at(1.0, 2.0)
                .with_z_index(9)
                .with_metadata("normal", [0.0, 3.0, 4.0])
                .with_metadata("depth", -2.5_f32),
        ));

        assert_relative_eq!(sample.normal.y, 0.6, epsilon = 1e-6);
        assert_relative_eq!(sample.normal.z, 0.8, epsilon = 1e-6);
        assert_eq!(sample.depth, -2.5);
        assert_eq!(sample.world_position, Vec3::new(1.0, 2.0, -2.5));
    }

    #[test]
    fn test_malformed_normal_falls_back() {
        let sample = pass().build_sample(&applied(
            DrawInstruction::new("a", sprite()).with_metadata("normal", "up"),
        ));

        assert_eq!(sample.normal, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_build_preserves_order() {
        let instructions: Vec<_> = (0..64)
            .map(|i| applied(DrawInstruction::new(format!("node_{i}"), sprite()).with_z_index(i)))
            .collect();

        let gbuffer = pass().build(&instructions);

        assert_eq!(gbuffer.len(), 64);
        for (index, sample) in gbuffer.iter().enumerate() {
            assert_eq!(sample.applied.instruction.node_id, format!("node_{index}"));
            assert_eq!(sample.depth, index as f32);
        }
    }
}
