//! Render graph orchestration
//!
//! Drives one frame through the deferred pipeline:
//!
//! ```text
//! RenderFrame ─► sprite resolution ─► G-buffer ─► lighting ─► post ─► AppliedRenderFrame
//! ```
//!
//! The graph owns no per-frame state; each `apply` builds fresh outputs and
//! reads the shared configuration only.

use std::sync::Arc;

use super::frame::{AppliedRenderInstruction, RenderFrame};
use super::gbuffer::{GBuffer, GBufferPass};
use super::lighting::{LightingEnvironment, LightingPass, LightingResult};
use super::material::MaterialRegistry;
use super::pipeline_config::RenderPipelineConfig;
use super::post::{PostProcessResult, PostProcessingChain, PostProcessingSettings};
use super::sprite::SpriteResolver;

/// Combined result from all render graph passes
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRenderFrame {
    /// Frame as submitted
    pub frame: RenderFrame,
    /// Instructions paired with their resolved sprites
    pub instructions: Vec<Arc<AppliedRenderInstruction>>,
    /// G-buffer pass output
    pub gbuffer: GBuffer,
    /// Lighting pass output
    pub lighting: LightingResult,
    /// Post-processing output
    pub post_process: PostProcessResult,
}

/// Applies render frames using the deferred shading pipeline
#[derive(Debug, Clone)]
pub struct RenderGraph {
    gbuffer: GBufferPass,
    lighting: LightingPass,
    post: PostProcessingChain,
}

impl RenderGraph {
    /// Build the graph from a decoded pipeline configuration
    pub fn new(pipeline: &RenderPipelineConfig) -> Self {
        Self::from_parts(
            Arc::clone(&pipeline.material_registry),
            Arc::clone(&pipeline.lighting),
            pipeline.post_processing.clone(),
        )
    }

    /// Build the graph from individual configuration records
    pub fn from_parts(
        materials: Arc<MaterialRegistry>,
        lighting: Arc<LightingEnvironment>,
        post_processing: PostProcessingSettings,
    ) -> Self {
        Self {
            gbuffer: GBufferPass::new(materials),
            lighting: LightingPass::new(lighting),
            post: PostProcessingChain::new(post_processing),
        }
    }

    /// Material registry used by the G-buffer pass
    pub const fn materials(&self) -> &Arc<MaterialRegistry> {
        self.gbuffer.materials()
    }

    /// Lighting environment used by the lighting pass
    pub const fn lighting_environment(&self) -> &Arc<LightingEnvironment> {
        self.lighting.environment()
    }

    /// Post-processing settings
    pub const fn post_processing(&self) -> &PostProcessingSettings {
        self.post.settings()
    }

    /// Shade a frame
    ///
    /// Every instruction's sprite goes through `resolver`; handles without a
    /// manifest entry are counted and used as-is. Returns the complete frame
    /// output and the number of instructions whose sprite was not found.
    pub fn apply<R>(&self, frame: RenderFrame, resolver: &mut R) -> (AppliedRenderFrame, usize)
    where
        R: SpriteResolver + ?Sized,
    {
        let mut missing = 0;
        let instructions: Vec<_> = frame
            .instructions
            .iter()
            .map(|instruction| {
                let sprite = resolver.resolve(&instruction.sprite);
                if !sprite.is_known() {
                    missing += 1;
                    log::debug!(
                        "Sprite {} missing from manifest (texture={})",
                        instruction.sprite.id,
                        instruction.sprite.texture
                    );
                }
                Arc::new(AppliedRenderInstruction {
                    instruction: instruction.clone(),
                    sprite,
                })
            })
            .collect();

        let gbuffer = self.gbuffer.build(&instructions);
        let lighting = self.lighting.shade(&gbuffer);
        let post_process = self.post.apply(&lighting.surfaces);

        log::debug!(
            "Applied frame at t={:.3}: {} instructions, {} missing sprites",
            frame.time,
            instructions.len(),
            missing
        );
        let applied = AppliedRenderFrame {
            frame,
            instructions,
            gbuffer,
            lighting,
            post_process,
        };
        (applied, missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::color::Color3;
    use crate::render::frame::{DrawInstruction, SpriteDescriptor};
    use crate::render::lighting::Light;
    use crate::render::material::MaterialDefinition;
    use crate::render::sprite::{ManifestSprite, SpriteCatalog, SpriteHandle};

    fn graph() -> RenderGraph {
        let materials = MaterialRegistry::new(
            [MaterialDefinition::new("default_lit", Color3::new(0.8, 0.8, 0.8))],
            None,
        )
        .unwrap();
        let lighting = LightingEnvironment::new(Color3::new(0.1, 0.1, 0.1))
            .add_light(Light::directional("sun", [0.0, 0.0, -1.0], Color3::WHITE, 1.0));
        RenderGraph::from_parts(Arc::new(materials), Arc::new(lighting), PostProcessingSettings::default())
    }

    #[test]
    fn test_empty_frame() {
        let mut resolver = |descriptor: &SpriteDescriptor| SpriteHandle::fallback(descriptor);
        let (applied, missing) = graph().apply(RenderFrame::default(), &mut resolver);

        assert_eq!(missing, 0);
        assert!(applied.instructions.is_empty());
        assert!(applied.gbuffer.is_empty());
        assert!(applied.lighting.surfaces.is_empty());
        assert!(applied.post_process.final_colors.is_empty());
    }

    #[test]
    fn test_stages_are_linked() {
        let mut catalog = SpriteCatalog::new([ManifestSprite::new("hero", "hero.png")]);
        let frame = RenderFrame::new(
            0.5,
            (320, 240),
            vec![
                DrawInstruction::new("a", SpriteDescriptor::new("hero", "hero.png")),
                DrawInstruction::new("b", SpriteDescriptor::new("hero", "hero.png")).at(10.0, 10.0),
            ],
        );

        let (applied, missing) = graph().apply(frame.clone(), &mut catalog);

        assert_eq!(missing, 0);
        assert_eq!(applied.frame, frame);
        assert_eq!(applied.instructions.len(), 2);
        for (index, instruction) in applied.instructions.iter().enumerate() {
            assert!(Arc::ptr_eq(&applied.gbuffer.samples[index].applied, instruction));
            assert!(Arc::ptr_eq(&applied.lighting.surfaces[index].sample, &applied.gbuffer.samples[index]));
            assert!(Arc::ptr_eq(&applied.post_process.surfaces[index], &applied.lighting.surfaces[index]));
        }
    }

    #[test]
    fn test_dyn_resolver() {
        let mut catalog = SpriteCatalog::default();
        let resolver: &mut dyn SpriteResolver = &mut catalog;
        let frame = RenderFrame::new(
            0.0,
            (1, 1),
            vec![DrawInstruction::new("a", SpriteDescriptor::new("ghost", "ghost.png"))],
        );

        let (applied, missing) = graph().apply(frame, resolver);

        assert_eq!(missing, 1);
        assert_eq!(applied.post_process.final_colors.len(), 1);
    }
}
