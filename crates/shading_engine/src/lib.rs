//! # Shading Engine
//!
//! Deferred shading for 2D sprite frames.
//!
//! ## Features
//!
//! - **Material Registry**: Named flat materials with per-instruction overrides
//! - **G-Buffer Pass**: Albedo, normal, emissive and depth per draw instruction
//! - **Lighting Pass**: Ambient, directional and point lights with per-light diagnostics
//! - **Post-Processing**: Threshold bloom and ACES / Reinhard / linear tone mapping
//! - **Render Graph**: One call shades a whole frame, in instruction order
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shading_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = RenderPipelineConfig::load("rendering.toml")?;
//!     let graph = RenderGraph::new(&pipeline);
//!
//!     let frame = RenderFrame::new(
//!         0.0,
//!         (640, 360),
//!         vec![DrawInstruction::new("player", SpriteDescriptor::new("ship", "ship.png"))],
//!     );
//!     let mut sprites = SpriteCatalog::new([ManifestSprite::new("ship", "ship.png")]);
//!
//!     let (applied, missing) = graph.apply(frame, &mut sprites);
//!     println!("{:?} ({} missing sprites)", applied.post_process.final_colors, missing);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat},
        foundation::{color::Color3, math::Vec3},
        render::{
            frame::{DrawInstruction, Metadata, MetadataValue, RenderFrame, SpriteDescriptor},
            graph::{AppliedRenderFrame, RenderGraph},
            lighting::{Light, LightKind, LightingEnvironment},
            material::{MaterialDefinition, MaterialError, MaterialRegistry},
            pipeline_config::{default_pipeline, PipelineConfigError, RenderPipelineConfig},
            post::{BloomSettings, PostProcessingSettings, ToneMappingSettings},
            sprite::{ManifestSprite, SpriteCatalog, SpriteHandle, SpriteResolver},
        },
    };
}
