//! Frame preview application
//!
//! Shades a single frame through the deferred pipeline and logs the final
//! colors.
//!
//! ```text
//! frame_preview [pipeline.toml|pipeline.ron] [frame.ron|frame.toml]
//! ```
//!
//! Without arguments the bundled pipeline configuration and a built-in sample
//! frame are used. Set `RUST_LOG=debug` to see per-pass output.

use shading_engine::foundation::logging;
use shading_engine::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
enum PreviewError {
    #[error("Failed to load pipeline: {0}")]
    Pipeline(#[from] PipelineConfigError),

    #[error("Failed to load frame: {0}")]
    Frame(#[from] ConfigError),
}

fn sample_frame() -> RenderFrame {
    let ship = SpriteDescriptor::new("ship", "sprites/ship.png");
    let wreck_overrides: MetadataValue = [
        ("metallic", MetadataValue::from(0.8_f32)),
        ("roughness", MetadataValue::from("0.3")),
    ]
    .into_iter()
    .collect();
    let mut frame = RenderFrame::new(
        0.0,
        (640, 360),
        vec![
            DrawInstruction::new("player", ship.clone()).at(320.0, 180.0).with_z_index(1),
            DrawInstruction::new("ground", SpriteDescriptor::new("ground", "sprites/ground.png"))
                .at(320.0, 340.0),
            DrawInstruction::new("hud", SpriteDescriptor::new("hud_frame", "ui/frame.png"))
                .at(16.0, 16.0)
                .with_z_index(10)
                .with_metadata("material", "emissive_ui")
                .with_metadata("emissive", [1.0, 1.0, 1.0]),
            DrawInstruction::new("wreck", ship.with_tint([180, 90, 90]))
                .at(120.0, 200.0)
                .with_metadata("normal", [0.0, 1.0, 0.2])
                .with_metadata("material_overrides", wreck_overrides),
        ],
    );
    frame.messages.push("preview".to_string());
    frame
}

fn sprite_catalog() -> SpriteCatalog {
    SpriteCatalog::new([
        ManifestSprite::new("ship", "sprites/ship.png"),
        ManifestSprite::new("ground", "sprites/ground.png").with_lighting("terrain"),
    ])
}

fn run() -> Result<(), PreviewError> {
    let mut args = std::env::args().skip(1);

    let pipeline = match args.next() {
        Some(path) => {
            log::info!("Loading pipeline configuration from {}", path);
            RenderPipelineConfig::load(path)?
        }
        None => default_pipeline()?,
    };
    let frame = match args.next() {
        Some(path) => {
            log::info!("Loading frame from {}", path);
            RenderFrame::load_from_file(path)?
        }
        None => sample_frame(),
    };

    let graph = RenderGraph::new(&pipeline);
    let mut sprites = sprite_catalog();
    let (applied, missing) = graph.apply(frame, &mut sprites);

    log::info!(
        "Shaded {} instructions with '{}' tone mapping ({} missing sprites)",
        applied.instructions.len(),
        applied.post_process.tone_mapping_operator,
        missing
    );
    for ((surface, color), bloom) in applied
        .post_process
        .surfaces
        .iter()
        .zip(&applied.post_process.final_colors)
        .zip(&applied.post_process.bloom_strength)
    {
        let sample = &surface.sample;
        println!(
            "{:<8} material={:<12} lit=({:.3}, {:.3}, {:.3}) final=({:.3}, {:.3}, {:.3}) bloom={:.3} lights={}",
            sample.applied.instruction.node_id,
            sample.material.name,
            surface.color.r,
            surface.color.g,
            surface.color.b,
            color.r,
            color.g,
            color.b,
            bloom,
            surface.contributions.len()
        );
    }
    Ok(())
}

fn main() {
    logging::init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
