use crate::core::rasterizer::RasterStats;
use crate::error::Error;
use crate::io::config::Config;
use crate::io::image::{save_depth_image, save_framebuffer};
use crate::io::obj_loader::load_obj;
use crate::pipeline::renderer::Renderer;
use crate::scene::context::RenderContext;
use crate::scene::mesh::MeshProvider;
use crate::scene::texture::{Texture, TextureProvider};
use crate::scene::utils::normalize_and_center_model;
use log::{debug, info};
use std::path::Path;
use std::time::Instant;

/// Renders one frame and writes it out.
///
/// Nothing is written if the render itself fails, so an invalid mesh never
/// leaves a blank image behind.
pub fn render_mesh_to_file<M: MeshProvider + ?Sized>(
    mesh: &M,
    texture: Option<&dyn TextureProvider>,
    context: &RenderContext,
    (width, height): (usize, usize),
    output: &Path,
    depth_output: Option<&Path>,
) -> Result<RasterStats, Error> {
    let mut renderer = Renderer::new(width, height);
    let stats = renderer.render(mesh, texture, context)?;

    save_framebuffer(&renderer.framebuffer, output)?;
    if let Some(depth_path) = depth_output {
        save_depth_image(&renderer.framebuffer, depth_path)?;
    }
    Ok(stats)
}

/// Headless run: load the model and its texture, render, save.
pub fn run(config: &Config) -> Result<RasterStats, Error> {
    let start = Instant::now();
    let model_path = Path::new(&config.model.path);

    let mut mesh = load_obj(model_path)?;
    if config.model.normalize {
        let (center, scale) = normalize_and_center_model(&mut mesh);
        debug!("Model normalized. Center: {:?}, Scale: {:.4}", center, scale);
    }

    let texture_path = match &config.model.texture {
        Some(path) => Path::new(path).to_path_buf(),
        None => Texture::diffuse_path_for(model_path),
    };
    let texture = Texture::load_optional(&texture_path);

    let context = config.render_context();
    let stats = render_mesh_to_file(
        &mesh,
        texture.as_ref().map(|t| t as &dyn TextureProvider),
        &context,
        (config.render.width, config.render.height),
        Path::new(&config.render.output),
        config.render.depth_output.as_deref().map(Path::new),
    )?;

    info!("Done in {:?}", start.elapsed());
    Ok(stats)
}
