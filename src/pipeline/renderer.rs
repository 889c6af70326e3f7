use crate::core::color::Color;
use crate::core::framebuffer::FrameBuffer;
use crate::core::rasterizer::{RasterStats, Rasterizer};
use crate::error::RenderError;
use crate::pipeline::passes::{render_opaque_pass, render_overlay_pass};
use crate::scene::context::RenderContext;
use crate::scene::mesh::MeshProvider;
use crate::scene::texture::TextureProvider;
use log::{debug, info};
use std::time::Instant;

/// Owns the frame's buffers and drives the passes over them.
pub struct Renderer {
    pub rasterizer: Rasterizer,
    pub framebuffer: FrameBuffer,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(),
            framebuffer: FrameBuffer::new(width, height),
        }
    }

    /// Clears colour to `color` and depth to negative infinity.
    pub fn clear(&mut self, color: Color) {
        self.framebuffer.clear(color);
    }

    /// Renders one frame: clear, opaque pass, then the overlay pass if the
    /// context has one.
    ///
    /// Refuses meshes without vertices or faces before touching any pixel.
    pub fn render<M: MeshProvider + ?Sized>(
        &mut self,
        mesh: &M,
        texture: Option<&dyn TextureProvider>,
        context: &RenderContext,
    ) -> Result<RasterStats, RenderError> {
        let vertices = mesh.vertex_count();
        let faces = mesh.face_count();
        if vertices == 0 || faces == 0 {
            return Err(RenderError::InputInvalid { vertices, faces });
        }

        let start = Instant::now();
        self.rasterizer.reset_stats();
        self.clear(context.background);

        info!(
            "Rendering {} faces / {} vertices at {}x{} ({:?}{})",
            faces,
            vertices,
            self.framebuffer.width,
            self.framebuffer.height,
            context.shading_mode,
            if texture.is_some_and(|t| t.is_present()) {
                ", textured"
            } else {
                ""
            }
        );

        render_opaque_pass(
            &mut self.rasterizer,
            &mut self.framebuffer,
            mesh,
            texture,
            context,
        );
        debug!("Opaque pass done: {:?}", self.rasterizer.stats);

        if let Some(overlay) = &context.overlay {
            render_overlay_pass(
                &mut self.rasterizer,
                &mut self.framebuffer,
                overlay,
                &context.transform,
            );
        }

        let stats = self.rasterizer.stats;
        info!(
            "Frame done in {:?}: {} triangles ({} degenerate), {} fragments written, {} blended",
            start.elapsed(),
            stats.triangles,
            stats.degenerate,
            stats.fragments_written,
            stats.fragments_blended
        );
        Ok(stats)
    }
}
