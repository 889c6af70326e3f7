use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::{ScreenTriangle, Vertex};
use crate::core::math::transform::TransformChain;
use crate::core::pipeline::Shading;
use crate::core::rasterizer::Rasterizer;
use crate::scene::context::{RenderContext, ShadingMode};
use crate::scene::mesh::{FanTriangle, FanTriangles, MeshProvider};
use crate::scene::overlay::OverlayVolume;
use crate::scene::texture::TextureProvider;
use log::{debug, warn};

/// Fetches position, normal and UV for each corner of a fan triangle.
///
/// Returns `None` if a vertex index is outside the mesh.
fn fetch_vertices<M: MeshProvider + ?Sized>(
    mesh: &M,
    face: usize,
    tri: &FanTriangle,
    with_uv: bool,
) -> Option<[Vertex; 3]> {
    let count = mesh.vertex_count();
    if tri.vertices.iter().any(|&v| v >= count) {
        return None;
    }
    Some([0, 1, 2].map(|corner| {
        let v = tri.vertices[corner];
        let uv = if with_uv {
            mesh.uv_at(face, tri.nth[corner])
        } else {
            nalgebra::Vector2::zeros()
        };
        Vertex::new(mesh.vertex_position(v), mesh.vertex_normal(v), uv)
    }))
}

/// Picks the shading variant of one triangle.
fn resolve_shading<'a>(
    vertices: &[Vertex; 3],
    textured: bool,
    texture: Option<&'a dyn TextureProvider>,
    context: &RenderContext,
) -> Shading<'a> {
    if context.shading_mode == ShadingMode::Unlit {
        return Shading::FlatColor(context.albedo);
    }

    let normals = vertices.map(|v| v.normal);
    let world = vertices.map(|v| v.position);
    match texture {
        Some(texture) if textured => Shading::PhongTextured {
            normals,
            world,
            uvs: vertices.map(|v| v.uv),
            texture,
        },
        _ => Shading::PhongFlat {
            normals,
            world,
            albedo: context.albedo,
        },
    }
}

/// Draws every face of `mesh` in face order, fan-triangulating polygons.
///
/// Faces are textured when a texture is available and the face has UVs;
/// otherwise they use the context's constant albedo. Triangles referencing
/// missing vertices are skipped. Returns the number of skipped triangles.
pub fn render_opaque_pass<M: MeshProvider + ?Sized>(
    rasterizer: &mut Rasterizer,
    framebuffer: &mut FrameBuffer,
    mesh: &M,
    texture: Option<&dyn TextureProvider>,
    context: &RenderContext,
) -> usize {
    let texture = texture.filter(|t| t.is_present());
    let mut skipped = 0;

    for face in 0..mesh.face_count() {
        let indices = mesh.face_vertex_indices(face);
        let textured = texture.is_some() && mesh.face_has_uv(face);

        for tri in FanTriangles::new(indices) {
            let Some(vertices) = fetch_vertices(mesh, face, &tri, textured) else {
                skipped += 1;
                continue;
            };

            let screen = ScreenTriangle::new(vertices.map(|v| context.transform.project(&v.position)));
            let shading = resolve_shading(&vertices, textured, texture, context);
            rasterizer.draw_triangle(framebuffer, &screen, &shading, &context.lighting);
        }
    }

    if skipped > 0 {
        warn!("Skipped {skipped} triangles with out-of-range vertex indices");
    }
    skipped
}

/// Composites the overlay volume over the finished opaque image.
///
/// Must run after all opaque geometry: it reads but never writes depth.
pub fn render_overlay_pass(
    rasterizer: &mut Rasterizer,
    framebuffer: &mut FrameBuffer,
    overlay: &OverlayVolume,
    transform: &TransformChain,
) {
    debug!(
        "Overlay pass: {} triangles, alpha {}",
        overlay.triangles.len(),
        overlay.alpha
    );
    for corners in overlay.corner_positions() {
        let screen = ScreenTriangle::new(corners.map(|p| transform.project(&p)));
        rasterizer.draw_overlay_triangle(framebuffer, &screen, overlay.color, overlay.alpha);
    }
}
