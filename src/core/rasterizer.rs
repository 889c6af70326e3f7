use crate::core::color::Color;
use crate::core::framebuffer::FrameBuffer;
use crate::core::geometry::ScreenTriangle;
use crate::core::math::interpolation::{BarycentricFrame, is_inside_triangle};
use crate::core::pipeline::Shading;
use crate::pipeline::shaders::phong::Lighting;
use nalgebra::{Point2, Vector3};

/// Counters collected while drawing, reset by the renderer every frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RasterStats {
    pub triangles: usize,
    pub degenerate: usize,
    pub fragments_written: usize,
    pub fragments_blended: usize,
}

/// Scan-converts screen-space triangles into a [`FrameBuffer`].
///
/// Coverage is the inclusive barycentric test over the integer pixel grid
/// inside the triangle's clamped bounding box. Depth uses "strictly greater
/// passes", so among coplanar triangles the first one submitted wins.
#[derive(Debug, Default)]
pub struct Rasterizer {
    pub stats: RasterStats,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_stats(&mut self) {
        self.stats = RasterStats::default();
    }

    /// Draws an opaque triangle: depth test with update, then shading.
    pub fn draw_triangle(
        &mut self,
        framebuffer: &mut FrameBuffer,
        triangle: &ScreenTriangle,
        shading: &Shading<'_>,
        lighting: &Lighting,
    ) {
        self.stats.triangles += 1;
        let mut written = 0;

        let covered = scan_triangle(framebuffer.width, framebuffer.height, triangle, |x, y, bary| {
            let depth = triangle.depth_at(&bary);
            if framebuffer.depth_test_and_update(x, y, depth) {
                framebuffer.set_pixel(x, y, shading.shade(&bary, lighting));
                written += 1;
            }
        });

        if !covered {
            self.stats.degenerate += 1;
        }
        self.stats.fragments_written += written;
    }

    /// Draws a translucent triangle: same depth test, but the stored depth is
    /// never modified and the colour is alpha-blended over the existing pixel.
    pub fn draw_overlay_triangle(
        &mut self,
        framebuffer: &mut FrameBuffer,
        triangle: &ScreenTriangle,
        color: Color,
        alpha: f32,
    ) {
        self.stats.triangles += 1;
        let mut blended = 0;

        let covered = scan_triangle(framebuffer.width, framebuffer.height, triangle, |x, y, bary| {
            let depth = triangle.depth_at(&bary);
            if framebuffer.depth_test(x, y, depth) {
                framebuffer.blend_pixel(x, y, color, alpha);
                blended += 1;
            }
        });

        if !covered {
            self.stats.degenerate += 1;
        }
        self.stats.fragments_blended += blended;
    }
}

/// Integer bounding box of the triangle (coordinates truncated toward zero)
/// clamped to `[0, width - 1] x [0, height - 1]`, as `(min_x, min_y, max_x,
/// max_y)`. May be empty (`min > max`) only for a zero-sized target.
pub fn bounding_box(
    points: &[nalgebra::Point3<f32>; 3],
    width: usize,
    height: usize,
) -> (i64, i64, i64, i64) {
    let max_x_clamp = width as i64 - 1;
    let max_y_clamp = height as i64 - 1;

    let mut min_x = max_x_clamp;
    let mut min_y = max_y_clamp;
    let mut max_x = 0;
    let mut max_y = 0;

    for p in points {
        let px = p.x as i64;
        let py = p.y as i64;
        min_x = min_x.min(px).max(0);
        min_y = min_y.min(py).max(0);
        max_x = max_x.max(px).min(max_x_clamp);
        max_y = max_y.max(py).min(max_y_clamp);
    }

    (min_x, min_y, max_x, max_y)
}

/// Visits every covered pixel of `triangle` with its barycentric weights,
/// column by column.
///
/// Returns `false` without visiting anything if the triangle is degenerate.
pub fn scan_triangle<F>(width: usize, height: usize, triangle: &ScreenTriangle, mut visit: F) -> bool
where
    F: FnMut(usize, usize, Vector3<f32>),
{
    let Some(frame) = BarycentricFrame::new(&triangle.points) else {
        return false;
    };
    if width == 0 || height == 0 {
        return true;
    }

    let (min_x, min_y, max_x, max_y) = bounding_box(&triangle.points, width, height);

    for x in min_x..=max_x {
        for y in min_y..=max_y {
            let bary = frame.weights(Point2::new(x as f32, y as f32));
            if !is_inside_triangle(&bary) {
                continue;
            }
            visit(x as usize, y as usize, bary);
        }
    }
    true
}
