use crate::core::color::Color;
use image::Rgba;
use nalgebra::Point3;

pub const DEFAULT_OVERLAY_COLOR: Color = Rgba([180, 220, 255, 255]);
pub const DEFAULT_OVERLAY_ALPHA: f32 = 0.15;
pub const DEFAULT_OVERLAY_HALF_EXTENT: f32 = 0.95;

/// A small convex triangle set drawn translucently over the shaded scene.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayVolume {
    pub vertices: Vec<Point3<f32>>,
    pub triangles: Vec<[usize; 3]>,
    pub color: Color,
    pub alpha: f32,
}

impl OverlayVolume {
    /// Axis-aligned cube centred on the origin, two triangles per side.
    #[rustfmt::skip]
    pub fn cube(half_extent: f32, color: Color, alpha: f32) -> Self {
        let s = half_extent;
        let vertices = vec![
            Point3::new(-s, -s, -s), Point3::new( s, -s, -s),
            Point3::new( s,  s, -s), Point3::new(-s,  s, -s),
            Point3::new(-s, -s,  s), Point3::new( s, -s,  s),
            Point3::new( s,  s,  s), Point3::new(-s,  s,  s),
        ];
        let triangles = vec![
            [0, 1, 2], [0, 2, 3], // back
            [4, 6, 5], [4, 7, 6], // front
            [0, 4, 5], [0, 5, 1], // bottom
            [3, 2, 6], [3, 6, 7], // top
            [0, 3, 7], [0, 7, 4], // left
            [1, 5, 6], [1, 6, 2], // right
        ];
        Self {
            vertices,
            triangles,
            color,
            alpha,
        }
    }

    /// Corner positions of every triangle, in submission order.
    pub fn corner_positions(&self) -> impl Iterator<Item = [Point3<f32>; 3]> + '_ {
        self.triangles
            .iter()
            .filter(|t| t.iter().all(|&i| i < self.vertices.len()))
            .map(|t| t.map(|i| self.vertices[i]))
    }
}

impl Default for OverlayVolume {
    fn default() -> Self {
        Self::cube(
            DEFAULT_OVERLAY_HALF_EXTENT,
            DEFAULT_OVERLAY_COLOR,
            DEFAULT_OVERLAY_ALPHA,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_triangles_on_its_surface() {
        let cube = OverlayVolume::cube(0.5, DEFAULT_OVERLAY_COLOR, 0.15);
        let tris: Vec<_> = cube.corner_positions().collect();
        assert_eq!(tris.len(), 12);
        for tri in tris {
            // All three corners share one coordinate at +-0.5: a cube side.
            let on_side = (0..3).any(|axis| {
                let v = tri[0][axis];
                v.abs() == 0.5 && tri.iter().all(|p| p[axis] == v)
            });
            assert!(on_side, "{tri:?}");
        }
    }
}
