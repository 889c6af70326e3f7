use nalgebra::{Point3, Vector2, Vector3};

/// Per-corner attributes of one fan triangle, fetched from the mesh.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    /// Position in object (world) space.
    pub position: Point3<f32>,
    /// Precomputed unit vertex normal.
    pub normal: Vector3<f32>,
    /// Texture coordinate, (0, 0) when the face has none.
    pub uv: Vector2<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, uv: Vector2<f32>) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// A triangle after the transform chain: x, y in pixels, z the depth value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenTriangle {
    pub points: [Point3<f32>; 3],
}

impl ScreenTriangle {
    pub fn new(points: [Point3<f32>; 3]) -> Self {
        Self { points }
    }

    /// Depth at the given barycentric weights.
    #[inline]
    pub fn depth_at(&self, bary: &Vector3<f32>) -> f32 {
        self.points[0].z * bary.x + self.points[1].z * bary.y + self.points[2].z * bary.z
    }
}
