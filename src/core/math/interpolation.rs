use nalgebra::{Point2, Point3, Vector3};
use std::ops::{Add, Mul};

/// Triangles whose doubled screen-space area is below this are not drawn.
pub const DEGENERATE_AREA_EPSILON: f32 = 1e-2;

/// Precomputed edge data for repeated barycentric queries against one
/// screen-space triangle. Only x and y of the corners are used.
#[derive(Debug, Clone, Copy)]
pub struct BarycentricFrame {
    origin: Point2<f32>,
    e1: nalgebra::Vector2<f32>,
    e2: nalgebra::Vector2<f32>,
    inv_denom: f32,
}

impl BarycentricFrame {
    /// Returns `None` for a degenerate (near zero area) triangle.
    pub fn new(points: &[Point3<f32>; 3]) -> Option<Self> {
        let origin = points[0].xy();
        let e1 = points[1].xy() - origin;
        let e2 = points[2].xy() - origin;

        let denom = e1.x * e2.y - e2.x * e1.y;
        if denom.abs() < DEGENERATE_AREA_EPSILON {
            return None;
        }

        Some(Self {
            origin,
            e1,
            e2,
            inv_denom: 1.0 / denom,
        })
    }

    /// Weights (w, u, v) of `p` for corners 0, 1 and 2.
    #[inline]
    pub fn weights(&self, p: Point2<f32>) -> Vector3<f32> {
        let d = p - self.origin;
        let u = (d.x * self.e2.y - self.e2.x * d.y) * self.inv_denom;
        let v = (self.e1.x * d.y - d.x * self.e1.y) * self.inv_denom;
        Vector3::new(1.0 - u - v, u, v)
    }
}

/// Barycentric weights (w, u, v) of `p` with respect to the x/y projection of
/// `points`.
///
/// Returns `None` if the triangle is degenerate; no pixel of such a triangle
/// should be rasterized.
pub fn barycentric(points: &[Point3<f32>; 3], p: Point2<f32>) -> Option<Vector3<f32>> {
    BarycentricFrame::new(points).map(|frame| frame.weights(p))
}

/// Inclusive coverage rule: points on an edge belong to the triangle.
#[inline(always)]
pub fn is_inside_triangle(bary: &Vector3<f32>) -> bool {
    bary.x >= 0.0 && bary.y >= 0.0 && bary.z >= 0.0
}

/// Linear (screen-space) interpolation of a per-corner attribute.
#[inline]
pub fn interpolate<T>(values: &[T; 3], bary: &Vector3<f32>) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    values[0] * bary.x + values[1] * bary.y + values[2] * bary.z
}

/// Interpolates positions via their coordinate vectors.
#[inline]
pub fn interpolate_point(points: &[Point3<f32>; 3], bary: &Vector3<f32>) -> Point3<f32> {
    Point3::from(interpolate(
        &[points[0].coords, points[1].coords, points[2].coords],
        bary,
    ))
}
