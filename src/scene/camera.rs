use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};

/// Look-at camera with the single-term perspective projection.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub center: Point3<f32>,
    /// Must not be collinear with `eye - center`.
    pub up: Vector3<f32>,

    // --- Cached Matrices ---
    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new(eye: Point3<f32>, center: Point3<f32>, up: Vector3<f32>) -> Self {
        let mut cam = Self {
            eye,
            center,
            up,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    /// Distance from eye to center; the projection treats 0 as 1.
    pub fn eye_distance(&self) -> f32 {
        (self.eye - self.center).norm()
    }

    /// Recalculates View and Projection matrices from the current parameters.
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.eye, &self.center, &self.up);
        self.projection_matrix = TransformFactory::projection(self.eye_distance());
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }
}
