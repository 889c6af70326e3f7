use nalgebra::Vector3;

/// The scene's single directional light.
///
/// `direction` points from the scene towards the light, so a surface facing
/// the light has `N . direction > 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
}

impl DirectionalLight {
    pub fn new(direction: Vector3<f32>) -> Self {
        Self {
            direction: direction.try_normalize(f32::EPSILON).unwrap_or(direction),
        }
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, -1.0))
    }
}
