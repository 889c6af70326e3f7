use nalgebra::{Matrix4, Point3, Vector3};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for the matrices of the camera/projection/viewport chain.
/// Written out by hand to keep the exact conventions of the pipeline
/// (right-handed camera looking down -Z, larger depth is nearer).
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates the ModelView (look-at) matrix.
    ///
    /// `up` must not be collinear with `eye - center`; the basis is undefined
    /// (NaN) in that case and this is not checked.
    pub fn view(eye: &Point3<f32>, center: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        let z_axis = (eye - center).normalize();
        let x_axis = up.cross(&z_axis).normalize();
        let y_axis = z_axis.cross(&x_axis).normalize();

        // Rows are the camera basis, i.e. the inverse of the basis matrix.
        let rotation = Matrix4::new(
            x_axis.x, x_axis.y, x_axis.z, 0.0,
            y_axis.x, y_axis.y, y_axis.z, 0.0,
            z_axis.x, z_axis.y, z_axis.z, 0.0,
            0.0,      0.0,      0.0,      1.0,
        );

        rotation * Self::translation(&-eye.coords)
    }

    /// Creates the single-term perspective matrix: identity with
    /// `m[3][2] = -1 / eye_distance`, so that `w = 1 - z / eye_distance`.
    ///
    /// A zero distance is replaced by 1.
    pub fn projection(eye_distance: f32) -> Matrix4<f32> {
        let distance = if eye_distance == 0.0 { 1.0 } else { eye_distance };
        let mut m = Matrix4::identity();
        m[(3, 2)] = -1.0 / distance;
        m
    }

    /// Maps the [-1, 1] cube to pixels `[x, x + w] x [y, y + h]` and depth
    /// `[0, depth_range]`.
    pub fn viewport(x: f32, y: f32, w: f32, h: f32, depth_range: f32) -> Matrix4<f32> {
        Matrix4::new(
            w / 2.0, 0.0,     0.0,               x + w / 2.0,
            0.0,     h / 2.0, 0.0,               y + h / 2.0,
            0.0,     0.0,     depth_range / 2.0, depth_range / 2.0,
            0.0,     0.0,     0.0,               1.0,
        )
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Multiplies a point (w = 1) by `m` and divides x, y, z by the resulting w.
///
/// `w == 0` (a vertex on the projection singularity) is a precondition
/// violation and yields non-finite coordinates.
#[inline]
pub fn transform_point(m: &Matrix4<f32>, p: &Point3<f32>) -> Point3<f32> {
    let h = m * p.to_homogeneous();
    Point3::new(h.x / h.w, h.y / h.w, h.z / h.w)
}

/// The three matrices of one frame and their product
/// `viewport * projection * model_view`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformChain {
    pub model_view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub viewport: Matrix4<f32>,
    combined: Matrix4<f32>,
}

impl TransformChain {
    pub fn new(model_view: Matrix4<f32>, projection: Matrix4<f32>, viewport: Matrix4<f32>) -> Self {
        Self {
            model_view,
            projection,
            viewport,
            combined: viewport * projection * model_view,
        }
    }

    pub fn combined(&self) -> &Matrix4<f32> {
        &self.combined
    }

    /// World space to screen space (pixels plus depth).
    #[inline]
    pub fn project(&self, world: &Point3<f32>) -> Point3<f32> {
        transform_point(&self.combined, world)
    }

    /// Screen space back to world space through the inverse chain.
    /// Returns `None` if the combined matrix is singular.
    pub fn unproject(&self, screen: &Point3<f32>) -> Option<Point3<f32>> {
        let inverse = self.combined.try_inverse()?;
        Some(transform_point(&inverse, screen))
    }
}
