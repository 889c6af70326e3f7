use log::{debug, warn};
use nalgebra::{Point3, Vector2, Vector3};

/// Normal used where none can be computed or looked up.
pub const FALLBACK_NORMAL: Vector3<f32> = Vector3::new(0.0, 0.0, 1.0);

/// Read-only view of a polygon mesh, as consumed by the render pass.
pub trait MeshProvider {
    fn vertex_count(&self) -> usize;
    fn face_count(&self) -> usize;
    /// Vertex indices of face `face`, at least three for a drawable face.
    fn face_vertex_indices(&self, face: usize) -> &[usize];
    fn vertex_position(&self, vertex: usize) -> Point3<f32>;
    /// Precomputed unit normal; [`FALLBACK_NORMAL`] for unknown indices.
    fn vertex_normal(&self, vertex: usize) -> Vector3<f32>;
    fn face_has_uv(&self, face: usize) -> bool;
    /// UV of the `nth` corner of `face`; (0, 0) for any bad index.
    fn uv_at(&self, face: usize, nth: usize) -> Vector2<f32>;
}

/// One polygon: vertex indices plus an optional parallel list of UV indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Face {
    pub vertices: Vec<usize>,
    /// Either empty or the same length as `vertices`.
    pub uvs: Vec<usize>,
}

impl Face {
    pub fn new(vertices: Vec<usize>, uvs: Vec<usize>) -> Self {
        let uvs = if uvs.len() == vertices.len() {
            uvs
        } else {
            if !uvs.is_empty() {
                debug!(
                    "Dropping {} UV indices for a face with {} vertices",
                    uvs.len(),
                    vertices.len()
                );
            }
            Vec::new()
        };
        Self { vertices, uvs }
    }

    /// Fan triangulation of this face.
    pub fn triangles(&self) -> FanTriangles<'_> {
        FanTriangles::new(&self.vertices)
    }
}

/// One triangle of a fan: positions within the face (`nth`) and the vertex
/// indices they refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanTriangle {
    pub nth: [usize; 3],
    pub vertices: [usize; 3],
}

/// Lazily splits a polygon into triangles `(0, k, k + 1)` for
/// `k = 1..n - 2`. Polygons with fewer than three corners yield nothing.
#[derive(Debug, Clone)]
pub struct FanTriangles<'a> {
    indices: &'a [usize],
    k: usize,
}

impl<'a> FanTriangles<'a> {
    pub fn new(indices: &'a [usize]) -> Self {
        Self { indices, k: 1 }
    }
}

impl Iterator for FanTriangles<'_> {
    type Item = FanTriangle;

    fn next(&mut self) -> Option<FanTriangle> {
        if self.k + 1 >= self.indices.len() {
            return None;
        }
        let k = self.k;
        self.k += 1;
        Some(FanTriangle {
            nth: [0, k, k + 1],
            vertices: [self.indices[0], self.indices[k], self.indices[k + 1]],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.indices.len().saturating_sub(self.k + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FanTriangles<'_> {}

/// An indexed polygon mesh with separately indexed texture coordinates.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Point3<f32>>,
    pub uvs: Vec<Vector2<f32>>,
    pub faces: Vec<Face>,
    normals: Vec<Vector3<f32>>,
}

impl Mesh {
    /// Builds a mesh and computes its vertex normals.
    pub fn new(positions: Vec<Point3<f32>>, uvs: Vec<Vector2<f32>>, faces: Vec<Face>) -> Self {
        let mut mesh = Self {
            positions,
            uvs,
            faces,
            normals: Vec::new(),
        };
        mesh.compute_vertex_normals();
        mesh
    }

    /// A single triangle in the z = 0 plane, handy for tests and smoke runs.
    pub fn create_test_triangle() -> Self {
        Self::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![
                Vector2::new(0.0, 0.0),
                Vector2::new(1.0, 0.0),
                Vector2::new(0.0, 1.0),
            ],
            vec![Face::new(vec![0, 1, 2], vec![0, 1, 2])],
        )
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    /// Recomputes per-vertex normals: the normalized sum of the normals of
    /// every fan triangle touching the vertex, each `cross(v2 - v0, v1 - v0)`
    /// and therefore weighted by twice its area. Vertices whose sum has
    /// (near) zero length get [`FALLBACK_NORMAL`].
    ///
    /// Must be called again after positions change.
    pub fn compute_vertex_normals(&mut self) {
        let count = self.positions.len();
        let mut normals = vec![Vector3::zeros(); count];
        let mut skipped = 0;

        for face in &self.faces {
            for tri in face.triangles() {
                let [i0, i1, i2] = tri.vertices;
                if i0 >= count || i1 >= count || i2 >= count {
                    skipped += 1;
                    continue;
                }
                let v0 = self.positions[i0];
                let e1 = self.positions[i2] - v0;
                let e2 = self.positions[i1] - v0;
                let face_normal = e1.cross(&e2);

                normals[i0] += face_normal;
                normals[i1] += face_normal;
                normals[i2] += face_normal;
            }
        }

        if skipped > 0 {
            warn!("{skipped} triangles reference missing vertices, ignored for normals");
        }

        let mut fallback = 0;
        for normal in normals.iter_mut() {
            let len = normal.norm();
            if len > 1e-8 {
                *normal /= len;
            } else {
                *normal = FALLBACK_NORMAL;
                fallback += 1;
            }
        }
        if fallback > 0 {
            debug!("{fallback} vertices have no usable normal, using (0, 0, 1)");
        }

        self.normals = normals;
    }
}

impl MeshProvider for Mesh {
    fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face_vertex_indices(&self, face: usize) -> &[usize] {
        self.faces
            .get(face)
            .map(|f| f.vertices.as_slice())
            .unwrap_or(&[])
    }

    fn vertex_position(&self, vertex: usize) -> Point3<f32> {
        self.positions[vertex]
    }

    fn vertex_normal(&self, vertex: usize) -> Vector3<f32> {
        self.normals.get(vertex).copied().unwrap_or(FALLBACK_NORMAL)
    }

    fn face_has_uv(&self, face: usize) -> bool {
        self.faces.get(face).is_some_and(|f| f.uvs.len() >= 3)
    }

    fn uv_at(&self, face: usize, nth: usize) -> Vector2<f32> {
        self.faces
            .get(face)
            .and_then(|f| f.uvs.get(nth))
            .and_then(|&idx| self.uvs.get(idx))
            .copied()
            .unwrap_or_else(Vector2::zeros)
    }
}
