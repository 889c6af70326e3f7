use crate::scene::mesh::Mesh;
use nalgebra::Point3;

/// Centres the mesh on its bounding-box centre and scales it uniformly so
/// that the larger of its X and Y extents becomes 1.8. Depth extent is not
/// considered.
///
/// Vertex normals are recomputed. Returns the original centre and the scale
/// factor used.
pub fn normalize_and_center_model(mesh: &mut Mesh) -> (Point3<f32>, f32) {
    if mesh.positions.is_empty() {
        return (Point3::origin(), 1.0);
    }

    // 1. Calculate Bounding Box
    let mut min_bound = Point3::new(f32::MAX, f32::MAX, f32::MAX);
    let mut max_bound = Point3::new(f32::MIN, f32::MIN, f32::MIN);
    for p in &mesh.positions {
        min_bound = min_bound.inf(p);
        max_bound = max_bound.sup(p);
    }

    // 2. Calculate Center and Size
    let center = nalgebra::center(&min_bound, &max_bound);
    let extent = max_bound - min_bound;
    let max_extent_xy = extent.x.max(extent.y);
    let scale_factor = if max_extent_xy == 0.0 {
        1.8
    } else {
        1.8 / max_extent_xy
    };

    // 3. Apply Transform to all vertices
    for p in &mut mesh.positions {
        *p = Point3::from((*p - center) * scale_factor);
    }
    mesh.compute_vertex_normals();

    (center, scale_factor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mesh::Face;

    #[test]
    fn fits_xy_extent_to_1_8() {
        let mut mesh = Mesh::new(
            vec![
                Point3::new(10.0, 20.0, 0.0),
                Point3::new(14.0, 20.0, 100.0),
                Point3::new(10.0, 22.0, 50.0),
            ],
            Vec::new(),
            vec![Face::new(vec![0, 1, 2], vec![])],
        );
        let (center, scale) = normalize_and_center_model(&mut mesh);
        assert_eq!(center, Point3::new(12.0, 21.0, 50.0));
        assert!((scale - 0.45).abs() < 1e-6);
        assert!((mesh.positions[0] - Point3::new(-0.9, -0.45, -22.5)).norm() < 1e-4);
        assert!((mesh.positions[1].x - 0.9).abs() < 1e-5);
    }

    #[test]
    fn empty_mesh_is_untouched() {
        let mut mesh = Mesh::default();
        assert_eq!(normalize_and_center_model(&mut mesh), (Point3::origin(), 1.0));
    }
}
