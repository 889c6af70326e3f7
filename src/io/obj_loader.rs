use crate::error::Error;
use crate::scene::mesh::{Face, Mesh};
use log::{debug, info, warn};
use nalgebra::{Point3, Vector2};
use std::path::Path;

/// Loads a Wavefront OBJ file into a single [`Mesh`].
///
/// Polygons are kept as they are (fan triangulation happens at draw time) and
/// texture coordinates keep their own index list. All objects and groups in
/// the file are merged. Faces with fewer than three vertices are dropped.
/// Materials are ignored.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, Error> {
    let path = path.as_ref();
    info!("Loading OBJ file: {:?}", path);

    let load_options = tobj::LoadOptions {
        triangulate: false,
        single_index: false,
        ..Default::default()
    };

    let (models, _materials) =
        tobj::load_obj(path, &load_options).map_err(|source| Error::ObjLoad {
            path: path.display().to_string(),
            source,
        })?;

    let mut positions: Vec<Point3<f32>> = Vec::new();
    let mut uvs: Vec<Vector2<f32>> = Vec::new();
    let mut faces: Vec<Face> = Vec::new();
    let mut dropped = 0;

    for model in &models {
        let mesh = &model.mesh;
        let position_offset = positions.len();
        let uv_offset = uvs.len();

        positions.extend(
            mesh.positions
                .chunks_exact(3)
                .map(|p| Point3::new(p[0], p[1], p[2])),
        );
        uvs.extend(
            mesh.texcoords
                .chunks_exact(2)
                .map(|t| Vector2::new(t[0], t[1])),
        );

        let has_uv_indices = mesh.texcoord_indices.len() == mesh.indices.len();
        if !mesh.texcoord_indices.is_empty() && !has_uv_indices {
            warn!(
                "Object '{}' mixes faces with and without texture coordinates; ignoring its UVs",
                model.name
            );
        }

        // No arities means every face is a triangle.
        let arities: Vec<usize> = if mesh.face_arities.is_empty() {
            vec![3; mesh.indices.len() / 3]
        } else {
            mesh.face_arities.iter().map(|&a| a as usize).collect()
        };

        let mut start = 0;
        for arity in arities {
            let end = start + arity;
            if end > mesh.indices.len() {
                break;
            }
            if arity < 3 {
                dropped += 1;
                start = end;
                continue;
            }

            let vertices = mesh.indices[start..end]
                .iter()
                .map(|&i| i as usize + position_offset)
                .collect();
            let face_uvs = if has_uv_indices {
                mesh.texcoord_indices[start..end]
                    .iter()
                    .map(|&i| i as usize + uv_offset)
                    .collect()
            } else {
                Vec::new()
            };
            faces.push(Face::new(vertices, face_uvs));
            start = end;
        }

        debug!(
            "Object '{}': {} positions, {} texcoords",
            model.name,
            mesh.positions.len() / 3,
            mesh.texcoords.len() / 2
        );
    }

    if dropped > 0 {
        warn!("Dropped {dropped} faces with fewer than three vertices");
    }

    info!(
        "OBJ loaded: {} objects, {} vertices, {} texcoords, {} faces",
        models.len(),
        positions.len(),
        uvs.len(),
        faces.len()
    );

    Ok(Mesh::new(positions, uvs, faces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::mesh::MeshProvider;
    use std::fs;

    fn write_obj(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn keeps_polygons_and_uv_indices() {
        let path = write_obj(
            "phong_rasterizer_quad.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             f 1/1 2/2 3/3 4/4\n",
        );
        let mesh = load_obj(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.face_vertex_indices(0).len(), 4);
        assert!(mesh.face_has_uv(0));
        assert_eq!(mesh.uv_at(0, 2), Vector2::new(1.0, 1.0));
        assert_eq!(mesh.faces[0].triangles().count(), 2);
    }

    #[test]
    fn faces_without_uvs_have_none() {
        let path = write_obj(
            "phong_rasterizer_plain.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );
        let mesh = load_obj(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(mesh.face_count(), 1);
        assert!(!mesh.face_has_uv(0));
        assert_eq!(mesh.uv_at(0, 0), Vector2::zeros());
    }

    #[test]
    fn objects_are_merged_with_offsets() {
        let path = write_obj(
            "phong_rasterizer_two_objects.obj",
            "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
             o b\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        );
        let mesh = load_obj(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.face_count(), 2);
        for &v in mesh.face_vertex_indices(1) {
            assert!(v >= 3 && v < 6);
            assert_eq!(mesh.vertex_position(v).z, 1.0);
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = std::env::temp_dir().join("phong_rasterizer_missing.obj");
        assert!(matches!(load_obj(&path), Err(Error::ObjLoad { .. })));
    }
}
