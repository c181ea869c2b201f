//! OBJ parsing on top of tobj.

use std::io::BufReader;

use cgmath::{InnerSpace, Vector3, Zero};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed OBJ data: {0}")]
    Malformed(#[from] tobj::LoadError),
    #[error("OBJ data contains no geometry")]
    NoGeometry,
}

/// One mesh part extracted from an OBJ file: flat position/normal arrays
/// (three floats per vertex) and a triangulated index list.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub name: String,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
}

/// Parses OBJ text into mesh parts.
///
/// Faces are triangulated and re-indexed to a single index per vertex.
/// Material references are ignored; the viewer renders with a fixed
/// material. Parts with normals missing from the file get them
/// reconstructed from face geometry.
pub fn parse_obj(text: &str) -> Result<Vec<MeshData>, ParseError> {
    let mut reader = BufReader::new(text.as_bytes());
    let (models, _materials) = tobj::load_obj_buf(
        &mut reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )?;

    let mut parts = Vec::with_capacity(models.len());
    for model in models {
        let mesh = model.mesh;
        if mesh.positions.is_empty() {
            continue;
        }

        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
        } else {
            compute_vertex_normals(&mesh.positions, &mesh.indices)
        };

        parts.push(MeshData {
            name: model.name,
            positions: mesh.positions,
            normals,
            indices: mesh.indices,
        });
    }

    if parts.is_empty() {
        return Err(ParseError::NoGeometry);
    }
    Ok(parts)
}

/// Area-weighted vertex normals from triangle geometry, for OBJ files that
/// ship positions only.
fn compute_vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut accumulated = vec![Vector3::<f32>::zero(); vertex_count];

    let vertex = |i: usize| {
        Vector3::new(positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2])
    };

    for triangle in indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );
        // Cross-product magnitude carries the triangle area, so larger
        // faces weigh more in the accumulated normal.
        let face_normal = (vertex(i1) - vertex(i0)).cross(vertex(i2) - vertex(i0));
        accumulated[i0] += face_normal;
        accumulated[i1] += face_normal;
        accumulated[i2] += face_normal;
    }

    let mut normals = Vec::with_capacity(positions.len());
    for normal in accumulated {
        let normal = if normal.magnitude2() > 0.0 {
            normal.normalize()
        } else {
            Vector3::unit_y()
        };
        normals.extend_from_slice(&[normal.x, normal.y, normal.z]);
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CUBE_OBJ: &str = "\
o cube
v -1.0 -1.0 -1.0
v -1.0 -1.0 1.0
v -1.0 1.0 -1.0
v -1.0 1.0 1.0
v 1.0 -1.0 -1.0
v 1.0 -1.0 1.0
v 1.0 1.0 -1.0
v 1.0 1.0 1.0
f 1 2 4 3
f 5 7 8 6
f 1 5 6 2
f 3 4 8 7
f 1 3 7 5
f 2 6 8 4
";

    #[test]
    fn parses_cube_with_triangulation() {
        let parts = parse_obj(CUBE_OBJ).unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].name, "cube");
        // 6 quads triangulated into 12 triangles.
        assert_eq!(parts[0].indices.len(), 36);
        assert_eq!(parts[0].positions.len() % 3, 0);
        assert_eq!(parts[0].normals.len(), parts[0].positions.len());
    }

    #[test]
    fn reconstructed_normals_are_unit_length() {
        let parts = parse_obj(CUBE_OBJ).unwrap();
        for normal in parts[0].normals.chunks_exact(3) {
            let length = (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2])
                .sqrt();
            assert_relative_eq!(length, 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn rejects_text_with_no_geometry() {
        match parse_obj("not an obj file\n") {
            Err(ParseError::NoGeometry) => {}
            other => panic!("expected NoGeometry, got {other:?}"),
        }
    }

    #[test]
    fn keeps_normals_supplied_by_the_file() {
        let obj = "\
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
vn 0.0 0.0 1.0
f 1//1 2//2 3//3
";
        let parts = parse_obj(obj).unwrap();
        assert_eq!(parts[0].normals, [0.0f32, 0.0, 1.0].repeat(3));
    }
}
