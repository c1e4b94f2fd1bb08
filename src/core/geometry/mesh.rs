use std::path::Path;

use glam::DVec3;

use super::Face;
use crate::error::MeshError;

pub type Vertex = DVec3;

/// Vertex buffer plus polygon list. Vertex identity is its position in `vertices`.
///
/// A `Mesh` is only ever handed out fully built: every face index is checked against the vertex
/// buffer on construction and the buffers are not exposed mutably afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self, MeshError> {
        for (face_idx, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(MeshError::DegenerateFace {
                    face: face_idx,
                    len: face.len(),
                });
            }
            if let Some(&index) = face.indices().iter().find(|&&i| i >= vertices.len()) {
                return Err(MeshError::IndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }
        Ok(Self { vertices, faces })
    }

    /// For generators that lay out their own indices.
    pub(crate) fn from_generated(vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        debug_assert!(faces
            .iter()
            .all(|f| f.len() >= 3 && f.indices().iter().all(|&i| i < vertices.len())));
        Self { vertices, faces }
    }

    /// Reads a polygonal OBJ file, keeping quads and n-gons as they are written.
    ///
    /// All objects in the file are merged into one mesh. Normals, texture coordinates and
    /// materials are ignored.
    pub fn from_obj(path: &Path) -> Result<Self, MeshError> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: false,
                single_index: false,
                ..Default::default()
            },
        )
        .map_err(|source| MeshError::Obj {
            path: path.to_owned(),
            source,
        })?;

        let mut vertices = Vec::new();
        let mut faces = Vec::new();

        for model in models {
            let mesh_data = model.mesh;
            let offset = vertices.len();

            for pos in mesh_data.positions.chunks_exact(3) {
                vertices.push(DVec3::new(pos[0], pos[1], pos[2]));
            }

            // tobj leaves the arity list empty when every face is a triangle
            let arities: Vec<usize> = if mesh_data.face_arities.is_empty() {
                vec![3; mesh_data.indices.len() / 3]
            } else {
                mesh_data.face_arities.iter().map(|&a| a as usize).collect()
            };

            let mut cursor = 0;
            for arity in arities {
                let end = (cursor + arity).min(mesh_data.indices.len());
                let indices = mesh_data.indices[cursor..end]
                    .iter()
                    .map(|&i| offset + i as usize)
                    .collect();
                faces.push(Face::new(indices));
                cursor = end;
            }
        }

        Self::new(vertices, faces)
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of triangles the mesh turns into once every face is fanned out.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.len().saturating_sub(2)).sum()
    }

    /// Every face fanned out into triangles, in face order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.faces
            .iter()
            .flat_map(Face::triangles)
            .map(|[a, b, c]| [self.vertices[a], self.vertices[b], self.vertices[c]])
    }
}
