use std::f64::consts::PI;

use glam::DVec3;
use log::debug;

use crate::core::geometry::{Face, Mesh};
use crate::core::shape::{check_size, check_sphere, ShapeParameters};
use crate::error::{ExportError, MeshError};

pub fn generate(params: &ShapeParameters) -> Result<Mesh, ExportError> {
    debug!("generating {} mesh", params.kind());
    match *params {
        ShapeParameters::Cube { size } => generate_cube(size),
        ShapeParameters::Sphere { radius, segments } => generate_sphere(radius, segments),
    }
}

/// Axis-aligned cube of edge `size` centred on the origin: 8 vertices, 6 quads.
///
/// Quads are listed back, front, bottom, top, right, left and take their vertex order straight
/// from the vertex table, so their windings are not consistent.
pub fn generate_cube(size: f64) -> Result<Mesh, ExportError> {
    check_size(size)?;
    let s = size / 2.0;

    #[rustfmt::skip]
    let vertices = vec![
        DVec3::new(-s, -s, -s), DVec3::new(s, -s, -s), DVec3::new(s, s, -s), DVec3::new(-s, s, -s),
        DVec3::new(-s, -s, s),  DVec3::new(s, -s, s),  DVec3::new(s, s, s),  DVec3::new(-s, s, s),
    ];

    let faces = vec![
        Face::quad([0, 1, 2, 3]), // back
        Face::quad([4, 5, 6, 7]), // front
        Face::quad([0, 1, 5, 4]), // bottom
        Face::quad([2, 3, 7, 6]), // top
        Face::quad([1, 2, 6, 5]), // right
        Face::quad([0, 3, 7, 4]), // left
    ];

    Ok(Mesh::from_generated(vertices, faces))
}

/// UV sphere with `segments + 1` latitude rings of `segments` samples each.
///
/// Both poles keep a full ring of coincident vertices, so the first and last band of quads are
/// zero-area.
///
/// Buffers are reserved up front; a segment count whose mesh cannot be allocated fails with
/// [`MeshError::TooLarge`] before any vertex is produced.
pub fn generate_sphere(radius: f64, segments: u32) -> Result<Mesh, ExportError> {
    check_sphere(radius, segments)?;
    let n = segments as usize;

    let too_large = || MeshError::TooLarge {
        vertices: (segments as u128 + 1) * segments as u128,
        faces: segments as u128 * segments as u128,
    };
    let vertex_count = n
        .checked_add(1)
        .and_then(|rings| rings.checked_mul(n))
        .ok_or_else(too_large)?;
    let face_count = n.checked_mul(n).ok_or_else(too_large)?;

    let mut vertices = Vec::new();
    vertices
        .try_reserve_exact(vertex_count)
        .map_err(|_| too_large())?;
    let mut faces = Vec::new();
    faces
        .try_reserve_exact(face_count)
        .map_err(|_| too_large())?;

    for i in 0..=n {
        let lat = PI * i as f64 / n as f64;
        for j in 0..n {
            let lon = 2.0 * PI * j as f64 / n as f64;
            vertices.push(DVec3::new(
                radius * lat.sin() * lon.cos(),
                radius * lat.sin() * lon.sin(),
                radius * lat.cos(),
            ));
        }
    }

    let at = |ring: usize, sample: usize| ring * n + sample % n;
    for i in 0..n {
        for j in 0..n {
            faces.push(Face::quad([
                at(i, j),
                at(i + 1, j),
                at(i + 1, j + 1),
                at(i, j + 1),
            ]));
        }
    }

    Ok(Mesh::from_generated(vertices, faces))
}
