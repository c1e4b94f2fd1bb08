//! Wavefront OBJ export.
//!
//! Only positions (`v`) and polygons (`f`) are written. Face indices are shifted to OBJ's
//! 1-based convention and keep the order they have in the mesh.

use std::io::{self, Write};

use crate::core::Mesh;

pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W) -> io::Result<()> {
    writer.write_all(obj_string(mesh).as_bytes())
}

pub fn obj_string(mesh: &Mesh) -> String {
    let mut output = String::new();

    for v in mesh.vertices() {
        output.push_str(&format!("v {} {} {}\n", v.x, v.y, v.z));
    }

    for face in mesh.faces() {
        output.push('f');
        for index in face.indices() {
            output.push_str(&format!(" {}", index + 1));
        }
        output.push('\n');
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::primitives::{generate_cube, generate_sphere};

    #[test]
    fn cube_lines() {
        let mesh = generate_cube(1.0).unwrap();
        let text = obj_string(&mesh);
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0], "v -0.5 -0.5 -0.5");
        assert_eq!(lines[6], "v 0.5 0.5 0.5");
        assert_eq!(lines[8], "f 1 2 3 4");
        assert_eq!(lines[10], "f 1 2 6 5");
        assert_eq!(lines[13], "f 1 4 8 5");
    }

    #[test]
    fn face_indices_are_one_based_and_in_range() {
        let mesh = generate_sphere(1.0, 5).unwrap();
        let text = obj_string(&mesh);

        let v_count = text.lines().filter(|l| l.starts_with("v ")).count();
        assert_eq!(v_count, mesh.vertex_count());

        for line in text.lines().filter(|l| l.starts_with("f ")) {
            for part in line.split_whitespace().skip(1) {
                let idx: usize = part.parse().unwrap();
                assert!((1..=v_count).contains(&idx), "index {idx} out of range");
            }
        }
    }

    #[test]
    fn output_is_deterministic() {
        let mesh = generate_sphere(1.5, 8).unwrap();
        assert_eq!(obj_string(&mesh), obj_string(&mesh));
    }

    #[test]
    fn vertex_text_round_trips_exactly() {
        let mesh = generate_sphere(1.0, 7).unwrap();
        let text = obj_string(&mesh);
        let parsed: Vec<[f64; 3]> = text
            .lines()
            .filter_map(|l| l.strip_prefix("v "))
            .map(|rest| {
                let mut it = rest.split_whitespace().map(|p| p.parse::<f64>().unwrap());
                [it.next().unwrap(), it.next().unwrap(), it.next().unwrap()]
            })
            .collect();

        assert_eq!(parsed.len(), mesh.vertex_count());
        for (p, v) in parsed.iter().zip(mesh.vertices()) {
            assert_eq!(*p, v.to_array());
        }
    }

    #[test]
    fn no_header_or_extras() {
        let text = obj_string(&generate_cube(3.0).unwrap());
        assert!(text
            .lines()
            .all(|l| l.starts_with("v ") || l.starts_with("f ")));
    }

    #[test]
    fn writer_matches_string() {
        let mesh = generate_sphere(1.0, 4).unwrap();
        let mut buf = Vec::new();
        write_obj(&mesh, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), obj_string(&mesh));
    }
}
