//! ASCII STL export.
//!
//! STL only knows triangles, so every face is fanned out from its first vertex before writing.
//! Facet normals are always written as `0 0 0`.

use std::io::{self, Write};

use crate::core::Mesh;

pub fn write_stl<W: Write>(mesh: &Mesh, name: &str, writer: &mut W) -> io::Result<()> {
    writer.write_all(stl_string(mesh, name).as_bytes())
}

pub fn stl_string(mesh: &Mesh, name: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("solid {name}\n"));
    for tri in mesh.triangles() {
        output.push_str("  facet normal 0 0 0\n");
        output.push_str("    outer loop\n");
        for v in tri {
            output.push_str(&format!("      vertex {} {} {}\n", v.x, v.y, v.z));
        }
        output.push_str("    endloop\n");
        output.push_str("  endfacet\n");
    }
    output.push_str(&format!("endsolid {name}\n"));

    output
}
