mod face;
mod mesh;

pub use face::Face;
pub use mesh::{Mesh, Vertex};
