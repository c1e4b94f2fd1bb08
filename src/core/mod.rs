pub mod geometry;
pub mod primitives;
pub mod shape;

pub use geometry::{Face, Mesh, Vertex};
pub use shape::{classify, ShapeKind, ShapeParameters, ShapeSettings};
