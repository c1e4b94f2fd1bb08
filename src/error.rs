use std::{io, path::PathBuf};

use thiserror::Error;

/// Rejected input, detected before any geometry or file work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("output path is required")]
    BlankOutputPath,
    #[error("cube size must be a positive finite number, got {0}")]
    NonPositiveSize(f64),
    #[error("sphere radius must be a positive finite number, got {0}")]
    NonPositiveRadius(f64),
    #[error("sphere needs at least 1 segment, got {0}")]
    TooFewSegments(u32),
}

/// A mesh whose faces do not fit its vertex buffer, or an OBJ file that could not be read as one.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("face {face} references vertex {index}, but the mesh only has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
    #[error("face {face} has {len} indices, a face needs at least 3")]
    DegenerateFace { face: usize, len: usize },
    #[error("a mesh of {vertices} vertices and {faces} faces cannot be allocated")]
    TooLarge { vertices: u128, faces: u128 },
    #[error("failed to load OBJ `{path}`: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid export request: {0}")]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("failed to write `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("bundled asset `{name}` is unavailable: {reason}")]
    Resource { name: String, reason: String },
    #[error("export to `{0}` was cancelled")]
    Cancelled(PathBuf),
    #[error("export worker stopped before reporting a result")]
    WorkerLost,
}

impl ExportError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
