//! Text serializers for generated meshes and the service that writes them to disk.
//!
//! - **OBJ**: `v` and `f` lines only, 1-based indices, faces kept as generated.
//! - **STL**: ASCII only, faces fanned into triangles, zero facet normals.

pub mod obj;
pub mod service;
pub mod stl;

use std::{
    fmt::{self, Display, Formatter},
    path::Path,
    str::FromStr,
};

pub use obj::{obj_string, write_obj};
pub use service::{
    CancellationToken, DiagnosticSink, ExportSummary, ExportTask, LogSink, ModelExportService,
};
pub use stl::{stl_string, write_stl};

use crate::core::{Mesh, ShapeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Obj,
    Stl,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Obj => "obj",
            OutputFormat::Stl => "stl",
        }
    }

    /// Format implied by a file extension, if it names one we write.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Renders `mesh` in this format. `kind` only names the STL solid.
    pub fn serialize(self, mesh: &Mesh, kind: ShapeKind) -> String {
        match self {
            OutputFormat::Obj => obj_string(mesh),
            OutputFormat::Stl => stl_string(mesh, kind.name()),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "obj" => Ok(OutputFormat::Obj),
            "stl" => Ok(OutputFormat::Stl),
            other => Err(format!("unknown output format `{other}`, expected `obj` or `stl`")),
        }
    }
}
