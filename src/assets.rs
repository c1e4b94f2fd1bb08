//! Models shipped inside the binary.

use std::{fs, path::PathBuf};

use log::debug;

use crate::core::Mesh;
use crate::error::ExportError;

pub const DEFAULT_MODEL: &str = "default_model.obj";

const BUNDLED: &[(&str, &str)] = &[(
    DEFAULT_MODEL,
    include_str!("../assets/default_model.obj"),
)];

/// Extracts bundled assets to disk so callers can hand out a plain file path.
#[derive(Debug, Clone)]
pub struct BundledAssets {
    dir: PathBuf,
}

impl Default for BundledAssets {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

impl BundledAssets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        BUNDLED.iter().map(|(name, _)| *name)
    }

    /// Writes the asset `name` into the asset directory and returns where it landed.
    pub fn fetch(&self, name: &str) -> Result<PathBuf, ExportError> {
        let contents = BUNDLED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, c)| *c)
            .ok_or_else(|| ExportError::Resource {
                name: name.to_owned(),
                reason: "no bundled asset with that name".to_owned(),
            })?;

        let path = self.dir.join(name);
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&path, contents))
            .map_err(|e| ExportError::Resource {
                name: name.to_owned(),
                reason: format!("could not extract to `{}`: {e}", path.display()),
            })?;

        debug!("extracted bundled asset {name} to {}", path.display());
        Ok(path)
    }

    pub fn default_model(&self) -> Result<PathBuf, ExportError> {
        self.fetch(DEFAULT_MODEL)
    }

    /// Extracts and parses the default model.
    pub fn load_default_model(&self) -> Result<Mesh, ExportError> {
        let path = self.default_model()?;
        Ok(Mesh::from_obj(&path)?)
    }
}
