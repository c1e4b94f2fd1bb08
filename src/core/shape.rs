use std::fmt::{self, Display, Formatter};

use crate::error::ValidationError;

/// The primitives a description can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    #[default]
    Cube,
    Sphere,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Sphere => "sphere",
        }
    }
}

impl Display for ShapeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Picks a primitive for a free-text description.
///
/// Anything mentioning "sphere" in any letter case is a sphere. Everything else, blank input
/// included, falls back to a cube.
pub fn classify(description: &str) -> ShapeKind {
    if description.to_lowercase().contains("sphere") {
        ShapeKind::Sphere
    } else {
        ShapeKind::Cube
    }
}

/// Dimensions for one primitive. Build through [`ShapeParameters::cube`] or
/// [`ShapeParameters::sphere`] to get them checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeParameters {
    Cube { size: f64 },
    Sphere { radius: f64, segments: u32 },
}

impl ShapeParameters {
    pub fn cube(size: f64) -> Result<Self, ValidationError> {
        check_size(size)?;
        Ok(Self::Cube { size })
    }

    pub fn sphere(radius: f64, segments: u32) -> Result<Self, ValidationError> {
        check_sphere(radius, segments)?;
        Ok(Self::Sphere { radius, segments })
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeParameters::Cube { .. } => ShapeKind::Cube,
            ShapeParameters::Sphere { .. } => ShapeKind::Sphere,
        }
    }
}

pub(crate) fn check_size(size: f64) -> Result<(), ValidationError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveSize(size))
    }
}

pub(crate) fn check_sphere(radius: f64, segments: u32) -> Result<(), ValidationError> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(ValidationError::NonPositiveRadius(radius));
    }
    if segments < 1 {
        return Err(ValidationError::TooFewSegments(segments));
    }
    Ok(())
}

/// Caller-level defaults used when a description is turned into a concrete shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSettings {
    pub cube_size: f64,
    pub sphere_radius: f64,
    pub sphere_segments: u32,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            cube_size: 1.0,
            sphere_radius: 1.0,
            sphere_segments: 8,
        }
    }
}

impl ShapeSettings {
    pub fn parameters_for(&self, kind: ShapeKind) -> Result<ShapeParameters, ValidationError> {
        match kind {
            ShapeKind::Cube => ShapeParameters::cube(self.cube_size),
            ShapeKind::Sphere => ShapeParameters::sphere(self.sphere_radius, self.sphere_segments),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_size(self.cube_size)?;
        check_sphere(self.sphere_radius, self.sphere_segments)
    }
}
