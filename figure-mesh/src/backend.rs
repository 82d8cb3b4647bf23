//! Concrete primitive backends and the backend registry
//!
//! Backends available in this build are decided by cargo features:
//! - `procedural`: indexed, smooth-shaded meshes (exports glb, obj, stl)
//! - `faceted`: un-welded flat-shaded triangles (exports obj, stl)

use std::fmt;
use std::str::FromStr;

use figure_core::{PrimitiveBackend, PrimitiveError};
use glam::{DQuat, DVec3};
use tracing::debug;

use crate::error::BackendError;
use crate::export::ExportFormat;
#[cfg(feature = "faceted")]
use crate::mesh::FacetedMesh;
use crate::mesh::TriMesh;
use crate::primitives::{CYLINDER_SECTIONS, generate_box, generate_cylinder, generate_icosphere};

/// Boxed backend producing [`TriMesh`]es, as returned by [`BackendKind::create`]
pub type DynBackend = Box<dyn PrimitiveBackend<Mesh = TriMesh> + Send + Sync>;

// =============================================================================
// Registry
// =============================================================================

/// Known backends, in auto-selection priority order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Procedural,
    Faceted,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::Procedural, BackendKind::Faceted];

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Procedural => "procedural",
            BackendKind::Faceted => "faceted",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BackendKind::Procedural => "Indexed smooth-shaded meshes",
            BackendKind::Faceted => "Flat-shaded un-welded triangles",
        }
    }

    /// Parse a backend name (case-insensitive)
    pub fn from_name(name: &str) -> Result<Self, BackendError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| BackendError::Unknown {
                name: name.to_string(),
            })
    }

    /// Whether this backend was compiled in
    pub fn is_available(self) -> bool {
        match self {
            BackendKind::Procedural => cfg!(feature = "procedural"),
            BackendKind::Faceted => cfg!(feature = "faceted"),
        }
    }

    /// Highest-priority available backend
    pub fn auto() -> Result<Self, BackendError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.is_available())
            .ok_or_else(|| BackendError::Unavailable {
                name: "auto".to_string(),
                available: "none".to_string(),
            })
    }

    /// Formats this backend can export
    pub fn supported_formats(self) -> &'static [ExportFormat] {
        match self {
            BackendKind::Procedural => &[ExportFormat::Glb, ExportFormat::Obj, ExportFormat::Stl],
            BackendKind::Faceted => &[ExportFormat::Obj, ExportFormat::Stl],
        }
    }

    pub fn supports(self, format: ExportFormat) -> bool {
        self.supported_formats().contains(&format) && format.is_available()
    }

    /// Instantiate the backend
    pub fn create(self) -> Result<DynBackend, BackendError> {
        debug!("creating {} backend", self.name());
        match self {
            #[cfg(feature = "procedural")]
            BackendKind::Procedural => Ok(Box::new(ProceduralBackend::new())),
            #[cfg(feature = "faceted")]
            BackendKind::Faceted => Ok(Box::new(FacetedBackend::new())),
            #[allow(unreachable_patterns)]
            _ => Err(BackendError::Unavailable {
                name: self.name().to_string(),
                available: available_names(),
            }),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BackendKind {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Backends compiled into this build, in priority order
pub fn available_backends() -> Vec<BackendKind> {
    BackendKind::ALL
        .into_iter()
        .filter(|kind| kind.is_available())
        .collect()
}

fn available_names() -> String {
    let names: Vec<&str> = available_backends().into_iter().map(BackendKind::name).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

// =============================================================================
// Procedural backend
// =============================================================================

/// Indexed meshes with shared smooth normals on curved surfaces
#[cfg(feature = "procedural")]
#[derive(Clone, Copy, Debug)]
pub struct ProceduralBackend {
    cylinder_sections: u32,
}

#[cfg(feature = "procedural")]
impl Default for ProceduralBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "procedural")]
impl ProceduralBackend {
    pub fn new() -> Self {
        Self {
            cylinder_sections: CYLINDER_SECTIONS,
        }
    }

    /// Override the radial section count (minimum 3)
    pub fn with_cylinder_sections(mut self, sections: u32) -> Self {
        self.cylinder_sections = sections.max(3);
        self
    }
}

#[cfg(feature = "procedural")]
impl PrimitiveBackend for ProceduralBackend {
    type Mesh = TriMesh;

    fn name(&self) -> &'static str {
        BackendKind::Procedural.name()
    }

    fn make_sphere(
        &self,
        radius: f64,
        center: DVec3,
        subdivisions: u32,
    ) -> Result<TriMesh, PrimitiveError> {
        generate_icosphere(radius, center, subdivisions)
    }

    fn make_cylinder(
        &self,
        radius: f64,
        length: f64,
        start: DVec3,
        orientation: DQuat,
    ) -> Result<TriMesh, PrimitiveError> {
        generate_cylinder(radius, length, start, orientation, self.cylinder_sections)
    }

    fn make_box(
        &self,
        width: f64,
        height: f64,
        depth: f64,
        center: DVec3,
        orientation: DQuat,
    ) -> Result<TriMesh, PrimitiveError> {
        generate_box(width, height, depth, center, orientation)
    }
}

// =============================================================================
// Faceted backend
// =============================================================================

/// Same shapes as the procedural backend, un-welded with per-face normals
#[cfg(feature = "faceted")]
#[derive(Clone, Copy, Debug, Default)]
pub struct FacetedBackend;

#[cfg(feature = "faceted")]
impl FacetedBackend {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "faceted")]
impl PrimitiveBackend for FacetedBackend {
    type Mesh = TriMesh;

    fn name(&self) -> &'static str {
        BackendKind::Faceted.name()
    }

    fn make_sphere(
        &self,
        radius: f64,
        center: DVec3,
        subdivisions: u32,
    ) -> Result<TriMesh, PrimitiveError> {
        generate_icosphere::<FacetedMesh>(radius, center, subdivisions).map(FacetedMesh::into_mesh)
    }

    fn make_cylinder(
        &self,
        radius: f64,
        length: f64,
        start: DVec3,
        orientation: DQuat,
    ) -> Result<TriMesh, PrimitiveError> {
        generate_cylinder::<FacetedMesh>(radius, length, start, orientation, CYLINDER_SECTIONS)
            .map(FacetedMesh::into_mesh)
    }

    fn make_box(
        &self,
        width: f64,
        height: f64,
        depth: f64,
        center: DVec3,
        orientation: DQuat,
    ) -> Result<TriMesh, PrimitiveError> {
        generate_box::<FacetedMesh>(width, height, depth, center, orientation)
            .map(FacetedMesh::into_mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(BackendKind::from_name("procedural"), Ok(BackendKind::Procedural));
        assert_eq!(BackendKind::from_name("Faceted"), Ok(BackendKind::Faceted));
        assert_eq!(
            "blender".parse::<BackendKind>(),
            Err(BackendError::Unknown {
                name: "blender".to_string()
            })
        );
    }

    #[test]
    fn test_auto_prefers_procedural() {
        if cfg!(feature = "procedural") {
            assert_eq!(BackendKind::auto(), Ok(BackendKind::Procedural));
        }
        assert_eq!(BackendKind::auto().is_ok(), !available_backends().is_empty());
    }

    #[test]
    fn test_supported_formats() {
        assert!(!BackendKind::Faceted.supports(ExportFormat::Glb));
        assert!(BackendKind::Faceted.supports(ExportFormat::Stl));
        assert_eq!(
            BackendKind::Procedural.supports(ExportFormat::Glb),
            cfg!(feature = "glb")
        );
    }

    #[cfg(feature = "procedural")]
    #[test]
    fn test_procedural_sphere() {
        let backend = BackendKind::Procedural.create().unwrap();
        assert_eq!(backend.name(), "procedural");
        let mesh = backend.make_sphere(0.5, DVec3::ZERO, 1).unwrap();
        assert_eq!(mesh.vertex_count(), 42);
    }

    #[cfg(feature = "faceted")]
    #[test]
    fn test_faceted_cylinder() {
        let backend = FacetedBackend::new();
        let mesh = backend
            .make_cylinder(0.1, 1.0, DVec3::ZERO, DQuat::IDENTITY)
            .unwrap();
        assert_eq!(mesh.vertex_count(), mesh.triangle_count() * 3);
        assert_eq!(mesh.triangle_count(), 4 * CYLINDER_SECTIONS as usize);
    }

    #[cfg(feature = "procedural")]
    #[test]
    fn test_custom_sections() {
        let backend = ProceduralBackend::new().with_cylinder_sections(8);
        let mesh = backend
            .make_cylinder(0.1, 1.0, DVec3::ZERO, DQuat::IDENTITY)
            .unwrap();
        assert_eq!(mesh.vertex_count(), 4 * 8 + 2);
    }
}
