//! Triangle mesh types
//!
//! Shared types for primitive generation: the [`MeshBuilder`] seam the
//! generators write through, the indexed [`TriMesh`] every backend hands
//! back, and the un-welding [`FacetedMesh`] builder.

use figure_core::PrimitiveError;
use glam::{DQuat, DVec3, Vec3};

/// Largest vertex count addressable by u16 indices
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// Trait for mesh construction - lets one generator fill different mesh layouts
pub trait MeshBuilder: Default {
    /// Add a vertex with position and normal, returning its index
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u16;

    /// Add a triangle using three vertex indices (CCW seen from outside)
    fn add_triangle(&mut self, i0: u16, i1: u16, i2: u16);

    /// Vertices this layout stores for a shape with the given counts
    fn vertices_needed(vertices: usize, _triangles: usize) -> usize {
        vertices
    }
}

/// Fail with `IndexOverflow` if a shape does not fit `M`'s u16 indices
pub fn check_capacity<M: MeshBuilder>(vertices: usize, triangles: usize) -> Result<(), PrimitiveError> {
    let count = M::vertices_needed(vertices, triangles);
    if count > MAX_VERTICES {
        return Err(PrimitiveError::IndexOverflow {
            count,
            max: MAX_VERTICES,
        });
    }
    Ok(())
}

// =============================================================================
// Transform
// =============================================================================

/// Rigid transform from a primitive's local frame into world space.
///
/// Generators work in f64 and narrow to f32 only when emitting vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub rotation: DQuat,
    pub translation: DVec3,
}

impl Transform {
    pub fn new(rotation: DQuat, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn from_translation(translation: DVec3) -> Self {
        Self::new(DQuat::IDENTITY, translation)
    }

    pub fn point(&self, local: DVec3) -> Vec3 {
        (self.rotation * local + self.translation).as_vec3()
    }

    pub fn normal(&self, local: DVec3) -> Vec3 {
        (self.rotation * local).normalize_or_zero().as_vec3()
    }
}

// =============================================================================
// Indexed mesh
// =============================================================================

/// Indexed triangle mesh in world space (f32, as written to disk)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// Triangle list, three indices per face
    pub indices: Vec<u16>,
}

impl TriMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertex indices of each triangle
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Corner positions of each triangle
    pub fn triangle_positions(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.triangles().map(|[a, b, c]| {
            [
                Vec3::from(self.positions[a]),
                Vec3::from(self.positions[b]),
                Vec3::from(self.positions[c]),
            ]
        })
    }

    /// Axis-aligned bounds as (min, max), `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = Vec3::from(*self.positions.first()?);
        Some(
            self.positions
                .iter()
                .map(|p| Vec3::from(*p))
                .fold((first, first), |(min, max), p| (min.min(p), max.max(p))),
        )
    }
}

impl MeshBuilder for TriMesh {
    fn add_vertex(&mut self, position: Vec3, normal: Vec3) -> u16 {
        let index = self.positions.len() as u16;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }

    fn add_triangle(&mut self, i0: u16, i1: u16, i2: u16) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }
}

/// Geometric normal of a triangle (zero for a degenerate one)
pub fn face_normal([a, b, c]: [Vec3; 3]) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

// =============================================================================
// Faceted mesh
// =============================================================================

/// Builder that un-welds every triangle into three fresh vertices carrying
/// the face normal, for flat shading and facet-based formats.
#[derive(Clone, Debug, Default)]
pub struct FacetedMesh {
    /// Vertices as the generator emitted them
    corners: Vec<Vec3>,
    mesh: TriMesh,
}

impl FacetedMesh {
    pub fn into_mesh(self) -> TriMesh {
        self.mesh
    }
}

impl MeshBuilder for FacetedMesh {
    fn add_vertex(&mut self, position: Vec3, _normal: Vec3) -> u16 {
        let index = self.corners.len() as u16;
        self.corners.push(position);
        index
    }

    fn add_triangle(&mut self, i0: u16, i1: u16, i2: u16) {
        let corners = [
            self.corners[i0 as usize],
            self.corners[i1 as usize],
            self.corners[i2 as usize],
        ];
        let normal = face_normal(corners);
        let a = self.mesh.add_vertex(corners[0], normal);
        let b = self.mesh.add_vertex(corners[1], normal);
        let c = self.mesh.add_vertex(corners[2], normal);
        self.mesh.add_triangle(a, b, c);
    }

    fn vertices_needed(_vertices: usize, triangles: usize) -> usize {
        triangles.saturating_mul(3)
    }
}
