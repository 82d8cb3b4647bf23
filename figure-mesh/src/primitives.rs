//! Primitive generators: icosphere, capped cylinder, box
//!
//! Every generator validates its dimensions, checks the result fits the
//! builder's u16 indices, then emits world-space vertices through
//! [`MeshBuilder`]. Winding is counter-clockwise seen from outside.

use std::f64::consts::TAU;

use figure_core::{PrimitiveError, check_dimension};
use glam::{DQuat, DVec3};
use hashbrown::HashMap;

use crate::mesh::{MeshBuilder, Transform, check_capacity};

/// Radial sections around a cylinder
pub const CYLINDER_SECTIONS: u32 = 16;

// =============================================================================
// Icosphere
// =============================================================================

/// Golden ratio
const PHI: f64 = 1.618_033_988_749_895;

const ICOSAHEDRON_VERTICES: [[f64; 3]; 12] = [
    [-1.0, PHI, 0.0],
    [1.0, PHI, 0.0],
    [-1.0, -PHI, 0.0],
    [1.0, -PHI, 0.0],
    [0.0, -1.0, PHI],
    [0.0, 1.0, PHI],
    [0.0, -1.0, -PHI],
    [0.0, 1.0, -PHI],
    [PHI, 0.0, -1.0],
    [PHI, 0.0, 1.0],
    [-PHI, 0.0, -1.0],
    [-PHI, 0.0, 1.0],
];

const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Vertex and triangle counts of an icosphere at `subdivisions`
/// (`10 * 4^n + 2` and `20 * 4^n`), saturating on overflow
pub fn icosphere_counts(subdivisions: u32) -> (usize, usize) {
    let scale = 4usize.checked_pow(subdivisions).unwrap_or(usize::MAX);
    (
        scale.saturating_mul(10).saturating_add(2),
        scale.saturating_mul(20),
    )
}

/// Geodesic sphere built by repeatedly splitting an icosahedron.
///
/// Level 0 has 12 vertices; each level roughly quadruples that
/// (42, 162, 642, ...). Normals point radially outward.
pub fn generate_icosphere<M: MeshBuilder>(
    radius: f64,
    center: DVec3,
    subdivisions: u32,
) -> Result<M, PrimitiveError> {
    check_dimension("radius", radius)?;
    let (vertex_count, triangle_count) = icosphere_counts(subdivisions);
    check_capacity::<M>(vertex_count, triangle_count)?;

    let mut vertices: Vec<DVec3> = ICOSAHEDRON_VERTICES
        .iter()
        .map(|v| DVec3::from_array(*v).normalize())
        .collect();
    let mut faces = ICOSAHEDRON_FACES.to_vec();

    for _ in 0..subdivisions {
        faces = subdivide(&mut vertices, &faces);
    }

    let transform = Transform::from_translation(center);
    let mut mesh = M::default();
    let indices: Vec<u16> = vertices
        .iter()
        .map(|unit| mesh.add_vertex(transform.point(*unit * radius), transform.normal(*unit)))
        .collect();
    for [a, b, c] in faces {
        mesh.add_triangle(indices[a as usize], indices[b as usize], indices[c as usize]);
    }

    Ok(mesh)
}

/// Split every face into four, sharing edge midpoints projected onto the unit sphere
fn subdivide(vertices: &mut Vec<DVec3>, faces: &[[u32; 3]]) -> Vec<[u32; 3]> {
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::with_capacity(faces.len() * 3 / 2);
    let mut midpoint = |a: u32, b: u32| -> u32 {
        let key = (a.min(b), a.max(b));
        *midpoints.entry(key).or_insert_with(|| {
            let mid = (vertices[a as usize] + vertices[b as usize]).normalize();
            vertices.push(mid);
            (vertices.len() - 1) as u32
        })
    };

    let mut next = Vec::with_capacity(faces.len() * 4);
    for &[a, b, c] in faces {
        let ab = midpoint(a, b);
        let bc = midpoint(b, c);
        let ca = midpoint(c, a);
        next.push([a, ab, ca]);
        next.push([b, bc, ab]);
        next.push([c, ca, bc]);
        next.push([ab, bc, ca]);
    }
    next
}

// =============================================================================
// Cylinder
// =============================================================================

/// Capped cylinder with its base center at `start`, extending `length` along
/// `orientation * -Y`.
///
/// The side shares one smooth-shaded vertex per ring position; each cap has
/// its own ring so its normal stays flat.
pub fn generate_cylinder<M: MeshBuilder>(
    radius: f64,
    length: f64,
    start: DVec3,
    orientation: DQuat,
    sections: u32,
) -> Result<M, PrimitiveError> {
    check_dimension("radius", radius)?;
    check_dimension("length", length)?;
    let sections = sections.max(3);
    let n = sections as usize;
    // Side rings plus two capped rings with centers
    check_capacity::<M>(4 * n + 2, 4 * n)?;

    let transform = Transform::new(orientation, start);
    let mut mesh = M::default();

    let ring = |i: u32| {
        let theta = i as f64 / sections as f64 * TAU;
        DVec3::new(theta.cos(), 0.0, theta.sin())
    };
    let top_y = 0.0;
    let bottom_y = -length;

    // Side: (bottom, top) pairs
    let mut side = Vec::with_capacity(2 * n);
    for i in 0..sections {
        let dir = ring(i);
        let normal = transform.normal(dir);
        let bottom = DVec3::new(dir.x * radius, bottom_y, dir.z * radius);
        let top = DVec3::new(dir.x * radius, top_y, dir.z * radius);
        side.push(mesh.add_vertex(transform.point(bottom), normal));
        side.push(mesh.add_vertex(transform.point(top), normal));
    }
    for i in 0..n {
        let next = (i + 1) % n;
        let (b0, t0) = (side[2 * i], side[2 * i + 1]);
        let (b1, t1) = (side[2 * next], side[2 * next + 1]);
        mesh.add_triangle(b0, t0, t1);
        mesh.add_triangle(b0, t1, b1);
    }

    // Caps
    for (y, up) in [(top_y, true), (bottom_y, false)] {
        let local_normal = if up { DVec3::Y } else { DVec3::NEG_Y };
        let normal = transform.normal(local_normal);
        let center = mesh.add_vertex(transform.point(DVec3::new(0.0, y, 0.0)), normal);
        let rim: Vec<u16> = (0..sections)
            .map(|i| {
                let dir = ring(i);
                let p = DVec3::new(dir.x * radius, y, dir.z * radius);
                mesh.add_vertex(transform.point(p), normal)
            })
            .collect();
        for i in 0..n {
            let next = (i + 1) % n;
            if up {
                mesh.add_triangle(center, rim[next], rim[i]);
            } else {
                mesh.add_triangle(center, rim[i], rim[next]);
            }
        }
    }

    Ok(mesh)
}

// =============================================================================
// Box
// =============================================================================

/// Outward normal of each face with two in-plane axes (`u x v == normal`)
const BOX_FACES: [(DVec3, DVec3, DVec3); 6] = [
    (DVec3::X, DVec3::Y, DVec3::Z),
    (DVec3::NEG_X, DVec3::Z, DVec3::Y),
    (DVec3::Y, DVec3::Z, DVec3::X),
    (DVec3::NEG_Y, DVec3::X, DVec3::Z),
    (DVec3::Z, DVec3::X, DVec3::Y),
    (DVec3::NEG_Z, DVec3::Y, DVec3::X),
];

/// Box centered at `center` with `width`, `height` and `depth` along the
/// rotated local X, Y and Z axes. 24 vertices: four per face, each face
/// with its own normal.
pub fn generate_box<M: MeshBuilder>(
    width: f64,
    height: f64,
    depth: f64,
    center: DVec3,
    orientation: DQuat,
) -> Result<M, PrimitiveError> {
    check_dimension("width", width)?;
    check_dimension("height", height)?;
    check_dimension("depth", depth)?;
    check_capacity::<M>(24, 12)?;

    let half = DVec3::new(width, height, depth) * 0.5;
    let transform = Transform::new(orientation, center);
    let mut mesh = M::default();

    for (normal, u, v) in BOX_FACES {
        let n = normal * half.dot(normal.abs());
        let u = u * half.dot(u);
        let v = v * half.dot(v);
        let world_normal = transform.normal(normal);
        let corners = [n - u - v, n + u - v, n + u + v, n - u + v]
            .map(|corner| mesh.add_vertex(transform.point(corner), world_normal));
        mesh.add_triangle(corners[0], corners[1], corners[2]);
        mesh.add_triangle(corners[0], corners[2], corners[3]);
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{FacetedMesh, TriMesh, face_normal};
    use glam::Vec3;

    /// Every face normal should point away from `inside`
    fn assert_outward(mesh: &TriMesh, inside: Vec3) {
        for tri in mesh.triangle_positions() {
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            let normal = face_normal(tri);
            assert!(
                normal.dot(centroid - inside) > 0.0,
                "inward face at {centroid:?}"
            );
        }
    }

    #[test]
    fn test_icosphere_vertex_counts() {
        for (level, expected) in [(0, 12), (1, 42), (2, 162), (3, 642)] {
            let mesh: TriMesh = generate_icosphere(1.0, DVec3::ZERO, level).unwrap();
            assert_eq!(mesh.vertex_count(), expected, "level {level}");
            assert_eq!(mesh.triangle_count(), 20 * 4usize.pow(level));
            assert_eq!(icosphere_counts(level).0, expected);
        }
    }

    #[test]
    fn test_icosphere_on_surface() {
        let center = DVec3::new(0.0, 6.5, 0.0);
        let mesh: TriMesh = generate_icosphere(0.5, center, 2).unwrap();
        let c = center.as_vec3();
        for p in &mesh.positions {
            assert!(((Vec3::from(*p) - c).length() - 0.5).abs() < 1e-5);
        }
        assert_outward(&mesh, c);
    }

    #[test]
    fn test_icosphere_overflow() {
        let err = generate_icosphere::<TriMesh>(1.0, DVec3::ZERO, 7).unwrap_err();
        assert_eq!(
            err,
            PrimitiveError::IndexOverflow {
                count: 163_842,
                max: 65_536
            }
        );
        assert!(generate_icosphere::<TriMesh>(1.0, DVec3::ZERO, u32::MAX).is_err());
        // Un-welded meshes run out one level earlier
        assert!(generate_icosphere::<FacetedMesh>(1.0, DVec3::ZERO, 6).is_err());
    }

    #[test]
    fn test_faceted_icosphere_saturated_counts() {
        // Triangle count saturates from level 30 on
        for level in [30, u32::MAX] {
            let err = generate_icosphere::<FacetedMesh>(1.0, DVec3::ZERO, level).unwrap_err();
            assert_eq!(
                err,
                PrimitiveError::IndexOverflow {
                    count: usize::MAX,
                    max: 65_536
                }
            );
        }
    }

    #[test]
    fn test_cylinder_extends_along_negative_y() {
        let start = DVec3::new(0.0, 3.0, 0.0);
        let mesh: TriMesh =
            generate_cylinder(0.2, 1.5, start, DQuat::IDENTITY, CYLINDER_SECTIONS).unwrap();
        assert_eq!(mesh.vertex_count(), 4 * 16 + 2);
        assert_eq!(mesh.triangle_count(), 4 * 16);

        let (min, max) = mesh.bounds().unwrap();
        assert!((max.y - 3.0).abs() < 1e-6);
        assert!((min.y - 1.5).abs() < 1e-6);
        assert!((max.x - 0.2).abs() < 1e-6);
        assert_outward(&mesh, Vec3::new(0.0, 2.25, 0.0));
    }

    #[test]
    fn test_cylinder_rotated() {
        // T-pose arm: -Y rotated onto +X
        let orientation = DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2);
        let mesh: TriMesh =
            generate_cylinder(0.1, 2.0, DVec3::ZERO, orientation, CYLINDER_SECTIONS).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert!(min.x.abs() < 1e-6);
        assert!((max.x - 2.0).abs() < 1e-6);
        assert_outward(&mesh, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_box_layout() {
        let center = DVec3::new(1.0, 2.0, 3.0);
        let mesh: TriMesh = generate_box(1.0, 2.0, 0.5, center, DQuat::IDENTITY).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);

        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Vec3::new(0.5, 1.0, 2.75));
        assert_eq!(max, Vec3::new(1.5, 3.0, 3.25));
        assert_outward(&mesh, center.as_vec3());
    }

    #[test]
    fn test_degenerate_dimensions() {
        assert_eq!(
            generate_box::<TriMesh>(1.0, 0.0, 1.0, DVec3::ZERO, DQuat::IDENTITY),
            Err(PrimitiveError::Degenerate {
                dimension: "height",
                value: 0.0
            })
        );
        assert!(
            generate_cylinder::<TriMesh>(f64::NAN, 1.0, DVec3::ZERO, DQuat::IDENTITY, 16).is_err()
        );
        assert!(generate_icosphere::<TriMesh>(-1.0, DVec3::ZERO, 1).is_err());
    }

    #[test]
    fn test_faceted_box() {
        let mesh = generate_box::<FacetedMesh>(1.0, 1.0, 1.0, DVec3::ZERO, DQuat::IDENTITY)
            .unwrap()
            .into_mesh();
        assert_eq!(mesh.vertex_count(), 36);
        assert_outward(&mesh, Vec3::ZERO);
    }
}
