//! Binary STL writer
//!
//! ```text
//! UINT8[80]    - Header
//! UINT32       - Number of triangles
//! foreach triangle
//!     REAL32[3] - Normal vector
//!     REAL32[3] - Vertex 1
//!     REAL32[3] - Vertex 2
//!     REAL32[3] - Vertex 3
//!     UINT16    - Attribute byte count (0)
//! end
//! ```

use std::io::{self, Write};

use figure_core::FigureAssembly;
use glam::Vec3;

use crate::mesh::{TriMesh, face_normal};

/// STL binary header size in bytes
pub const HEADER_SIZE: usize = 80;

/// Size of one triangle record (normal + 3 vertices + attribute)
pub const TRIANGLE_SIZE: usize = 50;

/// Write all parts as one binary STL facet list.
///
/// Facet normals are recomputed from the triangle corners.
pub fn write_stl<W: Write>(assembly: &FigureAssembly<TriMesh>, writer: &mut W) -> io::Result<()> {
    // Binary headers must not start with "solid" or readers take them for ASCII
    let mut header = [0u8; HEADER_SIZE];
    let title = format!("figure-mesh: {}", assembly.config().name());
    let len = title.len().min(HEADER_SIZE);
    header[..len].copy_from_slice(&title.as_bytes()[..len]);
    writer.write_all(&header)?;

    let count: usize = assembly.iter().map(|p| p.mesh.triangle_count()).sum();
    let count = u32::try_from(count)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many triangles for STL"))?;
    writer.write_all(&count.to_le_bytes())?;

    for part in assembly {
        for corners in part.mesh.triangle_positions() {
            write_vec3(writer, face_normal(corners))?;
            for corner in corners {
                write_vec3(writer, corner)?;
            }
            writer.write_all(&0u16.to_le_bytes())?;
        }
    }
    Ok(())
}

fn write_vec3<W: Write>(writer: &mut W, v: Vec3) -> io::Result<()> {
    for component in v.to_array() {
        writer.write_all(&component.to_le_bytes())?;
    }
    Ok(())
}
