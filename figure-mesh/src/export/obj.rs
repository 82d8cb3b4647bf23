//! Wavefront OBJ writer

use std::io::{self, Write};

use figure_core::FigureAssembly;

use crate::mesh::TriMesh;

/// Write every part as its own `o` object with positions, normals and
/// `f v//vn` faces. OBJ indices are 1-based and global across objects.
pub fn write_obj<W: Write>(assembly: &FigureAssembly<TriMesh>, writer: &mut W) -> io::Result<()> {
    writeln!(writer, "# {}", assembly.config().name())?;
    writeln!(writer, "# arm angle: {} degrees", assembly.arm_angle())?;
    writeln!(writer, "# parts: {}", assembly.part_count())?;

    let mut base = 1usize;
    for part in assembly {
        let mesh = &part.mesh;
        writeln!(writer, "o {}", part.name)?;
        for [x, y, z] in &mesh.positions {
            writeln!(writer, "v {x:.6} {y:.6} {z:.6}")?;
        }
        for [x, y, z] in &mesh.normals {
            writeln!(writer, "vn {x:.6} {y:.6} {z:.6}")?;
        }
        for [a, b, c] in mesh.triangles() {
            let (a, b, c) = (a + base, b + base, c + base);
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        }
        base += mesh.vertex_count();
    }
    Ok(())
}
