//! Figure export: OBJ, binary STL and GLB
//!
//! Each part of a [`FigureAssembly`] stays a separately named object in the
//! output (OBJ `o` groups, glTF nodes); STL has no object concept and gets
//! a flat facet list.

#[cfg(feature = "glb")]
mod glb;
mod obj;
mod stl;

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use figure_core::FigureAssembly;
use tracing::{info, warn};

use crate::backend::BackendKind;
use crate::error::ExportError;
use crate::mesh::TriMesh;

#[cfg(feature = "glb")]
pub use glb::encode_glb;
pub use obj::write_obj;
pub use stl::write_stl;

/// Output file formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Obj,
    Stl,
    Glb,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Glb, ExportFormat::Obj, ExportFormat::Stl];

    /// File extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Obj => "obj",
            ExportFormat::Stl => "stl",
            ExportFormat::Glb => "glb",
        }
    }

    /// Format for a file extension (case-insensitive, no dot)
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Format implied by a path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether the encoder for this format was compiled in
    pub fn is_available(self) -> bool {
        match self {
            ExportFormat::Glb => cfg!(feature = "glb"),
            ExportFormat::Obj | ExportFormat::Stl => true,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("unknown format `{s}` (expected glb, obj or stl)"))
    }
}

/// Pick the export format: explicit choice first, then the path's extension.
///
/// The result must be one `backend` supports.
pub fn resolve_format(
    path: &Path,
    format: Option<ExportFormat>,
    backend: BackendKind,
) -> Result<ExportFormat, ExportError> {
    let format = match format {
        Some(format) => format,
        None => ExportFormat::from_path(path).ok_or_else(|| ExportError::UnknownExtension {
            path: path.to_path_buf(),
        })?,
    };

    if !backend.supports(format) {
        let supported: Vec<&str> = backend
            .supported_formats()
            .iter()
            .filter(|f| f.is_available())
            .map(|f| f.extension())
            .collect();
        return Err(ExportError::UnsupportedFormat {
            format,
            backend: backend.name(),
            supported: supported.join(", "),
        });
    }
    Ok(format)
}

/// Write a generated figure to `path`, returning the format used
pub fn export_figure(
    assembly: &FigureAssembly<TriMesh>,
    path: &Path,
    format: Option<ExportFormat>,
    backend: BackendKind,
) -> Result<ExportFormat, ExportError> {
    let format = resolve_format(path, format, backend)?;
    if assembly.part_count() == 0 {
        return Err(ExportError::EmptyAssembly);
    }

    #[cfg(not(feature = "glb"))]
    if format == ExportFormat::Glb {
        return Err(ExportError::UnsupportedFormat {
            format,
            backend: backend.name(),
            supported: "obj, stl".to_string(),
        });
    }

    write_file(path, |writer| {
        let io_error = |source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        };
        match format {
            ExportFormat::Obj => write_obj(assembly, writer).map_err(io_error),
            ExportFormat::Stl => write_stl(assembly, writer).map_err(io_error),
            #[cfg(feature = "glb")]
            ExportFormat::Glb => {
                let glb = encode_glb(assembly)?;
                writer.write_all(&glb).map_err(io_error)
            }
            #[cfg(not(feature = "glb"))]
            ExportFormat::Glb => Ok(()),
        }
    })?;

    let triangles: usize = assembly.iter().map(|p| p.mesh.triangle_count()).sum();
    info!(
        "Exported {} parts ({} triangles) as {} to {}",
        assembly.part_count(),
        triangles,
        format,
        path.display()
    );
    Ok(format)
}

/// Create `path` and fill it with `write`. A failed write removes the
/// partial file.
fn write_file<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<(), ExportError>,
{
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    let result = write(&mut writer).and_then(|()| {
        writer.flush().map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    });
    if result.is_err() {
        drop(writer);
        if let Err(err) = fs::remove_file(path) {
            warn!("Failed to remove partial export {}: {}", path.display(), err);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_write_removes_partial_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("figure.obj");

        let err = write_file(&path, |writer| {
            writer.write_all(b"o Head\n").unwrap();
            writer.flush().unwrap();
            Err(ExportError::Io {
                path: path.clone(),
                source: std::io::Error::other("disk full"),
            })
        })
        .unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
        assert!(!path.exists());

        write_file(&path, |writer| {
            writer.write_all(b"o Head\n").map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })
        })
        .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "o Head\n");
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ExportFormat::from_extension("OBJ"), Some(ExportFormat::Obj));
        assert_eq!(ExportFormat::from_extension("fbx"), None);
        assert_eq!(
            ExportFormat::from_path(Path::new("out/figure.glb")),
            Some(ExportFormat::Glb)
        );
        assert_eq!(ExportFormat::from_path(Path::new("figure")), None);
        assert_eq!("stl".parse::<ExportFormat>(), Ok(ExportFormat::Stl));
    }

    #[test]
    fn test_resolve_format() {
        let path = Path::new("figure.stl");
        assert_eq!(
            resolve_format(path, None, BackendKind::Faceted).unwrap(),
            ExportFormat::Stl
        );
        // Explicit format wins over the extension
        assert_eq!(
            resolve_format(path, Some(ExportFormat::Obj), BackendKind::Faceted).unwrap(),
            ExportFormat::Obj
        );
        assert!(matches!(
            resolve_format(Path::new("figure.glb"), None, BackendKind::Faceted),
            Err(ExportError::UnsupportedFormat { .. })
        ));
        assert!(matches!(
            resolve_format(Path::new("figure.blend"), None, BackendKind::Procedural),
            Err(ExportError::UnknownExtension { .. })
        ));
    }
}
