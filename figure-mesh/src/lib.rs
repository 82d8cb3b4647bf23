//! Mesh backends and exporters for figure-core
//!
//! - Primitive generators (icosphere, capped cylinder, box) over a
//!   [`MeshBuilder`] seam
//! - Backends implementing [`figure_core::PrimitiveBackend`]:
//!   `procedural` (indexed) and `faceted` (un-welded), selected through
//!   [`BackendKind`]
//! - [`export_figure`]: OBJ, binary STL and (feature `glb`) GLB output
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use figure_core::FigureGenerator;
//! use figure_mesh::{BackendKind, export_figure};
//!
//! let kind = BackendKind::auto()?;
//! let generator = FigureGenerator::new(kind.create()?);
//! let figure = generator.generate_preset("female_adult", 45.0)?;
//! export_figure(&figure, Path::new("figure.obj"), None, kind)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backend;
pub mod error;
pub mod export;
pub mod mesh;
pub mod primitives;

#[cfg(feature = "faceted")]
pub use backend::FacetedBackend;
#[cfg(feature = "procedural")]
pub use backend::ProceduralBackend;
pub use backend::{BackendKind, DynBackend, available_backends};
pub use error::{BackendError, ExportError};
pub use export::{ExportFormat, export_figure, resolve_format, write_obj, write_stl};
pub use mesh::{FacetedMesh, MAX_VERTICES, MeshBuilder, TriMesh};
pub use primitives::{CYLINDER_SECTIONS, generate_box, generate_cylinder, generate_icosphere};
