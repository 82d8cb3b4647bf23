//! Backend selection and export errors

use std::path::PathBuf;

use crate::export::ExportFormat;

/// Backend registry failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Known backend that was not compiled into this build
    #[error("backend `{name}` is not available in this build (available: {available})")]
    Unavailable { name: String, available: String },

    #[error("unknown backend `{name}` (known: procedural, faceted)")]
    Unknown { name: String },
}

/// Export failures
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("backend `{backend}` cannot export {format} (supported: {supported})")]
    UnsupportedFormat {
        format: ExportFormat,
        backend: &'static str,
        supported: String,
    },

    #[error("cannot infer export format from {path:?}; use .obj, .stl or .glb")]
    UnknownExtension { path: PathBuf },

    #[error("figure has no parts to export")]
    EmptyAssembly,

    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "glb")]
    #[error("failed to serialize glTF document: {0}")]
    Gltf(#[from] serde_json::Error),
}
