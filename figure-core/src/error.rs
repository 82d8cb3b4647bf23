//! Error taxonomy for figure configuration, layout and assembly.

use std::path::PathBuf;

/// Errors surfaced by the figure pipeline.
///
/// Every failure aborts the current operation; nothing here is recovered
/// locally or replaced with a default.
#[derive(Debug, thiserror::Error)]
pub enum FigureError {
    /// A proportion config violated one of its invariants.
    #[error("invalid config field `{field}`: {reason}")]
    ConfigValidation { field: String, reason: String },

    /// Arm angle outside `[0, 180]` degrees (or not a number).
    #[error("arm angle {value} is outside the supported range [0, 180] degrees")]
    InvalidPoseAngle { value: f64 },

    /// The primitive backend rejected a part's parameters.
    #[error("failed to construct part `{part_name}`: {cause}")]
    PartConstructionFailed {
        part_name: String,
        #[source]
        cause: PrimitiveError,
    },

    #[error("unknown preset `{name}` (available: {available})")]
    UnknownPreset { name: String, available: String },

    #[error("unknown pose `{name}` (available: {available})")]
    UnknownPose { name: String, available: String },

    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl FigureError {
    pub(crate) fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Reason a primitive backend refused to build a mesh.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PrimitiveError {
    /// A dimension was zero, negative or not finite.
    #[error("{dimension} must be a positive finite number, got {value}")]
    Degenerate { dimension: &'static str, value: f64 },

    /// The mesh would not fit the backend's index format.
    #[error("mesh needs {count} vertices, exceeding the limit of {max}")]
    IndexOverflow { count: usize, max: usize },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FigureError>;
