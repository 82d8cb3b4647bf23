//! Proportional layout and pose engine for humanoid base meshes
//!
//! Places ~20 primitive shapes (spheres, cylinders, boxes) according to
//! figure-drawing canons and a single arm-pose angle:
//! - ProportionConfig: validated measurements in head units
//! - layout_figure: config + arm angle to ordered PartPlacements
//! - PrimitiveAssembler: placements to meshes via a PrimitiveBackend
//! - FigureGenerator: layout and assembly in one call
//!
//! Mesh construction and file export live behind the [`PrimitiveBackend`]
//! seam; this crate performs no I/O besides config load/save and never logs.
//!
//! # Example
//!
//! ```
//! use figure_core::{layout_figure, preset};
//!
//! let config = preset("female_adult").unwrap();
//! let parts = layout_figure(&config, 45.0).unwrap();
//! assert_eq!(parts.len(), 21);
//! assert_eq!(parts[0].name, "Head");
//! ```

pub mod assembler;
pub mod backend;
pub mod config;
pub mod error;
pub mod layout;
pub mod placement;
pub mod presets;

pub use assembler::{AssembledPart, FigureAssembly, FigureGenerator, PrimitiveAssembler};
pub use backend::{PrimitiveBackend, check_dimension};
pub use config::{
    BoxPart, CylinderPart, FootPart, HandPart, Landmarks, PairedSpherePart, ProportionConfig,
    ProportionDraft, load_config, save_config,
};
pub use error::{FigureError, PrimitiveError, Result};
pub use layout::{ArmPose, LayoutEngine, MAX_ARM_ANGLE, expected_part_count, layout_figure};
pub use placement::{PartPlacement, ShapeKind, ShapeParams, Side};
pub use presets::{
    DEFAULT_POSE, DEFAULT_PRESET, NamedPose, POSES, pose_angle, pose_names, preset, preset_draft,
    preset_names,
};
