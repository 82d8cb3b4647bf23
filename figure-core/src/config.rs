//! Figure proportion configuration
//!
//! A figure is described in "head units": every linear measurement except
//! `head_radius` is a multiple of the head height (`2 * head_radius`).
//!
//! Two types describe the same document:
//! - [`ProportionDraft`]: plain, unvalidated record (what JSON deserializes into)
//! - [`ProportionConfig`]: validated, immutable view consumed by the layout engine
//!
//! Validation happens exactly once, in `ProportionConfig::try_from(draft)`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FigureError, Result};

// =============================================================================
// Part records
// =============================================================================

/// Cylindrical part (neck, abdomen, arm and leg segments)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CylinderPart {
    pub radius: f64,
    pub length: f64,
}

/// Box-shaped torso part (ribcage, pelvis)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxPart {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Paired spherical part placed relative to a torso box and mirrored in X
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairedSpherePart {
    pub radius: f64,
    /// Lateral offset of the left instance (the right one is mirrored)
    pub offset_x: f64,
    /// Vertical offset from the anchoring landmark
    pub offset_y: f64,
    /// Forward (+Z) or backward (-Z) projection
    pub offset_z: f64,
}

/// Hand box, extending along the arm direction
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HandPart {
    pub width: f64,
    pub length: f64,
    pub depth: f64,
}

/// Foot box, extending forward from the ankle
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FootPart {
    pub width: f64,
    pub height: f64,
    pub length: f64,
}

/// Vertical positions (head units above the ground) of the torso landmarks.
///
/// Must be strictly decreasing from shoulder to crotch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmarks {
    pub shoulder_y: f64,
    pub bust_y: f64,
    pub waist_y: f64,
    pub pelvis_y: f64,
    pub crotch_y: f64,
}

impl Landmarks {
    /// Landmarks in top-to-bottom order with their field names
    pub fn ordered(&self) -> [(&'static str, f64); 5] {
        [
            ("shoulder_y", self.shoulder_y),
            ("bust_y", self.bust_y),
            ("waist_y", self.waist_y),
            ("pelvis_y", self.pelvis_y),
            ("crotch_y", self.crotch_y),
        ]
    }
}

// =============================================================================
// Draft (unvalidated)
// =============================================================================

/// Unvalidated figure description, field-for-field the JSON document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProportionDraft {
    /// Human-readable name (e.g. "Adult Female")
    pub name: String,
    /// Figure height in head units
    pub total_heads: f64,
    /// Head sphere radius in world units; one head unit is twice this
    pub head_radius: f64,
    /// Icosphere subdivision level for spherical parts
    pub subdivisions: i64,

    pub neck: CylinderPart,
    pub ribcage: BoxPart,
    /// Absent for figures without breast geometry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breasts: Option<PairedSpherePart>,
    pub abdomen: CylinderPart,
    pub pelvis: BoxPart,
    pub glutes: PairedSpherePart,

    pub upper_arm: CylinderPart,
    pub forearm: CylinderPart,
    pub hand: HandPart,
    pub thigh: CylinderPart,
    pub calf: CylinderPart,
    pub foot: FootPart,

    /// Distance between the left and right shoulder joints
    pub shoulder_width: f64,
    /// Distance between the left and right hip joints
    pub hip_width: f64,
    pub landmarks: Landmarks,
}

// =============================================================================
// Validated config
// =============================================================================

/// Validated, immutable figure proportions.
///
/// Can only be obtained through `TryFrom<ProportionDraft>` (directly, via
/// deserialization, or from the preset table), so every instance satisfies
/// all invariants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProportionDraft", into = "ProportionDraft")]
pub struct ProportionConfig {
    draft: ProportionDraft,
}

impl TryFrom<ProportionDraft> for ProportionConfig {
    type Error = FigureError;

    fn try_from(draft: ProportionDraft) -> Result<Self> {
        validate(&draft)?;
        Ok(Self { draft })
    }
}

impl From<ProportionConfig> for ProportionDraft {
    fn from(config: ProportionConfig) -> Self {
        config.draft
    }
}

impl ProportionConfig {
    /// Parse and validate a JSON document.
    ///
    /// Malformed JSON or missing fields fail with [`FigureError::Json`];
    /// invariant violations fail with [`FigureError::ConfigValidation`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let draft: ProportionDraft = serde_json::from_str(json)?;
        Self::try_from(draft)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.draft)?)
    }

    /// The underlying record (for editing into a new draft)
    pub fn draft(&self) -> &ProportionDraft {
        &self.draft
    }

    pub fn name(&self) -> &str {
        &self.draft.name
    }

    pub fn total_heads(&self) -> f64 {
        self.draft.total_heads
    }

    pub fn head_radius(&self) -> f64 {
        self.draft.head_radius
    }

    /// World size of one head unit
    pub fn head_unit(&self) -> f64 {
        2.0 * self.draft.head_radius
    }

    pub fn subdivisions(&self) -> u32 {
        // Range checked in validate()
        self.draft.subdivisions as u32
    }

    pub fn neck(&self) -> &CylinderPart {
        &self.draft.neck
    }

    pub fn ribcage(&self) -> &BoxPart {
        &self.draft.ribcage
    }

    pub fn breasts(&self) -> Option<&PairedSpherePart> {
        self.draft.breasts.as_ref()
    }

    pub fn abdomen(&self) -> &CylinderPart {
        &self.draft.abdomen
    }

    pub fn pelvis(&self) -> &BoxPart {
        &self.draft.pelvis
    }

    pub fn glutes(&self) -> &PairedSpherePart {
        &self.draft.glutes
    }

    pub fn upper_arm(&self) -> &CylinderPart {
        &self.draft.upper_arm
    }

    pub fn forearm(&self) -> &CylinderPart {
        &self.draft.forearm
    }

    pub fn hand(&self) -> &HandPart {
        &self.draft.hand
    }

    pub fn thigh(&self) -> &CylinderPart {
        &self.draft.thigh
    }

    pub fn calf(&self) -> &CylinderPart {
        &self.draft.calf
    }

    pub fn foot(&self) -> &FootPart {
        &self.draft.foot
    }

    pub fn shoulder_width(&self) -> f64 {
        self.draft.shoulder_width
    }

    pub fn hip_width(&self) -> f64 {
        self.draft.hip_width
    }

    pub fn landmarks(&self) -> &Landmarks {
        &self.draft.landmarks
    }
}

/// Load a config from a JSON file
pub fn load_config(path: &Path) -> Result<ProportionConfig> {
    let json = fs::read_to_string(path).map_err(|source| FigureError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ProportionConfig::from_json_str(&json)
}

/// Save a config as a pretty-printed JSON file
pub fn save_config(config: &ProportionConfig, path: &Path) -> Result<()> {
    let json = config.to_json_string()?;
    fs::write(path, json).map_err(|source| FigureError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// Validation
// =============================================================================

fn positive(field: &str, value: f64) -> Result<()> {
    // NaN fails is_finite()
    if !(value.is_finite() && value > 0.0) {
        return Err(FigureError::validation(
            field,
            format!("must be a positive finite number, got {value}"),
        ));
    }
    Ok(())
}

fn finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(FigureError::validation(
            field,
            format!("must be finite, got {value}"),
        ));
    }
    Ok(())
}

fn cylinder(prefix: &str, part: &CylinderPart) -> Result<()> {
    positive(&format!("{prefix}.radius"), part.radius)?;
    positive(&format!("{prefix}.length"), part.length)
}

fn cuboid(prefix: &str, part: &BoxPart) -> Result<()> {
    positive(&format!("{prefix}.width"), part.width)?;
    positive(&format!("{prefix}.height"), part.height)?;
    positive(&format!("{prefix}.depth"), part.depth)
}

fn paired_sphere(prefix: &str, part: &PairedSpherePart) -> Result<()> {
    positive(&format!("{prefix}.radius"), part.radius)?;
    finite(&format!("{prefix}.offset_x"), part.offset_x)?;
    finite(&format!("{prefix}.offset_y"), part.offset_y)?;
    finite(&format!("{prefix}.offset_z"), part.offset_z)
}

fn validate(draft: &ProportionDraft) -> Result<()> {
    positive("total_heads", draft.total_heads)?;
    positive("head_radius", draft.head_radius)?;
    if draft.subdivisions < 0 || draft.subdivisions > i64::from(u32::MAX) {
        return Err(FigureError::validation(
            "subdivisions",
            format!("must be a non-negative integer, got {}", draft.subdivisions),
        ));
    }
    positive("shoulder_width", draft.shoulder_width)?;
    positive("hip_width", draft.hip_width)?;

    cylinder("neck", &draft.neck)?;
    cuboid("ribcage", &draft.ribcage)?;
    if let Some(breasts) = &draft.breasts {
        paired_sphere("breasts", breasts)?;
    }
    cylinder("abdomen", &draft.abdomen)?;
    cuboid("pelvis", &draft.pelvis)?;
    paired_sphere("glutes", &draft.glutes)?;

    cylinder("upper_arm", &draft.upper_arm)?;
    cylinder("forearm", &draft.forearm)?;
    positive("hand.width", draft.hand.width)?;
    positive("hand.length", draft.hand.length)?;
    positive("hand.depth", draft.hand.depth)?;
    cylinder("thigh", &draft.thigh)?;
    cylinder("calf", &draft.calf)?;
    positive("foot.width", draft.foot.width)?;
    positive("foot.height", draft.foot.height)?;
    positive("foot.length", draft.foot.length)?;

    let ordered = draft.landmarks.ordered();
    for (name, value) in ordered {
        finite(&format!("landmarks.{name}"), value)?;
    }
    for pair in ordered.windows(2) {
        let (upper_name, upper) = pair[0];
        let (lower_name, lower) = pair[1];
        if lower >= upper {
            return Err(FigureError::validation(
                format!("landmarks.{lower_name}"),
                format!("must be below landmarks.{upper_name} ({upper}), got {lower}"),
            ));
        }
    }

    Ok(())
}
