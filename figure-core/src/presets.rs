//! Built-in figure presets and arm poses
//!
//! Proportions follow classical figure-drawing canons (Loomis, Hogarth,
//! Bridgman): adults are 7.5-8 heads tall, a 6-8 year old child about 6,
//! and heroic comic proportions 8.5.
//!
//! All measurements are in head units (one head unit = `2 * head_radius`).
//! `shoulder_width` and `hip_width` are joint-to-joint distances.

use crate::config::{
    BoxPart, CylinderPart, FootPart, HandPart, Landmarks, PairedSpherePart, ProportionConfig,
    ProportionDraft,
};
use crate::error::{FigureError, Result};

// =============================================================================
// Poses
// =============================================================================

/// A named arm angle, in degrees from vertical.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NamedPose {
    pub name: &'static str,
    pub arm_angle: f64,
    pub description: &'static str,
}

/// Standard character-workflow poses
pub const POSES: &[NamedPose] = &[
    NamedPose {
        name: "apose",
        arm_angle: 45.0,
        description: "A-pose, ideal for sculpting",
    },
    NamedPose {
        name: "tpose",
        arm_angle: 90.0,
        description: "T-pose, ideal for rigging",
    },
    NamedPose {
        name: "relaxed",
        arm_angle: 20.0,
        description: "Arms mostly down",
    },
];

/// Pose used when none is requested
pub const DEFAULT_POSE: &str = "apose";

/// Names of all built-in poses
pub fn pose_names() -> Vec<&'static str> {
    POSES.iter().map(|p| p.name).collect()
}

/// Arm angle of a named pose
pub fn pose_angle(name: &str) -> Result<f64> {
    POSES
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.arm_angle)
        .ok_or_else(|| FigureError::UnknownPose {
            name: name.to_string(),
            available: pose_names().join(", "),
        })
}

// =============================================================================
// Presets
// =============================================================================

/// Preset keys, in listing order
pub const PRESET_NAMES: [&str; 4] = ["female_adult", "male_adult", "child", "heroic"];

/// Preset used when none is requested
pub const DEFAULT_PRESET: &str = "female_adult";

/// Names of all built-in presets
pub fn preset_names() -> &'static [&'static str] {
    &PRESET_NAMES
}

/// Validated config for a built-in preset
pub fn preset(name: &str) -> Result<ProportionConfig> {
    let draft = preset_draft(name).ok_or_else(|| FigureError::UnknownPreset {
        name: name.to_string(),
        available: PRESET_NAMES.join(", "),
    })?;
    ProportionConfig::try_from(draft)
}

/// Raw record for a built-in preset (for customisation before validation)
pub fn preset_draft(name: &str) -> Option<ProportionDraft> {
    match name {
        "female_adult" => Some(female_adult()),
        "male_adult" => Some(male_adult()),
        "child" => Some(child()),
        "heroic" => Some(heroic()),
        _ => None,
    }
}

const fn cyl(radius: f64, length: f64) -> CylinderPart {
    CylinderPart { radius, length }
}

const fn cuboid(width: f64, height: f64, depth: f64) -> BoxPart {
    BoxPart {
        width,
        height,
        depth,
    }
}

const fn paired(radius: f64, offset_x: f64, offset_y: f64, offset_z: f64) -> PairedSpherePart {
    PairedSpherePart {
        radius,
        offset_x,
        offset_y,
        offset_z,
    }
}

/// 7.5 heads: narrower shoulders, higher waist, wider pelvis, defined bust
fn female_adult() -> ProportionDraft {
    ProportionDraft {
        name: "Adult Female".to_string(),
        total_heads: 7.5,
        head_radius: 0.5,
        subdivisions: 2,
        neck: cyl(0.11, 0.35),
        ribcage: cuboid(1.05, 1.25, 0.55),
        breasts: Some(paired(0.18, 0.22, -0.1, 0.32)),
        abdomen: cyl(0.30, 0.55),
        pelvis: cuboid(1.1, 0.7, 0.5),
        glutes: paired(0.24, 0.2, -0.15, -0.22),
        upper_arm: cyl(0.105, 1.15),
        forearm: cyl(0.08, 1.0),
        hand: HandPart {
            width: 0.09,
            length: 0.32,
            depth: 0.04,
        },
        thigh: cyl(0.17, 1.75),
        calf: cyl(0.12, 1.7),
        foot: FootPart {
            width: 0.14,
            height: 0.1,
            length: 0.38,
        },
        shoulder_width: 1.1,
        hip_width: 0.56,
        landmarks: Landmarks {
            shoulder_y: 5.9,
            bust_y: 5.4,
            waist_y: 4.6,
            pelvis_y: 4.0,
            crotch_y: 3.65,
        },
    }
}

/// 8 heads: broad shoulders, lower waist, narrow hips
fn male_adult() -> ProportionDraft {
    ProportionDraft {
        name: "Adult Male".to_string(),
        total_heads: 8.0,
        head_radius: 0.5,
        subdivisions: 2,
        neck: cyl(0.14, 0.35),
        ribcage: cuboid(1.25, 1.35, 0.6),
        breasts: None,
        abdomen: cyl(0.38, 0.55),
        pelvis: cuboid(0.95, 0.65, 0.48),
        glutes: paired(0.2, 0.18, -0.15, -0.2),
        upper_arm: cyl(0.13, 1.25),
        forearm: cyl(0.095, 1.1),
        hand: HandPart {
            width: 0.11,
            length: 0.38,
            depth: 0.05,
        },
        thigh: cyl(0.18, 1.85),
        calf: cyl(0.13, 1.8),
        foot: FootPart {
            width: 0.16,
            height: 0.12,
            length: 0.42,
        },
        shoulder_width: 1.3,
        hip_width: 0.52,
        landmarks: Landmarks {
            shoulder_y: 6.3,
            bust_y: 5.8,
            waist_y: 4.9,
            pelvis_y: 4.2,
            crotch_y: 3.85,
        },
    }
}

/// 6 heads: larger head, shorter limbs, softer forms
fn child() -> ProportionDraft {
    ProportionDraft {
        name: "Child (6-8 years)".to_string(),
        total_heads: 6.0,
        head_radius: 0.55,
        subdivisions: 2,
        neck: cyl(0.09, 0.25),
        ribcage: cuboid(0.85, 0.9, 0.45),
        breasts: None,
        abdomen: cyl(0.28, 0.45),
        pelvis: cuboid(0.75, 0.5, 0.4),
        glutes: paired(0.16, 0.14, -0.1, -0.15),
        upper_arm: cyl(0.07, 0.8),
        forearm: cyl(0.055, 0.7),
        hand: HandPart {
            width: 0.07,
            length: 0.22,
            depth: 0.03,
        },
        thigh: cyl(0.11, 1.1),
        calf: cyl(0.08, 1.0),
        foot: FootPart {
            width: 0.1,
            height: 0.08,
            length: 0.28,
        },
        shoulder_width: 0.9,
        hip_width: 0.4,
        landmarks: Landmarks {
            shoulder_y: 4.7,
            bust_y: 4.3,
            waist_y: 3.7,
            pelvis_y: 3.3,
            crotch_y: 3.0,
        },
    }
}

/// 8.5 heads: exaggerated V-taper and long legs
fn heroic() -> ProportionDraft {
    ProportionDraft {
        name: "Heroic/Idealized (8.5 heads)".to_string(),
        total_heads: 8.5,
        head_radius: 0.5,
        subdivisions: 2,
        neck: cyl(0.15, 0.4),
        ribcage: cuboid(1.4, 1.45, 0.65),
        breasts: None,
        abdomen: cyl(0.42, 0.6),
        pelvis: cuboid(1.0, 0.7, 0.5),
        glutes: paired(0.22, 0.2, -0.15, -0.22),
        upper_arm: cyl(0.15, 1.35),
        forearm: cyl(0.11, 1.2),
        hand: HandPart {
            width: 0.12,
            length: 0.4,
            depth: 0.05,
        },
        thigh: cyl(0.2, 2.0),
        calf: cyl(0.14, 1.9),
        foot: FootPart {
            width: 0.17,
            height: 0.13,
            length: 0.45,
        },
        shoulder_width: 1.5,
        hip_width: 0.56,
        landmarks: Landmarks {
            shoulder_y: 6.7,
            bust_y: 6.1,
            waist_y: 5.2,
            pelvis_y: 4.5,
            crotch_y: 4.1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_validate() {
        for name in preset_names() {
            let config = preset(name).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert!(!config.name().is_empty());
        }
    }

    #[test]
    fn test_only_female_preset_has_breasts() {
        assert!(preset("female_adult").unwrap().breasts().is_some());
        assert!(preset("male_adult").unwrap().breasts().is_none());
        assert!(preset("child").unwrap().breasts().is_none());
        assert!(preset("heroic").unwrap().breasts().is_none());
    }

    #[test]
    fn test_unknown_preset_lists_alternatives() {
        let err = preset("giant").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("giant"));
        assert!(message.contains("female_adult"));
    }

    #[test]
    fn test_pose_angles() {
        assert_eq!(pose_angle("apose").unwrap(), 45.0);
        assert_eq!(pose_angle("tpose").unwrap(), 90.0);
        assert_eq!(pose_angle("relaxed").unwrap(), 20.0);
        assert!(matches!(
            pose_angle("dab"),
            Err(FigureError::UnknownPose { .. })
        ));
    }

    #[test]
    fn test_defaults_exist() {
        assert!(preset(DEFAULT_PRESET).is_ok());
        assert!(pose_angle(DEFAULT_POSE).is_ok());
    }
}
