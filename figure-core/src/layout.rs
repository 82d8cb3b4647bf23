//! Proportional layout and pose engine
//!
//! Turns a validated [`ProportionConfig`] and an arm angle into the ordered
//! list of [`PartPlacement`]s for the whole figure. Pure arithmetic: no I/O,
//! no shared state, identical input gives bit-identical output.
//!
//! Coordinate frame: Y up with the ground at y = 0, figure facing +Z, its
//! left side on +X. Config measurements are head units and are scaled by
//! `2 * head_radius` here.
//!
//! Placement order:
//! 1. Axial parts walking down the landmarks: head, neck, ribcage,
//!    breasts (optional pair), abdomen, pelvis, glutes (pair)
//! 2. Arm chains (upper arm, forearm, hand), left then right
//! 3. Leg chains (thigh, calf, foot), left then right
//!
//! Every right-side part is the exact X-mirror of its left counterpart.

use std::f64::consts::FRAC_PI_2;

use glam::{DQuat, DVec3};

use crate::config::{PairedSpherePart, ProportionConfig};
use crate::error::{FigureError, Result};
use crate::placement::{PartPlacement, ShapeParams, Side};

/// Largest supported arm angle (arms straight up)
pub const MAX_ARM_ANGLE: f64 = 180.0;

/// Part count for a figure with breasts
pub const PART_COUNT_WITH_BREASTS: usize = 21;

/// Part count for a figure without breasts
pub const PART_COUNT_WITHOUT_BREASTS: usize = 19;

/// Validated arm angle in degrees from vertical.
///
/// 0 hangs the arms at the sides, 90 is a T-pose, 180 raises them overhead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmPose {
    degrees: f64,
}

impl ArmPose {
    pub fn new(degrees: f64) -> Result<Self> {
        // contains() is false for NaN
        if !(0.0..=MAX_ARM_ANGLE).contains(&degrees) {
            return Err(FigureError::InvalidPoseAngle { value: degrees });
        }
        Ok(Self { degrees })
    }

    pub fn degrees(self) -> f64 {
        self.degrees
    }

    pub fn radians(self) -> f64 {
        self.degrees.to_radians()
    }

    /// Rotation of the left arm's long axis: about +Z, swinging -Y towards +X
    fn left_arm_rotation(self) -> DQuat {
        DQuat::from_rotation_z(self.radians())
    }
}

/// Lay out every part of the figure.
///
/// Fails only with [`FigureError::InvalidPoseAngle`].
pub fn layout_figure(config: &ProportionConfig, arm_angle_degrees: f64) -> Result<Vec<PartPlacement>> {
    let pose = ArmPose::new(arm_angle_degrees)?;
    Ok(LayoutEngine::new(config).layout(pose))
}

/// Number of parts [`layout_figure`] produces for `config`
pub fn expected_part_count(config: &ProportionConfig) -> usize {
    if config.breasts().is_some() {
        PART_COUNT_WITH_BREASTS
    } else {
        PART_COUNT_WITHOUT_BREASTS
    }
}

/// Places every part of one figure for a given pose.
///
/// Borrows the config; holds no other state, so one engine can lay out any
/// number of poses.
pub struct LayoutEngine<'a> {
    config: &'a ProportionConfig,
    /// World size of one head unit
    unit: f64,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a ProportionConfig) -> Self {
        Self {
            config,
            unit: config.head_unit(),
        }
    }

    /// Head units to world units
    fn hu(&self, value: f64) -> f64 {
        value * self.unit
    }

    /// Ordered placements for `pose`
    pub fn layout(&self, pose: ArmPose) -> Vec<PartPlacement> {
        let mut parts = Vec::with_capacity(expected_part_count(self.config));
        self.place_axial(&mut parts);
        push_pair(&mut parts, self.arm_chain(pose));
        push_pair(&mut parts, self.leg_chain());
        parts
    }

    // -------------------------------------------------------------------------
    // Axial parts
    // -------------------------------------------------------------------------

    fn place_axial(&self, parts: &mut Vec<PartPlacement>) {
        let c = self.config;
        let l = c.landmarks();

        // Head: center one head unit below the top of the figure's height
        parts.push(PartPlacement::centered(
            "Head",
            None,
            ShapeParams::Sphere {
                radius: c.head_radius(),
            },
            DVec3::new(0.0, self.hu(c.total_heads() - 1.0), 0.0),
            DQuat::IDENTITY,
        ));

        // Neck: rises from the shoulder line by its own length
        let neck = c.neck();
        parts.push(PartPlacement::from_proximal(
            "Neck",
            None,
            ShapeParams::Cylinder {
                radius: self.hu(neck.radius),
                length: self.hu(neck.length),
            },
            DVec3::new(0.0, self.hu(l.shoulder_y + neck.length), 0.0),
            DQuat::IDENTITY,
        ));

        // Ribcage: centered in the shoulder..waist span
        let ribcage = c.ribcage();
        let ribcage_center = DVec3::new(0.0, self.hu(0.5 * (l.shoulder_y + l.waist_y)), 0.0);
        parts.push(PartPlacement::centered(
            "Ribcage",
            None,
            ShapeParams::Box {
                width: self.hu(ribcage.width),
                height: self.hu(ribcage.height),
                depth: self.hu(ribcage.depth),
            },
            ribcage_center,
            DQuat::IDENTITY,
        ));

        // Breasts: offset from the ribcage center
        if let Some(breasts) = c.breasts() {
            push_pair(
                parts,
                vec![self.paired_sphere("Breast", breasts, ribcage_center)],
            );
        }

        // Abdomen: centered in the waist..pelvis span
        let abdomen = c.abdomen();
        let abdomen_top = self.hu(0.5 * (l.waist_y + l.pelvis_y) + 0.5 * abdomen.length);
        parts.push(PartPlacement::from_proximal(
            "Abdomen",
            None,
            ShapeParams::Cylinder {
                radius: self.hu(abdomen.radius),
                length: self.hu(abdomen.length),
            },
            DVec3::new(0.0, abdomen_top, 0.0),
            DQuat::IDENTITY,
        ));

        // Pelvis: centered in the pelvis..crotch span
        let pelvis = c.pelvis();
        let pelvis_center = DVec3::new(0.0, self.hu(0.5 * (l.pelvis_y + l.crotch_y)), 0.0);
        parts.push(PartPlacement::centered(
            "Pelvis",
            None,
            ShapeParams::Box {
                width: self.hu(pelvis.width),
                height: self.hu(pelvis.height),
                depth: self.hu(pelvis.depth),
            },
            pelvis_center,
            DQuat::IDENTITY,
        ));

        // Glutes: offset from the pelvis center
        push_pair(
            parts,
            vec![self.paired_sphere("Glute", c.glutes(), pelvis_center)],
        );
    }

    /// Left instance of a paired sphere, offset from `anchor`
    fn paired_sphere(&self, stem: &str, part: &PairedSpherePart, anchor: DVec3) -> PartPlacement {
        let offset = DVec3::new(
            Side::Left.sign() * self.hu(part.offset_x),
            self.hu(part.offset_y),
            self.hu(part.offset_z),
        );
        PartPlacement::centered(
            format!("{stem}_{}", Side::Left),
            Some(Side::Left),
            ShapeParams::Sphere {
                radius: self.hu(part.radius),
            },
            anchor + offset,
            DQuat::IDENTITY,
        )
    }

    // -------------------------------------------------------------------------
    // Limb chains (left side; the right side is mirrored by push_pair)
    // -------------------------------------------------------------------------

    fn arm_chain(&self, pose: ArmPose) -> Vec<PartPlacement> {
        let c = self.config;
        let side = Some(Side::Left);
        let shoulder = DVec3::new(
            Side::Left.sign() * self.hu(0.5 * c.shoulder_width()),
            self.hu(c.landmarks().shoulder_y),
            0.0,
        );
        // Straight arm: one rotation shared by every segment
        let rotation = pose.left_arm_rotation();

        let upper = PartPlacement::from_proximal(
            "UpperArm_Left",
            side,
            ShapeParams::Cylinder {
                radius: self.hu(c.upper_arm().radius),
                length: self.hu(c.upper_arm().length),
            },
            shoulder,
            rotation,
        );
        let forearm = PartPlacement::from_proximal(
            "Forearm_Left",
            side,
            ShapeParams::Cylinder {
                radius: self.hu(c.forearm().radius),
                length: self.hu(c.forearm().length),
            },
            upper.distal(),
            rotation,
        );
        let hand = c.hand();
        let hand = PartPlacement::from_proximal(
            "Hand_Left",
            side,
            ShapeParams::Box {
                width: self.hu(hand.width),
                height: self.hu(hand.length),
                depth: self.hu(hand.depth),
            },
            forearm.distal(),
            rotation,
        );

        vec![upper, forearm, hand]
    }

    fn leg_chain(&self) -> Vec<PartPlacement> {
        let c = self.config;
        let side = Some(Side::Left);
        // Legs hang straight down from the bottom of the pelvis box
        let hip = DVec3::new(
            Side::Left.sign() * self.hu(0.5 * c.hip_width()),
            self.hu(c.landmarks().pelvis_y - 0.5 * c.pelvis().height),
            0.0,
        );

        let thigh = PartPlacement::from_proximal(
            "Thigh_Left",
            side,
            ShapeParams::Cylinder {
                radius: self.hu(c.thigh().radius),
                length: self.hu(c.thigh().length),
            },
            hip,
            DQuat::IDENTITY,
        );
        let calf = PartPlacement::from_proximal(
            "Calf_Left",
            side,
            ShapeParams::Cylinder {
                radius: self.hu(c.calf().radius),
                length: self.hu(c.calf().length),
            },
            thigh.distal(),
            DQuat::IDENTITY,
        );
        // Foot points forward: long axis rotated from -Y onto +Z, so the box
        // height runs heel to toe and its depth is vertical
        let foot = c.foot();
        let foot = PartPlacement::from_proximal(
            "Foot_Left",
            side,
            ShapeParams::Box {
                width: self.hu(foot.width),
                height: self.hu(foot.length),
                depth: self.hu(foot.height),
            },
            calf.distal(),
            DQuat::from_rotation_x(-FRAC_PI_2),
        );

        vec![thigh, calf, foot]
    }
}

/// Append left-side parts followed by their mirrored right-side twins
fn push_pair(parts: &mut Vec<PartPlacement>, left: Vec<PartPlacement>) {
    let right: Vec<PartPlacement> = left.iter().map(PartPlacement::mirrored).collect();
    parts.extend(left);
    parts.extend(right);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::preset;

    fn find<'a>(parts: &'a [PartPlacement], name: &str) -> &'a PartPlacement {
        parts
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("missing part {name}"))
    }

    #[test]
    fn test_part_counts() {
        let female = preset("female_adult").unwrap();
        let male = preset("male_adult").unwrap();
        assert_eq!(layout_figure(&female, 45.0).unwrap().len(), 21);
        assert_eq!(layout_figure(&male, 45.0).unwrap().len(), 19);
        assert_eq!(expected_part_count(&female), PART_COUNT_WITH_BREASTS);
        assert_eq!(expected_part_count(&male), PART_COUNT_WITHOUT_BREASTS);
    }

    #[test]
    fn test_part_order() {
        let parts = layout_figure(&preset("female_adult").unwrap(), 45.0).unwrap();
        let names: Vec<&str> = parts.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Head",
                "Neck",
                "Ribcage",
                "Breast_Left",
                "Breast_Right",
                "Abdomen",
                "Pelvis",
                "Glute_Left",
                "Glute_Right",
                "UpperArm_Left",
                "Forearm_Left",
                "Hand_Left",
                "UpperArm_Right",
                "Forearm_Right",
                "Hand_Right",
                "Thigh_Left",
                "Calf_Left",
                "Foot_Left",
                "Thigh_Right",
                "Calf_Right",
                "Foot_Right",
            ]
        );
    }

    #[test]
    fn test_invalid_pose_angles() {
        let config = preset("male_adult").unwrap();
        for angle in [-0.1, 180.5, 200.0, f64::NAN, f64::INFINITY] {
            let err = layout_figure(&config, angle).unwrap_err();
            assert!(matches!(err, FigureError::InvalidPoseAngle { .. }), "{angle}");
        }
        assert!(layout_figure(&config, 0.0).is_ok());
        assert!(layout_figure(&config, 180.0).is_ok());
    }

    #[test]
    fn test_axial_placement_female() {
        let parts = layout_figure(&preset("female_adult").unwrap(), 45.0).unwrap();
        let eps = 1e-12;

        assert!((find(&parts, "Head").position.y - 6.5).abs() < eps);
        let neck = find(&parts, "Neck");
        assert!((neck.proximal().y - 6.25).abs() < eps);
        assert!((neck.distal().y - 5.9).abs() < eps);
        assert!((find(&parts, "Ribcage").position.y - 5.25).abs() < eps);
        assert!((find(&parts, "Abdomen").position.y - 4.3).abs() < eps);
        assert!((find(&parts, "Pelvis").position.y - 3.825).abs() < eps);

        // Ribcage center (5.25) plus offset_y (-0.1)
        let breast = find(&parts, "Breast_Left");
        assert!((breast.position - DVec3::new(0.22, 5.15, 0.32)).length() < eps);
        let glute = find(&parts, "Glute_Left");
        assert!((glute.position - DVec3::new(0.2, 3.675, -0.22)).length() < eps);
    }

    #[test]
    fn test_head_unit_scales_layout() {
        // Child preset has head_radius 0.55, so one head unit is 1.1
        let parts = layout_figure(&preset("child").unwrap(), 0.0).unwrap();
        let head = find(&parts, "Head");
        assert!((head.position.y - 5.0 * 1.1).abs() < 1e-12);
        assert_eq!(head.shape, ShapeParams::Sphere { radius: 0.55 });
        let upper = find(&parts, "UpperArm_Left");
        assert!((upper.proximal().x - 0.45 * 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_legs_start_under_pelvis() {
        let config = preset("female_adult").unwrap();
        let parts = layout_figure(&config, 90.0).unwrap();
        let thigh = find(&parts, "Thigh_Left");
        let hip = thigh.proximal();
        assert!((hip.x - 0.28).abs() < 1e-12);
        assert!((hip.y - 3.65).abs() < 1e-12);
        assert!((thigh.axis() - DVec3::NEG_Y).length() < 1e-12);
    }

    #[test]
    fn test_legs_ignore_pose() {
        let config = preset("heroic").unwrap();
        let relaxed = layout_figure(&config, 20.0).unwrap();
        let raised = layout_figure(&config, 170.0).unwrap();
        for name in ["Thigh_Left", "Calf_Right", "Foot_Left", "Pelvis", "Head"] {
            assert_eq!(find(&relaxed, name), find(&raised, name));
        }
    }

    #[test]
    fn test_foot_points_forward() {
        let parts = layout_figure(&preset("male_adult").unwrap(), 45.0).unwrap();
        let foot = find(&parts, "Foot_Right");
        assert!((foot.axis() - DVec3::Z).length() < 1e-12);
        assert!(foot.position.z > 0.0);
    }

    #[test]
    fn test_tpose_arms_horizontal() {
        let parts = layout_figure(&preset("female_adult").unwrap(), 90.0).unwrap();
        let upper = find(&parts, "UpperArm_Left");
        assert!((upper.distal().x - (0.55 + 1.15)).abs() < 1e-12);
        assert!((upper.distal().y - 5.9).abs() < 1e-12);
        let hand = find(&parts, "Hand_Right");
        assert!((hand.distal().x + (0.55 + 1.15 + 1.0 + 0.32)).abs() < 1e-12);
    }

    #[test]
    fn test_arms_at_sides() {
        let parts = layout_figure(&preset("female_adult").unwrap(), 0.0).unwrap();
        let upper = find(&parts, "UpperArm_Left");
        assert_eq!(upper.proximal().x, upper.distal().x);
        let hand = find(&parts, "Hand_Right");
        assert!((hand.distal().x + 0.55).abs() < 1e-12);
    }
}
