//! Placed body parts, the output of the layout engine

use std::fmt;

use glam::{DQuat, DVec3};
use serde::Serialize;

/// Left or right instance of a paired part.
///
/// The figure faces +Z; its left side is +X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Sign of the X coordinate on this side
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primitive shape family
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ShapeKind {
    Sphere,
    Cylinder,
    Box,
}

/// Shape dimensions in world units.
///
/// Cylinders and boxes have a local long axis along -Y: a cylinder's
/// `length` and a box's `height` are measured along it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeParams {
    Sphere { radius: f64 },
    Cylinder { radius: f64, length: f64 },
    Box { width: f64, height: f64, depth: f64 },
}

impl ShapeParams {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ShapeParams::Sphere { .. } => ShapeKind::Sphere,
            ShapeParams::Cylinder { .. } => ShapeKind::Cylinder,
            ShapeParams::Box { .. } => ShapeKind::Box,
        }
    }

    /// Extent along the local long axis
    pub fn axial_extent(&self) -> f64 {
        match *self {
            ShapeParams::Sphere { radius } => 2.0 * radius,
            ShapeParams::Cylinder { length, .. } => length,
            ShapeParams::Box { height, .. } => height,
        }
    }
}

/// One body part with its final world transform.
///
/// `position` is the shape's center. Created fresh by every layout call and
/// never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PartPlacement {
    /// Unique per figure, e.g. `UpperArm_Left`
    pub name: String,
    pub side: Option<Side>,
    pub shape: ShapeParams,
    pub position: DVec3,
    pub orientation: DQuat,
}

impl PartPlacement {
    /// Part centered at `position`
    pub fn centered(
        name: impl Into<String>,
        side: Option<Side>,
        shape: ShapeParams,
        position: DVec3,
        orientation: DQuat,
    ) -> Self {
        Self {
            name: name.into(),
            side,
            shape,
            position,
            orientation,
        }
    }

    /// Part whose proximal end sits at `start`, extending along its rotated long axis
    pub fn from_proximal(
        name: impl Into<String>,
        side: Option<Side>,
        shape: ShapeParams,
        start: DVec3,
        orientation: DQuat,
    ) -> Self {
        let axis = orientation * DVec3::NEG_Y;
        let position = start + axis * (shape.axial_extent() * 0.5);
        Self::centered(name, side, shape, position, orientation)
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Unit direction of the long axis in world space
    pub fn axis(&self) -> DVec3 {
        self.orientation * DVec3::NEG_Y
    }

    /// Start of the long axis (the joint this part hangs from)
    pub fn proximal(&self) -> DVec3 {
        self.position - self.axis() * (self.shape.axial_extent() * 0.5)
    }

    /// End of the long axis (where the next segment of a limb attaches)
    pub fn distal(&self) -> DVec3 {
        self.position + self.axis() * (self.shape.axial_extent() * 0.5)
    }

    /// Mirror image across the X = 0 plane, renamed for the opposite side.
    ///
    /// Reflecting a rotation through the YZ plane keeps the X component of
    /// the quaternion and negates Y and Z.
    pub fn mirrored(&self) -> Self {
        let side = self.side.map(Side::opposite);
        let name = match (self.side, side) {
            (Some(from), Some(to)) => self
                .name
                .strip_suffix(from.as_str())
                .map(|stem| format!("{stem}{to}"))
                .unwrap_or_else(|| self.name.clone()),
            _ => self.name.clone(),
        };
        let q = self.orientation;
        Self {
            name,
            side,
            shape: self.shape,
            position: DVec3::new(-self.position.x, self.position.y, self.position.z),
            orientation: DQuat::from_xyzw(q.x, -q.y, -q.z, q.w),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_proximal_round_trip() {
        let shape = ShapeParams::Cylinder {
            radius: 0.1,
            length: 2.0,
        };
        let start = DVec3::new(1.0, 5.0, 0.0);
        let part = PartPlacement::from_proximal("Bone", None, shape, start, DQuat::IDENTITY);
        assert_eq!(part.position, DVec3::new(1.0, 4.0, 0.0));
        assert_eq!(part.proximal(), start);
        assert_eq!(part.distal(), DVec3::new(1.0, 3.0, 0.0));
    }

    #[test]
    fn test_mirrored_renames_and_reflects() {
        let shape = ShapeParams::Box {
            width: 0.1,
            height: 0.3,
            depth: 0.05,
        };
        let orientation = DQuat::from_rotation_z(0.7);
        let left = PartPlacement::centered(
            "Hand_Left",
            Some(Side::Left),
            shape,
            DVec3::new(1.5, 4.0, 0.2),
            orientation,
        );
        let right = left.mirrored();
        assert_eq!(right.name, "Hand_Right");
        assert_eq!(right.side, Some(Side::Right));
        assert_eq!(right.position, DVec3::new(-1.5, 4.0, 0.2));
        assert!(right.orientation.abs_diff_eq(DQuat::from_rotation_z(-0.7), 1e-12));

        let axis = left.axis();
        let mirrored_axis = right.axis();
        assert!((mirrored_axis - DVec3::new(-axis.x, axis.y, axis.z)).length() < 1e-12);
    }

    #[test]
    fn test_side_sign_follows_mirror() {
        let left = PartPlacement::centered(
            "Glute_Left",
            Some(Side::Left),
            ShapeParams::Sphere { radius: 0.2 },
            DVec3::new(Side::Left.sign() * 0.3, 3.5, -0.2),
            DQuat::IDENTITY,
        );
        let right = left.mirrored();
        assert_eq!(Side::Right.sign(), -Side::Left.sign());
        assert_eq!(right.position.x, Side::Right.sign() * 0.3);
    }

    #[test]
    fn test_shape_kind_and_extent() {
        let sphere = ShapeParams::Sphere { radius: 0.5 };
        assert_eq!(sphere.kind(), ShapeKind::Sphere);
        assert_eq!(sphere.axial_extent(), 1.0);
    }
}
