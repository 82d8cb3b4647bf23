//! Seam between the assembler and whatever produces mesh geometry

use glam::{DQuat, DVec3};

use crate::error::PrimitiveError;

/// Builds primitive solids in world space.
///
/// Implementations are stateless with respect to the figure: each call
/// returns an independent mesh. The assembler only ever talks to this trait,
/// so geometry kernels can be swapped without touching layout code.
pub trait PrimitiveBackend {
    /// Mesh handle produced by this backend
    type Mesh;

    /// Short identifier, e.g. `procedural`
    fn name(&self) -> &'static str;

    /// Sphere centered at `center`. Higher `subdivisions` means a smoother
    /// surface; the exact mapping to vertex count is backend specific.
    fn make_sphere(
        &self,
        radius: f64,
        center: DVec3,
        subdivisions: u32,
    ) -> Result<Self::Mesh, PrimitiveError>;

    /// Capped cylinder whose base center is `start`, extending `length`
    /// along `orientation * -Y`.
    fn make_cylinder(
        &self,
        radius: f64,
        length: f64,
        start: DVec3,
        orientation: DQuat,
    ) -> Result<Self::Mesh, PrimitiveError>;

    /// Box centered at `center`; `width`, `height` and `depth` run along the
    /// rotated local X, Y and Z axes.
    fn make_box(
        &self,
        width: f64,
        height: f64,
        depth: f64,
        center: DVec3,
        orientation: DQuat,
    ) -> Result<Self::Mesh, PrimitiveError>;
}

impl<B: PrimitiveBackend + ?Sized> PrimitiveBackend for &B {
    type Mesh = B::Mesh;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn make_sphere(
        &self,
        radius: f64,
        center: DVec3,
        subdivisions: u32,
    ) -> Result<Self::Mesh, PrimitiveError> {
        (**self).make_sphere(radius, center, subdivisions)
    }

    fn make_cylinder(
        &self,
        radius: f64,
        length: f64,
        start: DVec3,
        orientation: DQuat,
    ) -> Result<Self::Mesh, PrimitiveError> {
        (**self).make_cylinder(radius, length, start, orientation)
    }

    fn make_box(
        &self,
        width: f64,
        height: f64,
        depth: f64,
        center: DVec3,
        orientation: DQuat,
    ) -> Result<Self::Mesh, PrimitiveError> {
        (**self).make_box(width, height, depth, center, orientation)
    }
}

impl<B: PrimitiveBackend + ?Sized> PrimitiveBackend for Box<B> {
    type Mesh = B::Mesh;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn make_sphere(
        &self,
        radius: f64,
        center: DVec3,
        subdivisions: u32,
    ) -> Result<Self::Mesh, PrimitiveError> {
        (**self).make_sphere(radius, center, subdivisions)
    }

    fn make_cylinder(
        &self,
        radius: f64,
        length: f64,
        start: DVec3,
        orientation: DQuat,
    ) -> Result<Self::Mesh, PrimitiveError> {
        (**self).make_cylinder(radius, length, start, orientation)
    }

    fn make_box(
        &self,
        width: f64,
        height: f64,
        depth: f64,
        center: DVec3,
        orientation: DQuat,
    ) -> Result<Self::Mesh, PrimitiveError> {
        (**self).make_box(width, height, depth, center, orientation)
    }
}

/// Reject a dimension that is zero, negative or not finite
pub fn check_dimension(dimension: &'static str, value: f64) -> Result<(), PrimitiveError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PrimitiveError::Degenerate { dimension, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dimension() {
        assert!(check_dimension("radius", 0.1).is_ok());
        assert_eq!(
            check_dimension("radius", 0.0),
            Err(PrimitiveError::Degenerate {
                dimension: "radius",
                value: 0.0
            })
        );
        assert!(check_dimension("length", -1.0).is_err());
        assert!(check_dimension("width", f64::INFINITY).is_err());
        assert!(check_dimension("depth", f64::NAN).is_err());
    }
}
