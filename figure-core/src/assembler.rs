//! Placement-to-mesh translation and the figure-level generator

use crate::backend::PrimitiveBackend;
use crate::config::ProportionConfig;
use crate::error::{FigureError, PrimitiveError, Result};
use crate::layout::{ArmPose, layout_figure};
use crate::placement::{PartPlacement, ShapeParams};
use crate::presets::preset;

// =============================================================================
// Assembly
// =============================================================================

/// One constructed part of a figure
#[derive(Clone, Debug, PartialEq)]
pub struct AssembledPart<M> {
    pub name: String,
    pub mesh: M,
}

/// Ordered, named meshes of one generated figure plus the config they came from
#[derive(Clone, Debug)]
pub struct FigureAssembly<M> {
    config: ProportionConfig,
    arm_angle: f64,
    parts: Vec<AssembledPart<M>>,
}

impl<M> FigureAssembly<M> {
    pub fn config(&self) -> &ProportionConfig {
        &self.config
    }

    /// Arm angle the figure was posed with, in degrees
    pub fn arm_angle(&self) -> f64 {
        self.arm_angle
    }

    pub fn parts(&self) -> &[AssembledPart<M>] {
        &self.parts
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Look up a part by name
    pub fn part(&self, name: &str) -> Option<&AssembledPart<M>> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssembledPart<M>> {
        self.parts.iter()
    }

    pub fn into_parts(self) -> Vec<AssembledPart<M>> {
        self.parts
    }
}

impl<'a, M> IntoIterator for &'a FigureAssembly<M> {
    type Item = &'a AssembledPart<M>;
    type IntoIter = std::slice::Iter<'a, AssembledPart<M>>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Sends each placement to a [`PrimitiveBackend`] and collects the meshes.
pub struct PrimitiveAssembler<'b, B: ?Sized> {
    backend: &'b B,
    subdivisions: u32,
}

impl<'b, B: PrimitiveBackend + ?Sized> PrimitiveAssembler<'b, B> {
    pub fn new(backend: &'b B, subdivisions: u32) -> Self {
        Self {
            backend,
            subdivisions,
        }
    }

    /// Build the mesh for a single placement
    pub fn build_part(&self, placement: &PartPlacement) -> std::result::Result<B::Mesh, PrimitiveError> {
        match placement.shape {
            ShapeParams::Sphere { radius } => {
                self.backend
                    .make_sphere(radius, placement.position, self.subdivisions)
            }
            ShapeParams::Cylinder { radius, length } => self.backend.make_cylinder(
                radius,
                length,
                placement.proximal(),
                placement.orientation,
            ),
            ShapeParams::Box {
                width,
                height,
                depth,
            } => self.backend.make_box(
                width,
                height,
                depth,
                placement.position,
                placement.orientation,
            ),
        }
    }

    /// Build every placement in order.
    ///
    /// The first backend failure aborts the whole assembly.
    pub fn assemble(
        &self,
        config: &ProportionConfig,
        arm_angle: f64,
        placements: &[PartPlacement],
    ) -> Result<FigureAssembly<B::Mesh>> {
        let parts = placements
            .iter()
            .map(|placement| -> Result<AssembledPart<B::Mesh>> {
                let mesh = self.build_part(placement).map_err(|cause| {
                    FigureError::PartConstructionFailed {
                        part_name: placement.name.clone(),
                        cause,
                    }
                })?;
                Ok(AssembledPart {
                    name: placement.name.clone(),
                    mesh,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FigureAssembly {
            config: config.clone(),
            arm_angle,
            parts,
        })
    }
}

// =============================================================================
// Generator
// =============================================================================

/// Layout plus assembly against one backend.
pub struct FigureGenerator<B> {
    backend: B,
}

impl<B: PrimitiveBackend> FigureGenerator<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Generate a figure from a validated config and an arm angle in degrees
    pub fn generate(&self, config: &ProportionConfig, arm_angle: f64) -> Result<FigureAssembly<B::Mesh>> {
        let pose = ArmPose::new(arm_angle)?;
        let placements = layout_figure(config, pose.degrees())?;
        PrimitiveAssembler::new(&self.backend, config.subdivisions()).assemble(
            config,
            pose.degrees(),
            &placements,
        )
    }

    /// Generate a figure from a built-in preset
    pub fn generate_preset(&self, name: &str, arm_angle: f64) -> Result<FigureAssembly<B::Mesh>> {
        let config = preset(name)?;
        self.generate(&config, arm_angle)
    }
}
