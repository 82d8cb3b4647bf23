//! figure-gen - humanoid base mesh generator
//!
//! Lays out a proportioned figure from a preset or JSON config, poses the
//! arms, builds primitive meshes and exports them (GLB, OBJ, STL).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use figure_core::{
    DEFAULT_POSE, DEFAULT_PRESET, FigureGenerator, POSES, ProportionConfig, layout_figure,
    load_config, pose_angle, preset, preset_names, save_config,
};
use figure_mesh::{BackendKind, ExportFormat, available_backends, export_figure, resolve_format};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "figure-gen")]
#[command(about = "Generate proportioned humanoid base meshes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a figure and export it
    Generate {
        #[command(flatten)]
        figure: FigureArgs,

        /// Output file; its extension picks the format unless --format is given
        #[arg(short, long, default_value = "figure.glb")]
        output: PathBuf,

        /// Export format (glb, obj, stl)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Mesh backend (default: best available)
        #[arg(short, long)]
        backend: Option<BackendKind>,
    },

    /// Print part placements as JSON without building meshes
    Layout {
        #[command(flatten)]
        figure: FigureArgs,
    },

    /// List built-in presets
    Presets,

    /// List named poses
    Poses,

    /// List mesh backends
    Backends,

    /// Dump a preset as a JSON config
    Config {
        /// Preset name
        preset: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Which figure to build and how to pose it
#[derive(Args)]
struct FigureArgs {
    /// Built-in preset (default: female_adult)
    #[arg(short, long, conflicts_with = "config")]
    preset: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Named pose (default: apose)
    #[arg(long, conflicts_with = "arm_angle")]
    pose: Option<String>,

    /// Arm angle in degrees from vertical (0-180)
    #[arg(long)]
    arm_angle: Option<f64>,
}

impl FigureArgs {
    fn proportions(&self) -> Result<ProportionConfig> {
        match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(preset(self.preset.as_deref().unwrap_or(DEFAULT_PRESET))?),
        }
    }

    fn arm_angle(&self) -> Result<f64> {
        match self.arm_angle {
            Some(angle) => Ok(angle),
            None => Ok(pose_angle(self.pose.as_deref().unwrap_or(DEFAULT_POSE))?),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            figure,
            output,
            format,
            backend,
        } => generate(&figure, &output, format, backend, cli.verbose),

        Commands::Layout { figure } => {
            let config = figure.proportions()?;
            let arm_angle = figure.arm_angle()?;
            let parts = serde_json::to_value(layout_figure(&config, arm_angle)?)?;
            let document = serde_json::json!({
                "name": config.name(),
                "arm_angle": arm_angle,
                "parts": parts,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }

        Commands::Presets => {
            for name in preset_names() {
                let config = preset(name)?;
                println!(
                    "{name:<14} {} ({} heads)",
                    config.name(),
                    config.total_heads()
                );
            }
            Ok(())
        }

        Commands::Poses => {
            for pose in POSES {
                println!("{:<10} {:>5.1} deg  {}", pose.name, pose.arm_angle, pose.description);
            }
            Ok(())
        }

        Commands::Backends => {
            let available = available_backends();
            for kind in BackendKind::ALL {
                let status = if available.contains(&kind) {
                    "available"
                } else {
                    "not built"
                };
                let formats: Vec<&str> = kind
                    .supported_formats()
                    .iter()
                    .filter(|f| f.is_available())
                    .map(|f| f.extension())
                    .collect();
                println!(
                    "{:<12} {:<10} {} [{}]",
                    kind.name(),
                    status,
                    kind.description(),
                    formats.join(", ")
                );
            }
            Ok(())
        }

        Commands::Config { preset: name, output } => {
            let config = preset(&name)?;
            match output {
                Some(path) => {
                    save_config(&config, &path)?;
                    info!("Wrote {} config to {}", name, path.display());
                }
                None => println!("{}", config.to_json_string()?),
            }
            Ok(())
        }
    }
}

fn generate(
    figure: &FigureArgs,
    output: &Path,
    format: Option<ExportFormat>,
    backend: Option<BackendKind>,
    verbose: bool,
) -> Result<()> {
    let kind = match backend {
        Some(kind) => kind,
        None => BackendKind::auto()?,
    };
    let config = figure.proportions()?;
    let arm_angle = figure.arm_angle()?;
    // Reject an unusable output before building any geometry
    let format = resolve_format(output, format, kind)?;

    info!(
        "Generating {} at {} degrees with the {} backend",
        config.name(),
        arm_angle,
        kind
    );
    let generator = FigureGenerator::new(kind.create()?);
    let assembly = generator
        .generate(&config, arm_angle)
        .with_context(|| format!("Failed to generate {}", config.name()))?;

    for part in &assembly {
        debug!(
            "{}: {} vertices, {} triangles",
            part.name,
            part.mesh.vertex_count(),
            part.mesh.triangle_count()
        );
    }

    export_figure(&assembly, output, Some(format), kind)?;
    println!(
        "Exported {} parts to {}",
        assembly.part_count(),
        output.display()
    );
    if verbose {
        for name in assembly.part_names() {
            println!("  {name}");
        }
    }
    Ok(())
}
