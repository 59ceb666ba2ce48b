// SPDX-License-Identifier: MIT OR Apache-2.0
//! `matbridge` - converts avatar materials for path-traced and toon renderers
//!
//! Reads a scene document exported from a host (RON or JSON), rebuilds the
//! shading graph of every material used by the objects in scope, and writes
//! the converted scene back out:
//! - `matbridge convert scene.ron --target toon`
//! - `matbridge inspect scene.ron` prints the inferred roles only
//!
//! ## Configuration
//!
//! Defaults come from `matbridge.ron` in the working directory when present
//! (or `--settings`); command-line flags override file values.

mod commands;
mod error;
mod probe;
mod scene_io;
mod settings;

use clap::{Parser, Subcommand, ValueEnum};
use matbridge_convert::{ConvertError, Scope, TargetModel};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::CliError;

/// Material converter for avatar scenes.
#[derive(Parser)]
#[command(name = "matbridge", version, about = "Material converter for avatar scenes")]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert the materials of a scene for a target renderer.
    Convert(ConvertArgs),
    /// Print the inferred roles of every material without converting.
    Inspect(InspectArgs),
}

/// Arguments of `matbridge convert`.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Scene document (.ron or .json).
    scene: PathBuf,

    /// Output path (default: `<scene>_converted.<ext>` next to the input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file (default: ./matbridge.ron when present).
    #[arg(short = 'c', long = "settings")]
    settings: Option<PathBuf>,

    /// Target rendering model.
    #[arg(long, value_enum)]
    target: Option<TargetArg>,

    /// Which objects to convert.
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,

    /// Reconvert materials that already carry the marker prefix.
    #[arg(long)]
    overwrite: bool,

    /// Rebuild the original materials instead of converting copies.
    #[arg(long)]
    in_place: bool,

    /// Marker prefix of converted materials.
    #[arg(long)]
    prefix: Option<String>,

    /// Alpha cutoff in [0, 1].
    #[arg(long)]
    clip_threshold: Option<f32>,

    /// Refresh image channel metadata from the image files.
    #[arg(long)]
    probe_images: bool,

    /// Directory searched for images whose recorded path is missing.
    #[arg(long)]
    images: Option<PathBuf>,
}

/// Arguments of `matbridge inspect`.
#[derive(clap::Args)]
struct InspectArgs {
    /// Scene document (.ron or .json).
    scene: PathBuf,

    /// Settings file (default: ./matbridge.ron when present).
    #[arg(short = 'c', long = "settings")]
    settings: Option<PathBuf>,

    /// Refresh image channel metadata from the image files.
    #[arg(long)]
    probe_images: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetArg {
    PathTraced,
    Toon,
    ToonUnlit,
}

impl From<TargetArg> for TargetModel {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::PathTraced => Self::PathTraced,
            TargetArg::Toon => Self::Toon,
            TargetArg::ToonUnlit => Self::ToonUnlit,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScopeArg {
    Selected,
    Scene,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Selected => Self::Selected,
            ScopeArg::Scene => Self::Scene,
        }
    }
}

fn init_tracing(verbose: bool) {
    let mut env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("matbridge=info"));
    if verbose {
        if let Ok(directive) = "matbridge=debug".parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!("matbridge v{}", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Convert(args) => commands::convert(args),
        Commands::Inspect(args) => commands::inspect(args),
    };

    match result {
        Ok(()) => {}
        Err(CliError::Convert(e @ ConvertError::NoTargets { .. })) => {
            tracing::warn!("{e}");
        }
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
