// SPDX-License-Identifier: MIT OR Apache-2.0
//! Subcommand handlers.

use matbridge_convert::{infer_roles, AlphaSource, ConversionRun, InferenceConfig, RoleResult};
use matbridge_graph::SceneDocument;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::error::CliError;
use crate::probe::{ImageIndex, ImageProber};
use crate::scene_io::{load_scene, save_scene};
use crate::settings::ConverterSettings;
use crate::{ConvertArgs, InspectArgs};

impl ConvertArgs {
    /// Override file settings with the flags given on the command line
    fn apply(&self, settings: &mut ConverterSettings) {
        if let Some(target) = self.target {
            settings.target = target.into();
        }
        if let Some(scope) = self.scope {
            settings.scope = scope.into();
        }
        if self.overwrite {
            settings.overwrite = true;
        }
        if self.in_place {
            settings.create_new = false;
            settings.overwrite = true;
        }
        if let Some(prefix) = &self.prefix {
            settings.marker_prefix = Some(prefix.clone());
        }
        if let Some(threshold) = self.clip_threshold {
            settings.clip_threshold = threshold;
        }
        if self.probe_images {
            settings.probe_images = true;
        }
        if let Some(dir) = &self.images {
            settings.image_dir = Some(dir.clone());
        }
    }
}

/// `<dir>/<stem>_converted.<ext>`
fn default_output(scene: &Path) -> PathBuf {
    let stem = scene.file_stem().and_then(|s| s.to_str()).unwrap_or("scene");
    let extension = scene.extension().and_then(|e| e.to_str()).unwrap_or("ron");
    scene.with_file_name(format!("{stem}_converted.{extension}"))
}

/// Directory relative image paths in `scene` are resolved against
fn scene_dir(scene: &Path) -> PathBuf {
    scene.parent().map(Path::to_path_buf).unwrap_or_default()
}

fn probe_images(scene: &mut SceneDocument, scene_path: &Path, settings: &ConverterSettings) {
    let index = settings.image_dir.as_deref().map(ImageIndex::scan);
    if let (Some(dir), Some(index)) = (&settings.image_dir, &index) {
        if index.is_empty() {
            tracing::warn!("No images found under {}", dir.display());
        }
    }
    let mut prober = ImageProber::new(scene_dir(scene_path));
    if let Some(index) = &index {
        prober = prober.with_index(index);
    }
    prober.probe_scene(scene);
}

/// `matbridge convert`
pub fn convert(args: ConvertArgs) -> Result<(), CliError> {
    let mut settings = ConverterSettings::discover(args.settings.as_deref())?;
    args.apply(&mut settings);

    let mut scene = load_scene(&args.scene)?;
    if settings.probe_images {
        probe_images(&mut scene, &args.scene, &settings);
    }

    let mut run = ConversionRun::new(settings.to_options());
    let report = run.convert_scene(&mut scene)?;

    let output = args.output.clone().unwrap_or_else(|| default_output(&args.scene));
    save_scene(&scene, &output)?;
    tracing::info!(
        "Wrote {} ({} materials converted)",
        output.display(),
        report.unique_materials
    );
    Ok(())
}

/// `matbridge inspect`
pub fn inspect(args: InspectArgs) -> Result<(), CliError> {
    let mut settings = ConverterSettings::discover(args.settings.as_deref())?;
    if args.probe_images {
        settings.probe_images = true;
    }

    let mut scene = load_scene(&args.scene)?;
    if settings.probe_images {
        probe_images(&mut scene, &args.scene, &settings);
    }

    print!("{}", describe_scene(&scene, &settings.inference()));
    Ok(())
}

/// One block per material listing its inferred roles
fn describe_scene(scene: &SceneDocument, config: &InferenceConfig) -> String {
    let mut out = String::new();
    for material in scene.materials.values() {
        let roles = infer_roles(material, config);
        let _ = writeln!(out, "{}", material.name);
        describe_roles(&mut out, &roles);
    }
    out
}

fn describe_roles(out: &mut String, roles: &RoleResult) {
    let base = roles.base_color.as_ref().map_or("-", |s| s.name.as_str());
    let alpha = match &roles.alpha {
        AlphaSource::None => "-".to_string(),
        AlphaSource::FromBaseAlpha => "base color alpha".to_string(),
        AlphaSource::SeparateImage(source) => source.name.clone(),
    };
    let normal = roles.normal.as_ref().map_or("-", |n| n.image.name.as_str());

    let emission = &roles.emission;
    let emission = if !emission.is_emissive() {
        "-".to_string()
    } else if let Some(image) = &emission.image {
        format!("{} x{}", image.name, emission.strength)
    } else {
        let [r, g, b, _] = emission.color;
        format!("({r:.3}, {g:.3}, {b:.3}) x{}", emission.strength)
    };

    let _ = writeln!(out, "  base color: {base}");
    let _ = writeln!(out, "  alpha:      {alpha}");
    let _ = writeln!(out, "  normal:     {normal}");
    let _ = writeln!(out, "  emission:   {emission}");
}
