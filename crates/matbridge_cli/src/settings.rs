// SPDX-License-Identifier: MIT OR Apache-2.0
//! Converter settings file.
//!
//! Settings are stored as RON next to the scenes they apply to. Every field
//! has a default, so a settings file only needs the values it changes:
//!
//! ```ron
//! (
//!     target: Toon,
//!     ramp: (center: 0.55, softness: 0.05),
//! )
//! ```

use matbridge_convert::{
    AlphaBlendPolicy, AlphaHeuristics, ConversionOptions, InferenceConfig, Scope,
    SynthesisConfig, TargetModel, ToonRamp,
};
use matbridge_convert::config::DEFAULT_TRACE_DEPTH;
use matbridge_graph::ShaderSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::CliError;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file picked up from the working directory when present
pub const SETTINGS_FILE_NAME: &str = "matbridge.ron";

/// Complete converter settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// Settings format version
    pub version: u32,
    /// Target rendering model
    pub target: TargetModel,
    /// Which objects to convert
    pub scope: Scope,
    /// Convert copies instead of the originals
    pub create_new: bool,
    /// Reconvert marker-named materials, in place when not creating copies
    pub overwrite: bool,
    /// Marker prefix; the target's default when unset
    pub marker_prefix: Option<String>,
    /// Transparency handling for the path-traced target
    pub alpha_blend: AlphaBlendPolicy,
    /// Alpha cutoff
    pub clip_threshold: f32,
    /// Toon lighting ramp
    pub ramp: ToonRamp,
    /// Node schema generation of the host
    pub schema: ShaderSchema,
    /// Hop budget of upstream image traces
    pub trace_depth: usize,
    /// Alpha-channel proxies
    pub alpha: AlphaHeuristics,
    /// Refresh image channel metadata from disk before converting
    pub probe_images: bool,
    /// Directory searched for images whose recorded path is missing
    pub image_dir: Option<PathBuf>,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            target: TargetModel::default(),
            scope: Scope::default(),
            create_new: true,
            overwrite: false,
            marker_prefix: None,
            alpha_blend: AlphaBlendPolicy::default(),
            clip_threshold: 0.5,
            ramp: ToonRamp::default(),
            schema: ShaderSchema::default(),
            trace_depth: DEFAULT_TRACE_DEPTH,
            alpha: AlphaHeuristics::default(),
            probe_images: false,
            image_dir: None,
        }
    }
}

impl ConverterSettings {
    /// Parse settings from RON, rejecting newer format versions
    pub fn from_ron(s: &str) -> Result<Self, CliError> {
        let settings: ConverterSettings = ron::from_str(s)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(CliError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, CliError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
        Self::from_ron(&content)
    }

    /// Load `path` when given, else the settings file in the working
    /// directory if there is one, else defaults
    pub fn discover(path: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let local = Path::new(SETTINGS_FILE_NAME);
        if local.is_file() {
            tracing::debug!("Using settings from {}", local.display());
            Self::load(local)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        let content = self.to_ron()?;
        std::fs::write(path, content).map_err(|e| CliError::io(path, e))
    }

    /// Conversion options for a run
    pub fn to_options(&self) -> ConversionOptions {
        ConversionOptions {
            scope: self.scope,
            create_new: self.create_new,
            overwrite: self.overwrite,
            marker_prefix: self.marker_prefix.clone(),
            synthesis: SynthesisConfig {
                target: self.target,
                alpha_blend: self.alpha_blend,
                clip_threshold: self.clip_threshold,
                ramp: self.ramp,
                schema: self.schema,
            },
            inference: self.inference(),
        }
    }

    /// Inference parameters
    pub fn inference(&self) -> InferenceConfig {
        InferenceConfig {
            max_depth: self.trace_depth,
            alpha: self.alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ConverterSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.to_options(), ConversionOptions::default());
    }

    #[test]
    fn test_serialization() {
        let mut settings = ConverterSettings::default();
        settings.target = TargetModel::ToonUnlit;
        settings.marker_prefix = Some("FLAT_".to_string());
        settings.ramp.center = 0.4;

        let ron_str = settings.to_ron().unwrap();
        let loaded = ConverterSettings::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = ConverterSettings::from_ron("(target: Toon, ramp: (softness: 0.1))").unwrap();
        assert_eq!(settings.target, TargetModel::Toon);
        assert!((settings.ramp.softness - 0.1).abs() < 1e-6);
        assert!((settings.ramp.center - 0.62).abs() < 1e-6);
        assert!(settings.create_new);

        let options = settings.to_options();
        assert_eq!(options.marker_prefix(), "VRM_TOON_");
        assert_eq!(options.inference.max_depth, DEFAULT_TRACE_DEPTH);
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = ConverterSettings::from_ron("(version: 99)");
        assert!(matches!(result, Err(CliError::UnsupportedVersion { found: 99, .. })));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("matbridge-settings-{}.ron", std::process::id()));
        let mut settings = ConverterSettings::default();
        settings.overwrite = true;
        settings.save(&path).unwrap();

        let loaded = ConverterSettings::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(loaded.overwrite);
    }
}
