// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion configuration.
//!
//! All knobs are passed explicitly into a run; nothing here is global.

use matbridge_graph::ShaderSchema;
use serde::{Deserialize, Serialize};

/// Default hop budget for upstream image traces
pub const DEFAULT_TRACE_DEPTH: usize = 12;

/// Upper bound of the toon ramp half-width
pub const MAX_RAMP_SOFTNESS: f32 = 0.2;

/// Rendering back-end the synthesized graph targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TargetModel {
    /// Plain PBR for a path tracer; transparency through a transparent/shader mix
    #[default]
    PathTraced,
    /// Rasterizer toon: lighting ramp multiplied into a principled base color,
    /// mask-style alpha for cutout export
    Toon,
    /// Flat toon: lighting ramp multiplied into an emission-only shader
    ToonUnlit,
}

impl TargetModel {
    /// Name prefix marking materials produced for this target
    pub fn default_marker_prefix(self) -> &'static str {
        match self {
            Self::PathTraced => "VRM_SIMPLE_",
            Self::Toon | Self::ToonUnlit => "VRM_TOON_",
        }
    }

    /// Whether this target thresholds alpha into a binary mask
    pub fn uses_mask_alpha(self) -> bool {
        matches!(self, Self::Toon | Self::ToonUnlit)
    }
}

/// Transparency handling for targets that keep continuous alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AlphaBlendPolicy {
    /// Hard cutout at the clip threshold
    Clip,
    /// Dithered transparency
    Hashed,
    /// Smooth blending
    #[default]
    Blend,
}

/// Two-stop lighting ramp for toon targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToonRamp {
    /// Light/shadow boundary in [0, 1]
    pub center: f32,
    /// Half-width of the transition in [0, 0.2]
    pub softness: f32,
    /// Gray level of the shadow band in [0, 1]
    pub shadow_brightness: f32,
}

impl Default for ToonRamp {
    fn default() -> Self {
        Self {
            center: 0.62,
            softness: 0.02,
            shadow_brightness: 0.25,
        }
    }
}

impl ToonRamp {
    /// Stop positions `(center - softness, center + softness)`, clamped.
    ///
    /// Always satisfies `0 <= low <= high <= 1`; NaN inputs collapse to 0.
    pub fn stops(&self) -> (f32, f32) {
        let center = self.center.max(0.0).min(1.0);
        let softness = self.softness.max(0.0).min(MAX_RAMP_SOFTNESS);
        let low = (center - softness).max(0.0).min(1.0);
        let high = (center + softness).max(0.0).min(1.0);
        (low, high)
    }

    /// Shadow band gray level, clamped to [0, 1]
    pub fn shadow(&self) -> f32 {
        self.shadow_brightness.max(0.0).min(1.0)
    }
}

/// Target-model parameters for graph synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Rendering model to build for
    pub target: TargetModel,
    /// Applies to [`TargetModel::PathTraced`]; toon targets always clip
    pub alpha_blend: AlphaBlendPolicy,
    /// Alpha cutoff in [0, 1]
    pub clip_threshold: f32,
    /// Lighting ramp of toon targets
    pub ramp: ToonRamp,
    /// Socket naming generation of the target host
    pub schema: ShaderSchema,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self::for_target(TargetModel::default())
    }
}

impl SynthesisConfig {
    /// Defaults for a target model
    pub fn for_target(target: TargetModel) -> Self {
        Self {
            target,
            alpha_blend: AlphaBlendPolicy::default(),
            clip_threshold: 0.5,
            ramp: ToonRamp::default(),
            schema: ShaderSchema::default(),
        }
    }

    /// Alpha cutoff, clamped to [0, 1]
    pub fn clip_threshold(&self) -> f32 {
        self.clip_threshold.max(0.0).min(1.0)
    }
}

/// Proxies used to guess that a base-color image carries alpha.
///
/// None of these inspect the actual channel contents. They are named
/// individually so a caller can disable any proxy it does not trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaHeuristics {
    /// Image reports four channels
    pub channel_count: bool,
    /// Image has a straight/premultiplied/packed alpha mode
    pub alpha_mode_flag: bool,
    /// Image reports 32 or more bits per pixel. Ignored for images whose
    /// metadata was probed from the file.
    pub bit_depth_proxy: bool,
    /// Any base-color image is assumed to carry alpha. Off by default: it
    /// turns every textured opaque material transparent.
    pub base_image_fallback: bool,
}

impl Default for AlphaHeuristics {
    fn default() -> Self {
        Self {
            channel_count: true,
            alpha_mode_flag: true,
            bit_depth_proxy: true,
            base_image_fallback: false,
        }
    }
}

/// Role inference parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Hop budget of upstream image traces; a hard cap
    pub max_depth: usize,
    /// Weak alpha proxies to honor
    pub alpha: AlphaHeuristics,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_TRACE_DEPTH,
            alpha: AlphaHeuristics::default(),
        }
    }
}

/// Which objects a run visits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Scope {
    /// Selected objects only
    #[default]
    Selected,
    /// Every object in the scene
    Scene,
}

/// Options of a conversion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Objects to visit
    pub scope: Scope,
    /// Duplicate materials and convert the copies, leaving originals intact
    pub create_new: bool,
    /// Convert materials that already carry the marker prefix, and rebuild
    /// in place when `create_new` is off
    pub overwrite: bool,
    /// Marker prefix; defaults per target model
    pub marker_prefix: Option<String>,
    /// Target graph parameters
    pub synthesis: SynthesisConfig,
    /// Role inference parameters
    pub inference: InferenceConfig,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self::for_target(TargetModel::default())
    }
}

impl ConversionOptions {
    /// Defaults for a target model
    pub fn for_target(target: TargetModel) -> Self {
        Self {
            scope: Scope::default(),
            create_new: true,
            overwrite: false,
            marker_prefix: None,
            synthesis: SynthesisConfig::for_target(target),
            inference: InferenceConfig::default(),
        }
    }

    /// Effective marker prefix
    pub fn marker_prefix(&self) -> &str {
        self.marker_prefix
            .as_deref()
            .unwrap_or_else(|| self.synthesis.target.default_marker_prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_ramp_stops() {
        let (low, high) = ToonRamp::default().stops();
        assert!((low - 0.60).abs() < 1e-6);
        assert!((high - 0.64).abs() < 1e-6);
    }

    #[test]
    fn test_ramp_clamps_out_of_range_inputs() {
        let ramp = ToonRamp { center: 1.5, softness: 0.9, shadow_brightness: -1.0 };
        let (low, high) = ramp.stops();
        assert!((low - 0.8).abs() < 1e-6);
        assert_eq!(high, 1.0);
        assert_eq!(ramp.shadow(), 0.0);

        let nan = ToonRamp { center: f32::NAN, softness: f32::NAN, shadow_brightness: 0.5 };
        assert_eq!(nan.stops(), (0.0, 0.0));
    }

    #[test]
    fn test_marker_prefix_follows_target() {
        assert_eq!(ConversionOptions::for_target(TargetModel::PathTraced).marker_prefix(), "VRM_SIMPLE_");
        assert_eq!(ConversionOptions::for_target(TargetModel::Toon).marker_prefix(), "VRM_TOON_");

        let mut options = ConversionOptions::default();
        options.marker_prefix = Some("CONV_".to_string());
        assert_eq!(options.marker_prefix(), "CONV_");
    }

    #[test]
    fn test_only_toon_targets_mask_alpha() {
        assert!(!TargetModel::PathTraced.uses_mask_alpha());
        assert!(TargetModel::Toon.uses_mask_alpha());
        assert!(TargetModel::ToonUnlit.uses_mask_alpha());
    }

    #[test]
    fn test_heuristics_default_to_channel_metadata_only() {
        let alpha = ConversionOptions::for_target(TargetModel::PathTraced).inference.alpha;
        assert!(alpha.channel_count && alpha.alpha_mode_flag && alpha.bit_depth_proxy);
        assert!(!alpha.base_image_fallback);
    }

    proptest! {
        #[test]
        fn prop_ramp_stops_ordered_within_unit_range(c in 0.0f32..=1.0, s in 0.0f32..=0.2) {
            let (low, high) = ToonRamp { center: c, softness: s, shadow_brightness: 0.25 }.stops();
            prop_assert!(0.0 <= low);
            prop_assert!(low <= high);
            prop_assert!(high <= 1.0);
        }

        #[test]
        fn prop_ramp_stops_ordered_for_any_input(c in any::<f32>(), s in any::<f32>()) {
            let (low, high) = ToonRamp { center: c, softness: s, shadow_brightness: 0.25 }.stops();
            prop_assert!(0.0 <= low && low <= high && high <= 1.0);
        }
    }
}
