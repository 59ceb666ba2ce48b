// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph synthesis: rebuild a material's graph for a target model from
//! inferred roles.
//!
//! Synthesis clears the target graph and never reads it back, so the same
//! material can serve as source and target when roles were inferred first.

mod builder;
mod path_traced;
mod toon;

pub use builder::GraphBuilder;

use matbridge_graph::graphs::shader::{EMISSION_COLOR_INPUTS, EMISSION_STRENGTH_INPUT};
use matbridge_graph::{
    BlendMode, ColorSpace, Material, MaterialSettings, MathOperation, NodeId, NodeKind, PortValue,
    ShadowMode,
};

use crate::config::{AlphaBlendPolicy, SynthesisConfig, TargetModel};
use crate::roles::{AlphaSource, EmissionSource, NormalSource, RoleResult};

pub(crate) const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// How transparency ended up wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaWiring {
    /// Opaque surface
    #[default]
    None,
    /// Alpha drives a transparent/shader mix factor
    ShaderMix,
    /// Alpha thresholded into a 0/1 mask
    Mask,
    /// Transparency was inferred but nothing could drive it; fully opaque factor
    Unresolved,
}

/// What a synthesis pass produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SynthesisSummary {
    /// How transparency was wired
    pub alpha: AlphaWiring,
    /// Normal texture wired through a normal-map node
    pub normal: bool,
    /// Emission wired into the principal shader
    pub emission: bool,
    /// Nodes added to the target graph
    pub nodes_created: usize,
    /// Links added to the target graph
    pub links_created: usize,
}

/// Role wiring reported by the per-target builders
#[derive(Debug, Clone, Copy, Default)]
struct Wiring {
    alpha: AlphaWiring,
    normal: bool,
    emission: bool,
}

/// Rebuild `material`'s graph and render flags for `config.target`
pub fn synthesize(material: &mut Material, roles: &RoleResult, config: &SynthesisConfig) -> SynthesisSummary {
    let mut builder = GraphBuilder::new(&mut material.graph, config.schema);

    let wiring = match config.target {
        TargetModel::PathTraced => path_traced::build(&mut builder, roles),
        TargetModel::Toon => toon::build(&mut builder, roles, config, toon::Shading::Principled),
        TargetModel::ToonUnlit => toon::build(&mut builder, roles, config, toon::Shading::Unlit),
    };

    let summary = SynthesisSummary {
        alpha: wiring.alpha,
        normal: wiring.normal,
        emission: wiring.emission,
        nodes_created: builder.nodes_created(),
        links_created: builder.links_created(),
    };

    apply_settings(&mut material.settings, config, roles.alpha.is_some());

    tracing::debug!(
        "Synthesized '{}' for {:?}: {} nodes, {} links, alpha {:?}",
        material.name,
        config.target,
        summary.nodes_created,
        summary.links_created,
        summary.alpha,
    );
    summary
}

fn apply_settings(settings: &mut MaterialSettings, config: &SynthesisConfig, has_alpha: bool) {
    // Mask-style export: binary alpha, visible from both sides
    if config.target.uses_mask_alpha() {
        settings.blend_mode = BlendMode::Clip;
        settings.shadow_mode = ShadowMode::Clip;
        settings.alpha_cutoff = config.clip_threshold();
        settings.backface_culling = false;
        return;
    }

    if !has_alpha {
        settings.blend_mode = BlendMode::Opaque;
        settings.shadow_mode = ShadowMode::Opaque;
        return;
    }

    let (blend, shadow) = match config.alpha_blend {
        AlphaBlendPolicy::Blend => (BlendMode::Blend, ShadowMode::Hashed),
        AlphaBlendPolicy::Hashed => (BlendMode::Hashed, ShadowMode::Hashed),
        AlphaBlendPolicy::Clip => (BlendMode::Clip, ShadowMode::Clip),
    };
    settings.blend_mode = blend;
    settings.shadow_mode = shadow;
    if config.alpha_blend == AlphaBlendPolicy::Clip {
        settings.alpha_cutoff = config.clip_threshold();
    }
}

/// Output socket carrying the inferred alpha, creating the separate alpha
/// image when needed. `None` when nothing can drive transparency.
fn alpha_output(
    builder: &mut GraphBuilder<'_>,
    alpha: &AlphaSource,
    base_tex: Option<NodeId>,
    position: [f32; 2],
) -> Option<(NodeId, &'static str)> {
    let node = match alpha {
        AlphaSource::None => return None,
        AlphaSource::FromBaseAlpha => base_tex?,
        AlphaSource::SeparateImage(source) => {
            builder.add_image(source, ColorSpace::NonColor, "Alpha Tex", position)
        }
    };

    // Color works as a luminance proxy on textures without an alpha socket
    let socket = if builder.has_output(node, "Alpha") { "Alpha" } else { "Color" };
    Some((node, socket))
}

/// Greater-than threshold producing a 0/1 mask from the inferred alpha
fn alpha_mask(
    builder: &mut GraphBuilder<'_>,
    alpha: &AlphaSource,
    base_tex: Option<NodeId>,
    threshold: f32,
    layout: &MaskLayout,
) -> Option<NodeId> {
    let (source, socket) = alpha_output(builder, alpha, base_tex, layout.texture)?;

    let compare = builder.add(NodeKind::Math(MathOperation::GreaterThan), layout.threshold);
    builder.set_at(compare, 1, PortValue::Float(threshold));

    if socket == "Alpha" {
        builder.link_at(source, "Alpha", compare, 0);
    } else {
        let bw = builder.add(NodeKind::RgbToBw, layout.luminance);
        builder.link(source, "Color", bw, "Color");
        builder.link_at(bw, "Val", compare, 0);
    }
    Some(compare)
}

struct MaskLayout {
    texture: [f32; 2],
    luminance: [f32; 2],
    threshold: [f32; 2],
}

/// Image -> normal map -> shader Normal, when the shader takes a normal
fn wire_normal(
    builder: &mut GraphBuilder<'_>,
    normal: Option<&NormalSource>,
    shader: NodeId,
    positions: ([f32; 2], [f32; 2]),
) -> bool {
    let Some(normal) = normal else {
        return false;
    };
    if !builder.has_input(shader, "Normal") {
        tracing::trace!("Principal shader takes no normal, normal texture '{}' skipped", normal.image.name);
        return false;
    }

    let tex = builder.add_image(&normal.image, ColorSpace::NonColor, "Normal Tex", positions.0);
    let normal_map = builder.add(NodeKind::NormalMap, positions.1);
    let decoded = builder.link(tex, "Color", normal_map, "Color");
    let applied = builder.link(normal_map, "Normal", shader, "Normal");
    decoded && applied
}

/// Emission texture or color into the shader's emission input (either schema
/// name). Without emission the strength is forced to exactly 0.
fn wire_emission(
    builder: &mut GraphBuilder<'_>,
    emission: &EmissionSource,
    shader: NodeId,
    tex_position: [f32; 2],
) -> bool {
    if !emission.is_emissive() {
        builder.set(shader, EMISSION_STRENGTH_INPUT, PortValue::Float(0.0));
        return false;
    }

    match builder.input_any(shader, &EMISSION_COLOR_INPUTS) {
        Some(input) => match &emission.image {
            Some(source) => {
                let tex = builder.add_image(source, ColorSpace::Srgb, "Emission Tex", tex_position);
                builder.link(tex, "Color", shader, &input);
            }
            None => {
                builder.set(shader, &input, PortValue::Color(emission.color));
            }
        },
        None => tracing::trace!("Principal shader has no emission color input"),
    }

    builder.set(shader, EMISSION_STRENGTH_INPUT, PortValue::Float(emission.strength.max(1.0)));
    true
}
