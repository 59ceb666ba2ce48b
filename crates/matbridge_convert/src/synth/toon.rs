// SPDX-License-Identifier: MIT OR Apache-2.0
//! Toon graphs: a two-stop lighting ramp multiplied into the base color.
//!
//! The lighting factor comes from a white diffuse shader converted to color
//! and then to gray; the ramp bands it into shadow and lit tones. Alpha is
//! always a 0/1 mask so cutout exporters see a binary surface.

use matbridge_graph::graphs::shader::SPECULAR_INPUTS;
use matbridge_graph::{
    ColorRamp, ColorSpace, MixBlend, NodeId, NodeKind, PortValue, RampInterpolation, RampStop,
};

use super::{alpha_mask, wire_emission, wire_normal, AlphaWiring, GraphBuilder, MaskLayout, Wiring, WHITE};
use crate::config::{SynthesisConfig, ToonRamp};
use crate::roles::{EmissionSource, RoleResult};

const OUTPUT: [f32; 2] = [900.0, 0.0];
const SHADER: [f32; 2] = [600.0, 0.0];
const MIX: [f32; 2] = [750.0, -80.0];
const TRANSPARENT: [f32; 2] = [600.0, -220.0];
const BASE_TEX: [f32; 2] = [-800.0, 120.0];
const EMISSION_TEX: [f32; 2] = [-800.0, 320.0];
const NORMAL_TEX: [f32; 2] = [-800.0, -420.0];
const NORMAL_MAP: [f32; 2] = [-560.0, -420.0];
const DIFFUSE: [f32; 2] = [-650.0, -140.0];
const SHADER_TO_RGB: [f32; 2] = [-430.0, -140.0];
const RGB_TO_BW: [f32; 2] = [-250.0, -140.0];
const RAMP: [f32; 2] = [-70.0, -140.0];
const MULTIPLY: [f32; 2] = [180.0, 20.0];
const EMISSION_SCALE: [f32; 2] = [-560.0, 320.0];
const EMISSION_ADD: [f32; 2] = [400.0, 120.0];
const MASK: MaskLayout = MaskLayout {
    texture: [-800.0, -40.0],
    luminance: [-240.0, 60.0],
    threshold: [-40.0, 60.0],
};

/// Principal shader of a toon graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Shading {
    /// Matte principled shader; lit by the scene, exportable as PBR
    Principled,
    /// Emission shader; flat color regardless of scene lighting
    Unlit,
}

/// Two-stop EASE ramp from shadow gray to white
fn lighting_ramp(ramp: &ToonRamp) -> ColorRamp {
    let (low, high) = ramp.stops();
    let shadow = ramp.shadow();
    ColorRamp {
        interpolation: RampInterpolation::Ease,
        stops: vec![
            RampStop { position: low, color: [shadow, shadow, shadow, 1.0] },
            RampStop { position: high, color: WHITE },
        ],
    }
}

/// Lit color plus emission, for shaders with no emission input of their own.
///
/// Returns the node whose `Color` output carries the sum, or `lit` itself
/// when the surface does not glow.
fn add_emission(builder: &mut GraphBuilder<'_>, emission: &EmissionSource, lit: NodeId) -> (NodeId, bool) {
    if !emission.is_emissive() {
        return (lit, false);
    }

    let strength = emission.strength.max(1.0);
    let add = builder.add(NodeKind::MixRgb(MixBlend::Add), EMISSION_ADD);
    builder.set(add, "Fac", PortValue::Float(1.0));
    builder.link(lit, "Color", add, "Color1");

    match &emission.image {
        Some(source) => {
            let tex = builder.add_image(source, ColorSpace::Srgb, "Emission Tex", EMISSION_TEX);
            if strength > 1.0 {
                let scale = builder.add(NodeKind::MixRgb(MixBlend::Multiply), EMISSION_SCALE);
                builder.set(scale, "Fac", PortValue::Float(1.0));
                builder.link(tex, "Color", scale, "Color1");
                builder.set(scale, "Color2", PortValue::Color([strength, strength, strength, 1.0]));
                builder.link(scale, "Color", add, "Color2");
            } else {
                builder.link(tex, "Color", add, "Color2");
            }
        }
        None => {
            let [r, g, b, _] = emission.color;
            builder.set(
                add,
                "Color2",
                PortValue::Color([r * strength, g * strength, b * strength, 1.0]),
            );
        }
    }
    (add, true)
}

pub(super) fn build(
    builder: &mut GraphBuilder<'_>,
    roles: &RoleResult,
    config: &SynthesisConfig,
    shading: Shading,
) -> Wiring {
    let output = builder.add(NodeKind::MaterialOutput, OUTPUT);
    let base_tex = roles
        .base_color
        .as_ref()
        .map(|source| builder.add_image(source, ColorSpace::Srgb, "Base Color Tex", BASE_TEX));

    // Lighting factor
    let diffuse = builder.add(NodeKind::DiffuseBsdf, DIFFUSE);
    builder.set(diffuse, "Color", PortValue::Color(WHITE));
    let to_rgb = builder.add(NodeKind::ShaderToRgb, SHADER_TO_RGB);
    let to_bw = builder.add(NodeKind::RgbToBw, RGB_TO_BW);
    let ramp = builder.add(NodeKind::ColorRamp(lighting_ramp(&config.ramp)), RAMP);
    builder.link(diffuse, "BSDF", to_rgb, "Shader");
    builder.link(to_rgb, "Color", to_bw, "Color");
    builder.link(to_bw, "Val", ramp, "Fac");

    let multiply = builder.add(NodeKind::MixRgb(MixBlend::Multiply), MULTIPLY);
    builder.set(multiply, "Fac", PortValue::Float(1.0));
    match base_tex {
        Some(tex) => {
            builder.link(tex, "Color", multiply, "Color1");
        }
        None => {
            builder.set(multiply, "Color1", PortValue::Color(WHITE));
        }
    }
    builder.link(ramp, "Color", multiply, "Color2");

    let mask = alpha_mask(builder, &roles.alpha, base_tex, config.clip_threshold(), &MASK);
    let alpha = match mask {
        Some(_) => AlphaWiring::Mask,
        None if roles.alpha.is_some() => AlphaWiring::Unresolved,
        None => AlphaWiring::None,
    };

    match shading {
        Shading::Principled => {
            let shader = builder.add_labeled(NodeKind::PrincipledBsdf, "Toon Output", SHADER);
            builder.set(shader, "Metallic", PortValue::Float(0.0));
            builder.set(shader, "Roughness", PortValue::Float(1.0));
            builder.set_any(shader, &SPECULAR_INPUTS, PortValue::Float(0.0));
            builder.link(multiply, "Color", shader, "Base Color");

            let normal = wire_normal(builder, roles.normal.as_ref(), shader, (NORMAL_TEX, NORMAL_MAP));
            let emission = wire_emission(builder, &roles.emission, shader, EMISSION_TEX);

            builder.set(shader, "Alpha", PortValue::Float(1.0));
            if let Some(mask) = mask {
                builder.link(mask, "Value", shader, "Alpha");
            }
            builder.link(shader, "BSDF", output, "Surface");

            Wiring {
                alpha,
                normal,
                emission,
            }
        }
        Shading::Unlit => {
            let shader = builder.add_labeled(NodeKind::Emission, "Toon Output", SHADER);
            let (color, emission) = add_emission(builder, &roles.emission, multiply);
            builder.link(color, "Color", shader, "Color");
            builder.set(shader, "Strength", PortValue::Float(1.0));

            let normal = wire_normal(builder, roles.normal.as_ref(), shader, (NORMAL_TEX, NORMAL_MAP));

            // The emission shader has no alpha input; mask through a shader mix
            match mask {
                Some(mask) => {
                    let transparent = builder.add(NodeKind::TransparentBsdf, TRANSPARENT);
                    let mix = builder.add(NodeKind::MixShader, MIX);
                    builder.link(mask, "Value", mix, "Fac");
                    builder.link_at(transparent, "BSDF", mix, 1);
                    builder.link_at(shader, "Emission", mix, 2);
                    builder.link(mix, "Shader", output, "Surface");
                }
                None => {
                    builder.link(shader, "Emission", output, "Surface");
                }
            }

            Wiring {
                alpha,
                normal,
                emission,
            }
        }
    }
}
