// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plain PBR graph for a path tracer.
//!
//! ```text
//! image ──► principled ──► [mix(transparent, principled)] ──► output
//!             ▲   ▲
//!  normal map ┘   └ emission
//! ```

use matbridge_graph::{ColorSpace, NodeKind, PortValue};

use super::{alpha_output, wire_emission, wire_normal, AlphaWiring, GraphBuilder, Wiring};
use crate::roles::RoleResult;

const OUTPUT: [f32; 2] = [600.0, 0.0];
const PRINCIPLED: [f32; 2] = [250.0, 0.0];
const BASE_TEX: [f32; 2] = [-200.0, 0.0];
const ALPHA_TEX: [f32; 2] = [-200.0, -140.0];
const NORMAL_TEX: [f32; 2] = [-200.0, -280.0];
const NORMAL_MAP: [f32; 2] = [40.0, -280.0];
const EMISSION_TEX: [f32; 2] = [-200.0, 200.0];
const TRANSPARENT: [f32; 2] = [250.0, -220.0];
const MIX: [f32; 2] = [420.0, -80.0];

pub(super) fn build(builder: &mut GraphBuilder<'_>, roles: &RoleResult) -> Wiring {
    let output = builder.add(NodeKind::MaterialOutput, OUTPUT);
    let principled = builder.add(NodeKind::PrincipledBsdf, PRINCIPLED);
    builder.set(principled, "Roughness", PortValue::Float(0.5));
    builder.set(principled, "Metallic", PortValue::Float(0.0));

    let base_tex = roles.base_color.as_ref().map(|source| {
        let tex = builder.add_image(source, ColorSpace::Srgb, "Base Color Tex", BASE_TEX);
        builder.link(tex, "Color", principled, "Base Color");
        tex
    });

    let normal = wire_normal(builder, roles.normal.as_ref(), principled, (NORMAL_TEX, NORMAL_MAP));
    let emission = wire_emission(builder, &roles.emission, principled, EMISSION_TEX);

    let alpha = if roles.alpha.is_some() {
        // Factor 0 is fully transparent, 1 fully principled
        let transparent = builder.add(NodeKind::TransparentBsdf, TRANSPARENT);
        let mix = builder.add(NodeKind::MixShader, MIX);
        builder.link_at(transparent, "BSDF", mix, 1);
        builder.link_at(principled, "BSDF", mix, 2);
        builder.link(mix, "Shader", output, "Surface");

        match alpha_output(builder, &roles.alpha, base_tex, ALPHA_TEX) {
            Some((source, socket)) => {
                builder.link(source, socket, mix, "Fac");
                AlphaWiring::ShaderMix
            }
            None => {
                builder.set(mix, "Fac", PortValue::Float(1.0));
                AlphaWiring::Unresolved
            }
        }
    } else {
        builder.link(principled, "BSDF", output, "Surface");
        AlphaWiring::None
    };

    Wiring {
        alpha,
        normal,
        emission,
    }
}
