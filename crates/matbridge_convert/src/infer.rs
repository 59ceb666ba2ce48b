// SPDX-License-Identifier: MIT OR Apache-2.0
//! Role inference: classify which nodes supply base color, alpha, normal
//! and emission.
//!
//! Every rule degrades to the next-priority rule; inference never fails.

use matbridge_graph::graphs::shader::{EMISSION_COLOR_INPUTS, EMISSION_STRENGTH_INPUT};
use matbridge_graph::{BlendMode, Material, Node, NodeKind, Port, PortType, PortValue, ShaderGraph};

use crate::config::InferenceConfig;
use crate::roles::{
    is_black, AlphaSource, EmissionSource, ImageSource, NormalSource, RoleResult, BLACK,
};
use crate::trace::UpstreamTrace;

/// Name fragments suggesting a base-color texture
pub const BASE_COLOR_KEYWORDS: [&str; 6] = ["main", "base", "albedo", "color", "maintex", "diffuse"];

/// Name fragments suggesting a dedicated alpha texture
pub const ALPHA_KEYWORDS: [&str; 3] = ["alpha", "opacity", "transparent"];

/// Name fragments of emission inputs on grouped sub-graphs (spaces removed)
pub const EMISSION_KEYWORDS: [&str; 4] = ["emission", "emissioncolor", "emissionfactor", "emissive"];

fn name_matches(node: &Node, keywords: &[&str]) -> bool {
    let name = node.name.to_lowercase();
    keywords.iter().any(|k| name.contains(k))
}

fn is_color_shader(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::DiffuseBsdf
            | NodeKind::PrincipledBsdf
            | NodeKind::Emission
            | NodeKind::GlossyBsdf
            | NodeKind::ToonBsdf
    )
}

fn static_color(port: &Port) -> Option<[f32; 4]> {
    port.default_value.as_ref()?.as_rgba()
}

fn static_float(port: &Port) -> Option<f32> {
    port.default_value.as_ref()?.as_float()
}

/// Role inference over one material's graph
pub struct RoleInference<'a> {
    material: &'a Material,
    config: InferenceConfig,
}

impl<'a> RoleInference<'a> {
    /// Create an inference pass over `material`
    pub fn new(material: &'a Material, config: InferenceConfig) -> Self {
        Self { material, config }
    }

    fn graph(&self) -> &'a ShaderGraph {
        &self.material.graph
    }

    fn principled(&self) -> Option<&'a Node> {
        self.graph().find_node(|n| matches!(n.kind, NodeKind::PrincipledBsdf))
    }

    /// Trace a possibly absent port; each call starts a fresh visited set
    fn trace(&self, port: Option<&Port>) -> Option<&'a Node> {
        let port = port?;
        UpstreamTrace::new(self.graph(), self.config.max_depth).find_image(port.id)
    }

    /// Infer all four roles
    pub fn infer(&self) -> RoleResult {
        let base_node = self.base_color();
        let alpha = self.alpha(base_node);
        let normal = self.normal();
        let emission = self.emission();
        let base_color = base_node.and_then(ImageSource::from_node);

        tracing::debug!(
            "Roles for '{}': base={:?} alpha={} normal={:?} emission={}x{}{}",
            self.material.name,
            base_color.as_ref().map(|s| s.name.as_str()),
            match &alpha {
                AlphaSource::None => "none".to_string(),
                AlphaSource::FromBaseAlpha => "base".to_string(),
                AlphaSource::SeparateImage(src) => format!("image '{}'", src.name),
            },
            normal.as_ref().map(|n| n.image.name.as_str()),
            emission.strength,
            if is_black(emission.color) { " (black)" } else { "" },
            if emission.image.is_some() { " +texture" } else { "" },
        );

        RoleResult {
            base_color,
            alpha,
            normal,
            emission,
        }
    }

    /// Base-color image node, by descending rule priority
    pub fn base_color(&self) -> Option<&'a Node> {
        let graph = self.graph();

        if let Some(image) = self.principled().and_then(|p| self.trace(p.input("Base Color"))) {
            return Some(image);
        }

        for shader in graph.nodes_where(is_color_shader) {
            for key in ["Color", "Base Color"] {
                if let Some(image) = self.trace(shader.input(key)) {
                    return Some(image);
                }
            }
        }

        graph
            .nodes()
            .filter(|n| n.has_image())
            .find(|n| name_matches(n, &BASE_COLOR_KEYWORDS))
            .or_else(|| graph.find_node(Node::has_image))
    }

    /// Alpha source given the chosen base-color node
    pub fn alpha(&self, base: Option<&Node>) -> AlphaSource {
        let base = base.and_then(Node::image_texture).and_then(|t| t.image.as_ref());

        if self.material.settings.blend_mode != BlendMode::Opaque && base.is_some() {
            return AlphaSource::FromBaseAlpha;
        }

        let separate = self
            .graph()
            .nodes()
            .filter(|n| n.has_image())
            .find(|n| name_matches(n, &ALPHA_KEYWORDS))
            .and_then(ImageSource::from_node);
        if let Some(source) = separate {
            return AlphaSource::SeparateImage(source);
        }

        let Some(image) = base else {
            return AlphaSource::None;
        };

        // Bit depth only stands in for alpha on host-reported metadata; a
        // probed 16-bit RGB image is 48 bpp without any alpha
        let heuristics = self.config.alpha;
        let carries_alpha = (heuristics.channel_count && image.channels == 4)
            || (heuristics.alpha_mode_flag && image.alpha_mode.is_flagged())
            || (heuristics.bit_depth_proxy && !image.probed && image.depth >= 32);

        if carries_alpha || heuristics.base_image_fallback {
            AlphaSource::FromBaseAlpha
        } else {
            AlphaSource::None
        }
    }

    /// First normal-map node whose color input traces to an image
    pub fn normal(&self) -> Option<NormalSource> {
        self.graph()
            .nodes_where(|k| matches!(k, NodeKind::NormalMap))
            .find_map(|normal_map| {
                let image = self.trace(normal_map.input("Color"))?;
                Some(NormalSource {
                    image: ImageSource::from_node(image)?,
                    normal_map: normal_map.id,
                })
            })
    }

    /// Emission color, strength and texture
    pub fn emission(&self) -> EmissionSource {
        self.principled_emission()
            .or_else(|| self.group_emission())
            .or_else(|| self.shader_emission())
            .unwrap_or_default()
    }

    fn principled_emission(&self) -> Option<EmissionSource> {
        let principled = self.principled()?;

        let mut color = BLACK;
        let mut image = None;
        if let Some(port) = principled.input_any(&EMISSION_COLOR_INPUTS) {
            color = static_color(port).unwrap_or(BLACK);
            image = self.trace(Some(port)).and_then(ImageSource::from_node);
        }

        let mut strength = principled
            .input(EMISSION_STRENGTH_INPUT)
            .and_then(static_float)
            .unwrap_or(0.0)
            .max(0.0);

        // A colored emission with zero strength is taken as implicit emission
        if strength == 0.0 && !is_black(color) {
            strength = 1.0;
        }

        (strength > 0.0 || image.is_some()).then_some(EmissionSource {
            color,
            strength,
            image,
        })
    }

    fn group_emission(&self) -> Option<EmissionSource> {
        for node in self.graph().nodes() {
            let NodeKind::Group(group) = &node.kind else {
                continue;
            };
            if group.tree.is_none() {
                continue;
            }

            for input in &node.inputs {
                let key = input.name.to_lowercase().replace(' ', "");
                if !EMISSION_KEYWORDS.iter().any(|k| key.contains(k)) {
                    continue;
                }
                if !matches!(input.port_type, PortType::Color | PortType::Vector3 | PortType::Vector4) {
                    continue;
                }
                let Some(color) = input.default_value.as_ref().and_then(PortValue::as_rgba) else {
                    continue;
                };
                if is_black(color) {
                    continue;
                }

                let image = self.trace(Some(input)).and_then(ImageSource::from_node);
                return Some(EmissionSource {
                    color,
                    strength: 1.0,
                    image,
                });
            }
        }
        None
    }

    fn shader_emission(&self) -> Option<EmissionSource> {
        self.graph()
            .nodes_where(|k| matches!(k, NodeKind::Emission))
            .find_map(|node| {
                let color_in = node.input("Color")?;
                let color = static_color(color_in).unwrap_or(BLACK);
                let strength = match node.input("Strength") {
                    Some(port) => static_float(port).unwrap_or(0.0),
                    None => 1.0,
                };
                let image = self.trace(Some(color_in)).and_then(ImageSource::from_node);

                (strength > 0.0 && (!is_black(color) || image.is_some())).then_some(EmissionSource {
                    color,
                    strength,
                    image,
                })
            })
    }
}

/// Infer the roles of `material`'s graph
pub fn infer_roles(material: &Material, config: &InferenceConfig) -> RoleResult {
    RoleInference::new(material, *config).infer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use matbridge_graph::{AlphaMode, ImageRef, ImageTexture, NodeGroup, Port};

    fn material_with(graph: ShaderGraph) -> Material {
        Material::new("Source").with_graph(graph)
    }

    fn infer(material: &Material) -> RoleResult {
        infer_roles(material, &InferenceConfig::default())
    }

    #[test]
    fn test_base_color_prefers_principled_input() {
        let mut graph = ShaderGraph::default();
        let decoy = graph.add_node(image_node("MainTex", "decoy.png"));
        let skin = graph.add_node(image_node("Skin", "skin.png"));
        let bsdf = graph.add_node(create(NodeKind::PrincipledBsdf));
        link(&mut graph, skin, "Color", bsdf, "Base Color");
        let _ = decoy;

        let roles = infer(&material_with(graph));
        assert_eq!(roles.base_color.unwrap().node, skin);
    }

    #[test]
    fn test_base_color_from_other_shader_color() {
        let mut graph = ShaderGraph::default();
        let _bsdf = graph.add_node(create(NodeKind::PrincipledBsdf));
        let first = graph.add_node(image_node("TexA", "a.png"));
        let tex = graph.add_node(image_node("TexB", "b.png"));
        let diffuse = graph.add_node(create(NodeKind::DiffuseBsdf));
        link(&mut graph, tex, "Color", diffuse, "Color");
        let _ = first;

        let roles = infer(&material_with(graph));
        assert_eq!(roles.base_color.unwrap().node, tex);
    }

    #[test]
    fn test_base_color_by_keyword_then_first_image() {
        let mut graph = ShaderGraph::default();
        graph.add_node(image_node("Shade", "shade.png"));
        let albedo = graph.add_node(image_node("Body_ALBEDO", "albedo.png"));
        let roles = infer(&material_with(graph.clone()));
        assert_eq!(roles.base_color.unwrap().node, albedo);

        let mut plain = ShaderGraph::default();
        let empty = plain.add_node(empty_image_node("MainTex"));
        let first = plain.add_node(image_node("Shade", "shade.png"));
        plain.add_node(image_node("Other", "other.png"));
        let roles = infer(&material_with(plain));
        let base = roles.base_color.unwrap();
        assert_eq!(base.node, first);
        assert_ne!(base.node, empty);
    }

    #[test]
    fn test_no_images_no_base_color() {
        let mut graph = ShaderGraph::default();
        graph.add_node(create(NodeKind::PrincipledBsdf));
        let roles = infer(&material_with(graph));
        assert!(roles.base_color.is_none());
        assert_eq!(roles.alpha, AlphaSource::None);
    }

    #[test]
    fn test_blend_hint_uses_base_alpha() {
        let mut graph = ShaderGraph::default();
        let tex = graph.add_node(image_node("MainTex", "main.png"));
        let bsdf = graph.add_node(create(NodeKind::PrincipledBsdf));
        link(&mut graph, tex, "Color", bsdf, "Base Color");
        // A named alpha texture loses to the blend hint
        graph.add_node(image_node("Hair_Alpha", "alpha.png"));

        let material = material_with(graph).with_blend_mode(BlendMode::Hashed);
        assert_eq!(infer(&material).alpha, AlphaSource::FromBaseAlpha);
    }

    #[test]
    fn test_blend_hint_without_base_image_is_opaque() {
        let mut graph = ShaderGraph::default();
        graph.add_node(create(NodeKind::PrincipledBsdf));
        let material = material_with(graph).with_blend_mode(BlendMode::Blend);
        assert_eq!(infer(&material).alpha, AlphaSource::None);
    }

    #[test]
    fn test_separate_alpha_image_by_name() {
        let mut graph = ShaderGraph::default();
        graph.add_node(image_node("MainTex", "main.png"));
        let mask = graph.add_node(image_node("Opacity Mask", "mask.png"));

        match infer(&material_with(graph)).alpha {
            AlphaSource::SeparateImage(src) => assert_eq!(src.node, mask),
            other => panic!("expected separate image, got {other:?}"),
        }
    }

    #[test]
    fn test_alpha_heuristics_are_individually_switchable() {
        let image = ImageRef::new("main.png").with_channels(3, 32);
        let mut graph = ShaderGraph::default();
        graph.add_node(create(NodeKind::ImageTexture(ImageTexture::new(image))).with_name("MainTex"));
        let material = material_with(graph);

        let mut config = InferenceConfig::default();
        assert_eq!(infer_roles(&material, &config).alpha, AlphaSource::FromBaseAlpha);

        config.alpha.bit_depth_proxy = false;
        assert_eq!(infer_roles(&material, &config).alpha, AlphaSource::None);

        config.alpha.base_image_fallback = true;
        assert_eq!(infer_roles(&material, &config).alpha, AlphaSource::FromBaseAlpha);
    }

    #[test]
    fn test_bit_depth_ignored_for_probed_images() {
        // 16-bit RGB: 48 bpp, no alpha channel
        let mut image = ImageRef::new("main.png").with_channels(3, 48);
        let host_reported = {
            let mut graph = ShaderGraph::default();
            graph.add_node(create(NodeKind::ImageTexture(ImageTexture::new(image.clone()))));
            material_with(graph)
        };
        assert_eq!(infer(&host_reported).alpha, AlphaSource::FromBaseAlpha);

        image.probed = true;
        let mut graph = ShaderGraph::default();
        graph.add_node(create(NodeKind::ImageTexture(ImageTexture::new(image))));
        assert_eq!(infer(&material_with(graph)).alpha, AlphaSource::None);
    }

    #[test]
    fn test_alpha_from_channels_or_flag() {
        let rgba = ImageRef::new("a.png").with_channels(4, 0);
        let flagged = ImageRef::new("b.png").with_alpha_mode(AlphaMode::Premultiplied);
        let mut config = InferenceConfig::default();
        config.alpha.bit_depth_proxy = false;

        for image in [rgba, flagged] {
            let mut graph = ShaderGraph::default();
            graph.add_node(create(NodeKind::ImageTexture(ImageTexture::new(image))));
            let material = material_with(graph);
            assert_eq!(infer_roles(&material, &config).alpha, AlphaSource::FromBaseAlpha);
        }
    }

    #[test]
    fn test_normal_pair() {
        let mut graph = ShaderGraph::default();
        // A normal map with nothing upstream is skipped
        graph.add_node(create(NodeKind::NormalMap));
        let tex = graph.add_node(image_node("Normal", "normal.png"));
        let normal_map = graph.add_node(create(NodeKind::NormalMap));
        link(&mut graph, tex, "Color", normal_map, "Color");

        let normal = infer(&material_with(graph)).normal.unwrap();
        assert_eq!(normal.image.node, tex);
        assert_eq!(normal.normal_map, normal_map);
    }

    #[test]
    fn test_principled_emission_implicit_strength() {
        let mut graph = ShaderGraph::default();
        let bsdf = graph.add_node(create(NodeKind::PrincipledBsdf));
        graph
            .set_input_value(bsdf, "Emission Color", PortValue::Color([1.0, 0.5, 0.0, 1.0]))
            .unwrap();

        let emission = infer(&material_with(graph)).emission;
        assert_eq!(emission.color, [1.0, 0.5, 0.0, 1.0]);
        assert_eq!(emission.strength, 1.0);
        assert!(emission.image.is_none());
    }

    #[test]
    fn test_principled_emission_texture_on_legacy_socket() {
        let registry = matbridge_graph::create_shader_registry(matbridge_graph::ShaderSchema::V3);
        let mut graph = ShaderGraph::default();
        let bsdf = graph.add_node(registry.create_node(NodeKind::PrincipledBsdf).unwrap());
        let tex = graph.add_node(image_node("Glow", "glow.png"));
        link(&mut graph, tex, "Color", bsdf, "Emission");
        graph.set_input_value(bsdf, "Emission Strength", PortValue::Float(0.0)).unwrap();

        let emission = infer(&material_with(graph)).emission;
        assert_eq!(emission.image.unwrap().node, tex);
        assert_eq!(emission.strength, 0.0);
    }

    #[test]
    fn test_group_emission_input() {
        let group = create(NodeKind::Group(NodeGroup {
            tree: Some(Box::new(ShaderGraph::new("MToon"))),
        }))
        .with_input(Port::input("Lit Color", PortType::Color)
            .with_default(PortValue::Color([1.0, 1.0, 1.0, 1.0])))
        .with_input(Port::input("Emission Color", PortType::Vector3)
            .with_default(PortValue::Vector3([0.2, 0.1, 0.0])));
        let mut graph = ShaderGraph::default();
        graph.add_node(group);

        let emission = infer(&material_with(graph)).emission;
        assert_eq!(emission.color, [0.2, 0.1, 0.0, 1.0]);
        assert_eq!(emission.strength, 1.0);
    }

    #[test]
    fn test_group_without_tree_is_ignored() {
        let group = create(NodeKind::Group(NodeGroup::default()))
            .with_input(Port::input("Emissive", PortType::Color)
                .with_default(PortValue::Color([1.0, 0.0, 0.0, 1.0])));
        let mut graph = ShaderGraph::default();
        graph.add_node(group);

        assert!(!infer(&material_with(graph)).emission.is_emissive());
    }

    #[test]
    fn test_emission_shader_fallback() {
        let mut graph = ShaderGraph::default();
        let off = graph.add_node(create(NodeKind::Emission));
        graph.set_input_value(off, "Strength", PortValue::Float(0.0)).unwrap();
        let on = graph.add_node(create(NodeKind::Emission));
        graph.set_input_value(on, "Strength", PortValue::Float(3.0)).unwrap();
        graph.set_input_value(on, "Color", PortValue::Color([0.0, 1.0, 0.0, 1.0])).unwrap();

        let emission = infer(&material_with(graph)).emission;
        assert_eq!(emission.strength, 3.0);
        assert_eq!(emission.color, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_default_emission_is_black_and_off() {
        let mut graph = ShaderGraph::default();
        graph.add_node(create(NodeKind::PrincipledBsdf));
        assert_eq!(infer(&material_with(graph)).emission, EmissionSource::default());
    }
}
