// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shading node schemas.
//!
//! Every [`NodeKind`] gets a statically declared set of ports. Host schemas
//! renamed a few principled-shader sockets between generations, so the
//! registry is built per [`ShaderSchema`] and callers that must work on
//! both try the aliases listed here.

use crate::node::{NodeCategory, NodeKind, NodeRegistry, NodeType};
use crate::port::{Port, PortType, PortValue};
use serde::{Deserialize, Serialize};

/// Emission color socket names, newest first
pub const EMISSION_COLOR_INPUTS: [&str; 2] = ["Emission Color", "Emission"];

/// Specular socket names, newest first
pub const SPECULAR_INPUTS: [&str; 2] = ["Specular IOR Level", "Specular"];

/// Emission strength socket name (stable across schemas)
pub const EMISSION_STRENGTH_INPUT: &str = "Emission Strength";

/// Node schema generation of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShaderSchema {
    /// Legacy socket names (`Emission`, `Specular`)
    V3,
    /// Current socket names (`Emission Color`, `Specular IOR Level`)
    #[default]
    V4,
}

impl ShaderSchema {
    /// Name of the principled emission color input
    pub fn emission_color_input(self) -> &'static str {
        match self {
            Self::V3 => EMISSION_COLOR_INPUTS[1],
            Self::V4 => EMISSION_COLOR_INPUTS[0],
        }
    }

    /// Name of the principled specular input
    pub fn specular_input(self) -> &'static str {
        match self {
            Self::V3 => SPECULAR_INPUTS[1],
            Self::V4 => SPECULAR_INPUTS[0],
        }
    }
}

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const GRAY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const LIGHT_GRAY: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

fn color(name: &str, value: [f32; 4]) -> Port {
    Port::input(name, PortType::Color).with_default(PortValue::Color(value))
}

fn float(name: &str, value: f32) -> Port {
    Port::input(name, PortType::Float).with_default(PortValue::Float(value))
}

/// Create the shading node registry for a schema generation
pub fn create_shader_registry(schema: ShaderSchema) -> NodeRegistry {
    let mut registry = NodeRegistry::new();

    // ========================================================================
    // Output
    // ========================================================================

    registry.register(NodeType {
        id: NodeKind::MaterialOutput.type_id().to_string(),
        name: "Material Output".to_string(),
        category: NodeCategory::Output,
        description: "Surface/volume/displacement output consumed by the renderer".to_string(),
        inputs: vec![
            Port::input("Surface", PortType::Shader),
            Port::input("Volume", PortType::Shader),
            Port::input("Displacement", PortType::Vector3),
        ],
        outputs: vec![],
    });

    // ========================================================================
    // Shaders
    // ========================================================================

    let emission_strength_default = match schema {
        ShaderSchema::V3 => 1.0,
        ShaderSchema::V4 => 0.0,
    };

    registry.register(NodeType {
        id: NodeKind::PrincipledBsdf.type_id().to_string(),
        name: "Principled BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Physically based surface shader".to_string(),
        inputs: vec![
            color("Base Color", LIGHT_GRAY),
            float("Metallic", 0.0),
            float("Roughness", 0.5),
            float("IOR", 1.45),
            float("Alpha", 1.0),
            Port::input("Normal", PortType::Vector3),
            float(schema.specular_input(), 0.5),
            color(schema.emission_color_input(), BLACK),
            float(EMISSION_STRENGTH_INPUT, emission_strength_default),
        ],
        outputs: vec![Port::output("BSDF", PortType::Shader)],
    });

    registry.register(NodeType {
        id: NodeKind::DiffuseBsdf.type_id().to_string(),
        name: "Diffuse BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Lambertian diffuse reflection".to_string(),
        inputs: vec![
            color("Color", LIGHT_GRAY),
            float("Roughness", 0.0),
            Port::input("Normal", PortType::Vector3),
        ],
        outputs: vec![Port::output("BSDF", PortType::Shader)],
    });

    registry.register(NodeType {
        id: NodeKind::GlossyBsdf.type_id().to_string(),
        name: "Glossy BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Specular reflection".to_string(),
        inputs: vec![
            color("Color", LIGHT_GRAY),
            float("Roughness", 0.5),
            Port::input("Normal", PortType::Vector3),
        ],
        outputs: vec![Port::output("BSDF", PortType::Shader)],
    });

    registry.register(NodeType {
        id: NodeKind::ToonBsdf.type_id().to_string(),
        name: "Toon BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Banded diffuse/glossy reflection".to_string(),
        inputs: vec![
            color("Color", LIGHT_GRAY),
            float("Size", 0.5),
            float("Smooth", 0.0),
            Port::input("Normal", PortType::Vector3),
        ],
        outputs: vec![Port::output("BSDF", PortType::Shader)],
    });

    registry.register(NodeType {
        id: NodeKind::Emission.type_id().to_string(),
        name: "Emission".to_string(),
        category: NodeCategory::Shader,
        description: "Light-emitting surface".to_string(),
        inputs: vec![color("Color", WHITE), float("Strength", 1.0)],
        outputs: vec![Port::output("Emission", PortType::Shader)],
    });

    registry.register(NodeType {
        id: NodeKind::TransparentBsdf.type_id().to_string(),
        name: "Transparent BSDF".to_string(),
        category: NodeCategory::Shader,
        description: "Lets light pass straight through".to_string(),
        inputs: vec![color("Color", WHITE)],
        outputs: vec![Port::output("BSDF", PortType::Shader)],
    });

    registry.register(NodeType {
        id: NodeKind::MixShader.type_id().to_string(),
        name: "Mix Shader".to_string(),
        category: NodeCategory::Shader,
        description: "Blend two shaders; factor 0 selects the first".to_string(),
        inputs: vec![
            float("Fac", 0.5),
            Port::input("Shader", PortType::Shader),
            Port::input("Shader", PortType::Shader),
        ],
        outputs: vec![Port::output("Shader", PortType::Shader)],
    });

    // ========================================================================
    // Texture & Vector
    // ========================================================================

    registry.register(NodeType {
        id: NodeKind::ImageTexture(Default::default()).type_id().to_string(),
        name: "Image Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Sample an image".to_string(),
        inputs: vec![Port::input("Vector", PortType::Vector3)],
        outputs: vec![
            Port::output("Color", PortType::Color),
            Port::output("Alpha", PortType::Float),
        ],
    });

    registry.register(NodeType {
        id: NodeKind::NormalMap.type_id().to_string(),
        name: "Normal Map".to_string(),
        category: NodeCategory::Vector,
        description: "Tangent-space normal map decode".to_string(),
        inputs: vec![float("Strength", 1.0), color("Color", [0.5, 0.5, 1.0, 1.0])],
        outputs: vec![Port::output("Normal", PortType::Vector3)],
    });

    // ========================================================================
    // Converters & Color
    // ========================================================================

    registry.register(NodeType {
        id: NodeKind::ShaderToRgb.type_id().to_string(),
        name: "Shader to RGB".to_string(),
        category: NodeCategory::Converter,
        description: "Evaluate a shader's lit result as color".to_string(),
        inputs: vec![Port::input("Shader", PortType::Shader)],
        outputs: vec![
            Port::output("Color", PortType::Color),
            Port::output("Alpha", PortType::Float),
        ],
    });

    registry.register(NodeType {
        id: NodeKind::RgbToBw.type_id().to_string(),
        name: "RGB to BW".to_string(),
        category: NodeCategory::Converter,
        description: "Reduce a color to its luminance".to_string(),
        inputs: vec![color("Color", GRAY)],
        outputs: vec![Port::output("Val", PortType::Float)],
    });

    registry.register(NodeType {
        id: NodeKind::MixRgb(Default::default()).type_id().to_string(),
        name: "Mix".to_string(),
        category: NodeCategory::Color,
        description: "Blend two colors".to_string(),
        inputs: vec![float("Fac", 0.5), color("Color1", GRAY), color("Color2", GRAY)],
        outputs: vec![Port::output("Color", PortType::Color)],
    });

    registry.register(NodeType {
        id: NodeKind::ColorRamp(Default::default()).type_id().to_string(),
        name: "Color Ramp".to_string(),
        category: NodeCategory::Converter,
        description: "Map a factor through color stops".to_string(),
        inputs: vec![float("Fac", 0.5)],
        outputs: vec![
            Port::output("Color", PortType::Color),
            Port::output("Alpha", PortType::Float),
        ],
    });

    registry.register(NodeType {
        id: NodeKind::Math(Default::default()).type_id().to_string(),
        name: "Math".to_string(),
        category: NodeCategory::Converter,
        description: "Scalar math operation".to_string(),
        inputs: vec![float("Value", 0.5), float("Value", 0.5), float("Value", 0.5)],
        outputs: vec![Port::output("Value", PortType::Float)],
    });

    // ========================================================================
    // Groups & Layout
    // ========================================================================

    registry.register(NodeType {
        id: NodeKind::Group(Default::default()).type_id().to_string(),
        name: "Group".to_string(),
        category: NodeCategory::Group,
        description: "Instance of a node group; sockets come from the group interface".to_string(),
        inputs: vec![],
        outputs: vec![],
    });

    registry.register(NodeType {
        id: NodeKind::Reroute.type_id().to_string(),
        name: "Reroute".to_string(),
        category: NodeCategory::Layout,
        description: "Pass-through wire point".to_string(),
        inputs: vec![Port::input("Input", PortType::Any)],
        outputs: vec![Port::output("Output", PortType::Any)],
    });

    registry.register(NodeType {
        id: NodeKind::Custom(String::new()).type_id().to_string(),
        name: "Node".to_string(),
        category: NodeCategory::Custom,
        description: "Host node with host-declared sockets".to_string(),
        inputs: vec![],
        outputs: vec![],
    });

    registry
}
