// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the shading graph.

use crate::graph::ShaderGraph;
use crate::port::{Port, PortId};
use crate::texture::ImageTexture;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Material output
    Output,
    /// Shader closures (BSDFs, emission, mixes)
    Shader,
    /// Texture sampling
    Texture,
    /// Vector operations (normal maps)
    Vector,
    /// Converters (ramps, math, shader-to-color)
    Converter,
    /// Color operations
    Color,
    /// Grouped sub-graphs
    Group,
    /// Layout helpers
    Layout,
    /// Host-specific nodes
    Custom,
}

/// Interpolation between color ramp stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RampInterpolation {
    /// Straight blend between stops
    #[default]
    Linear,
    /// Smoothstep between stops
    Ease,
    /// Hard steps
    Constant,
    /// B-spline through the stops
    BSpline,
    /// Cardinal spline through the stops
    Cardinal,
}

/// A stop on a color ramp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampStop {
    /// Position in [0, 1]
    pub position: f32,
    /// RGBA color at this position
    pub color: [f32; 4],
}

/// Color ramp attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorRamp {
    /// Blend between neighbouring stops
    pub interpolation: RampInterpolation,
    /// Stops, ordered by position
    pub stops: Vec<RampStop>,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            interpolation: RampInterpolation::Linear,
            stops: vec![
                RampStop { position: 0.0, color: [0.0, 0.0, 0.0, 1.0] },
                RampStop { position: 1.0, color: [1.0, 1.0, 1.0, 1.0] },
            ],
        }
    }
}

/// Blend type of a mix-color node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MixBlend {
    /// Linear interpolation by the factor
    #[default]
    Mix,
    /// Component-wise product
    Multiply,
    /// Component-wise sum
    Add,
    /// Component-wise difference
    Subtract,
    /// Inverted product of inverses
    Screen,
    /// Multiply or screen depending on the base
    Overlay,
}

/// Operation of a math node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MathOperation {
    /// `a + b`
    #[default]
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`
    Divide,
    /// `a ^ b`
    Power,
    /// `min(a, b)`
    Minimum,
    /// `max(a, b)`
    Maximum,
    /// 1 when `a < b`, else 0
    LessThan,
    /// 1 when `a > b`, else 0
    GreaterThan,
}

/// A node wrapping an inner node tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NodeGroup {
    /// Inner tree; `None` when the group datablock is missing
    #[serde(default)]
    pub tree: Option<Box<ShaderGraph>>,
}

/// Closed set of node kinds, with kind-specific attributes in the variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Material output; the graph root
    MaterialOutput,
    /// Principled BSDF
    PrincipledBsdf,
    /// Diffuse BSDF
    DiffuseBsdf,
    /// Glossy BSDF
    GlossyBsdf,
    /// Toon BSDF
    ToonBsdf,
    /// Emission shader
    Emission,
    /// Transparent BSDF
    TransparentBsdf,
    /// Mix of two shaders by a factor
    MixShader,
    /// Image texture sampler
    ImageTexture(ImageTexture),
    /// Tangent-space normal map decoder
    NormalMap,
    /// Shader closure evaluated to a color
    ShaderToRgb,
    /// Color to luminance
    RgbToBw,
    /// Two-color mix with a blend type
    MixRgb(MixBlend),
    /// Color ramp over a scalar factor
    ColorRamp(ColorRamp),
    /// Scalar math
    Math(MathOperation),
    /// Grouped sub-graph
    Group(NodeGroup),
    /// Pass-through
    Reroute,
    /// Host node the model does not know; sockets are declared by the host
    Custom(String),
}

impl NodeKind {
    /// Registry key of this kind
    pub fn type_id(&self) -> &'static str {
        match self {
            Self::MaterialOutput => "output_material",
            Self::PrincipledBsdf => "bsdf_principled",
            Self::DiffuseBsdf => "bsdf_diffuse",
            Self::GlossyBsdf => "bsdf_glossy",
            Self::ToonBsdf => "bsdf_toon",
            Self::Emission => "emission",
            Self::TransparentBsdf => "bsdf_transparent",
            Self::MixShader => "mix_shader",
            Self::ImageTexture(_) => "tex_image",
            Self::NormalMap => "normal_map",
            Self::ShaderToRgb => "shader_to_rgb",
            Self::RgbToBw => "rgb_to_bw",
            Self::MixRgb(_) => "mix_rgb",
            Self::ColorRamp(_) => "color_ramp",
            Self::Math(_) => "math",
            Self::Group(_) => "group",
            Self::Reroute => "reroute",
            Self::Custom(_) => "custom",
        }
    }
}

/// Node type definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Default input ports
    pub inputs: Vec<Port>,
    /// Default output ports
    pub outputs: Vec<Port>,
}

/// A node instance in the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Kind and kind-specific attributes
    pub kind: NodeKind,
    /// Node name, unique within a graph
    pub name: String,
    /// Optional display label
    #[serde(default)]
    pub label: Option<String>,
    /// Position in the editor (cosmetic)
    #[serde(default)]
    pub position: [f32; 2],
    /// Input ports, in declaration order
    pub inputs: Vec<Port>,
    /// Output ports, in declaration order
    pub outputs: Vec<Port>,
}

impl Node {
    /// Create a new node from a type definition
    pub fn new(node_type: &NodeType, kind: NodeKind) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            name: node_type.name.clone(),
            label: None,
            position: [0.0, 0.0],
            inputs: node_type.inputs.iter().map(Port::instantiate).collect(),
            outputs: node_type.outputs.iter().map(Port::instantiate).collect(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append an input port (group and custom nodes declare their own)
    pub fn with_input(mut self, port: Port) -> Self {
        self.inputs.push(port);
        self
    }

    /// Append an output port
    pub fn with_output(mut self, port: Port) -> Self {
        self.outputs.push(port);
        self
    }

    /// Get an input port by index
    pub fn input_at(&self, index: usize) -> Option<&Port> {
        self.inputs.get(index)
    }

    /// Get the first input port with the given name
    pub fn input(&self, name: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.name == name)
    }

    /// Get the first output port with the given name
    pub fn output(&self, name: &str) -> Option<&Port> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Get the first input matching any of `names`, tried in order.
    ///
    /// Used where a socket was renamed between schema versions.
    pub fn input_any(&self, names: &[&str]) -> Option<&Port> {
        names.iter().find_map(|name| self.input(name))
    }

    /// Get a mutable input port by name
    pub fn input_mut(&mut self, name: &str) -> Option<&mut Port> {
        self.inputs.iter_mut().find(|p| p.name == name)
    }

    /// Get a port by ID
    pub fn port(&self, port_id: &PortId) -> Option<&Port> {
        self.inputs.iter().find(|p| p.id == *port_id)
            .or_else(|| self.outputs.iter().find(|p| p.id == *port_id))
    }

    /// Texture attributes, if this is an image-texture node with an image
    pub fn image_texture(&self) -> Option<&ImageTexture> {
        match &self.kind {
            NodeKind::ImageTexture(tex) if tex.image.is_some() => Some(tex),
            _ => None,
        }
    }

    /// Whether this is an image-texture node with an image assigned
    pub fn has_image(&self) -> bool {
        self.image_texture().is_some()
    }
}

/// Registry of available node types
pub struct NodeRegistry {
    /// Registered node types by ID
    types: indexmap::IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: indexmap::IndexMap::new(),
        }
    }

    /// Register a node type
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Whether this registry declares `kind`
    pub fn supports(&self, kind: &NodeKind) -> bool {
        self.types.contains_key(kind.type_id())
    }

    /// Create a node of `kind` with the registered ports.
    ///
    /// Returns `None` when the kind is not part of this registry's schema.
    pub fn create_node(&self, kind: NodeKind) -> Option<Node> {
        let node_type = self.get(kind.type_id())?;
        Some(Node::new(node_type, kind))
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
