// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port (socket) definitions for node inputs/outputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random port ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// Data type that can flow through ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortType {
    /// Boolean value
    Bool,
    /// Integer value
    Int,
    /// Floating point value
    Float,
    /// 2D vector
    Vector2,
    /// 3D vector (normals, UVW coordinates)
    Vector3,
    /// 4D vector
    Vector4,
    /// Color (RGBA)
    Color,
    /// Shader closure
    Shader,
    /// String value
    String,
    /// Any type (reroutes, host-declared sockets)
    Any,
    /// Custom type
    Custom(String),
}

impl PortType {
    /// Whether values of this type are plain data (not closures or strings)
    pub fn is_data(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::Int
                | Self::Float
                | Self::Vector2
                | Self::Vector3
                | Self::Vector4
                | Self::Color
        )
    }

    /// Check if this type can connect to another type
    pub fn can_connect_to(&self, other: &PortType) -> bool {
        if matches!(self, Self::Any) || matches!(other, Self::Any) {
            return true;
        }

        if self == other {
            return true;
        }

        // Shader closures only flow into shader sockets; every data type
        // converts implicitly (color -> float is a luminance reduction).
        self.is_data() && other.is_data()
    }
}

/// A port on a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Port name
    pub name: String,
    /// Port direction
    pub direction: PortDirection,
    /// Data type
    pub port_type: PortType,
    /// Static value used while the input is unlinked
    pub default_value: Option<PortValue>,
    /// Whether multiple links are allowed
    pub multi_connect: bool,
}

impl Port {
    /// Create a new input port
    pub fn input(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Input,
            port_type,
            default_value: None,
            multi_connect: false,
        }
    }

    /// Create a new output port
    pub fn output(name: impl Into<String>, port_type: PortType) -> Self {
        Self {
            id: PortId::new(),
            name: name.into(),
            direction: PortDirection::Output,
            port_type,
            default_value: None,
            multi_connect: true, // Outputs fan out by default
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: PortValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Copy this port definition under a fresh ID.
    ///
    /// Registry definitions are templates; every node instance needs its own
    /// port identities so links stay unambiguous.
    pub fn instantiate(&self) -> Self {
        Self {
            id: PortId::new(),
            ..self.clone()
        }
    }

    /// Check if a link from this port to another is valid
    pub fn can_connect(&self, other: &Port) -> bool {
        if self.direction == other.direction {
            return false;
        }

        self.port_type.can_connect_to(&other.port_type)
    }
}

/// Value that can be stored in a port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i32),
    /// Float
    Float(f32),
    /// 2D vector
    Vector2([f32; 2]),
    /// 3D vector
    Vector3([f32; 3]),
    /// 4D vector
    Vector4([f32; 4]),
    /// Color
    Color([f32; 4]),
    /// String
    String(String),
}

impl PortValue {
    /// Get the port type for this value
    pub fn port_type(&self) -> PortType {
        match self {
            Self::Bool(_) => PortType::Bool,
            Self::Int(_) => PortType::Int,
            Self::Float(_) => PortType::Float,
            Self::Vector2(_) => PortType::Vector2,
            Self::Vector3(_) => PortType::Vector3,
            Self::Vector4(_) => PortType::Vector4,
            Self::Color(_) => PortType::Color,
            Self::String(_) => PortType::String,
        }
    }

    /// Read the value as a scalar
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f32),
            Self::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Read the value as RGBA; 3-component values get an alpha of 1
    pub fn as_rgba(&self) -> Option<[f32; 4]> {
        match self {
            Self::Color(c) | Self::Vector4(c) => Some(*c),
            Self::Vector3([r, g, b]) => Some([*r, *g, *b, 1.0]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_ports_only_accept_shaders() {
        assert!(PortType::Shader.can_connect_to(&PortType::Shader));
        assert!(!PortType::Shader.can_connect_to(&PortType::Color));
        assert!(!PortType::Float.can_connect_to(&PortType::Shader));
        assert!(PortType::Any.can_connect_to(&PortType::Shader));
    }

    #[test]
    fn test_color_converts_to_float() {
        assert!(PortType::Color.can_connect_to(&PortType::Float));
        assert!(PortType::Float.can_connect_to(&PortType::Color));
        assert!(!PortType::String.can_connect_to(&PortType::Float));
    }

    #[test]
    fn test_instantiate_assigns_fresh_id() {
        let template = Port::input("Color", PortType::Color)
            .with_default(PortValue::Color([1.0, 1.0, 1.0, 1.0]));
        let instance = template.instantiate();
        assert_ne!(template.id, instance.id);
        assert_eq!(template.name, instance.name);
        assert_eq!(template.default_value, instance.default_value);
    }

    #[test]
    fn test_vector_reads_as_opaque_color() {
        let value = PortValue::Vector3([0.2, 0.4, 0.6]);
        assert_eq!(value.as_rgba(), Some([0.2, 0.4, 0.6, 1.0]));
        assert_eq!(PortValue::Float(0.5).as_rgba(), None);
        assert_eq!(PortValue::Int(2).as_float(), Some(2.0));
    }
}
