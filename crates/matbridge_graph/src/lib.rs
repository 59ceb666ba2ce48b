// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shading graph model for matbridge.
//!
//! This crate provides the data model the converter reads and writes:
//! - Nodes with a closed set of kinds and per-kind port schemas
//! - Typed input/output ports with static default values
//! - Links with single-incoming-link validation
//! - Materials with render flags
//! - Scene documents tying objects' material slots to materials
//!
//! ## Architecture
//!
//! Port layouts are declared once per schema generation in
//! [`graphs::shader`]; nodes are instantiated from that registry so every
//! socket a converter touches is statically known, and lookups of a socket
//! the schema lacks return `None` instead of failing.

pub mod node;
pub mod port;
pub mod link;
pub mod graph;
pub mod texture;
pub mod material;
pub mod scene;
pub mod graphs;

pub use node::{
    ColorRamp, MathOperation, MixBlend, Node, NodeCategory, NodeGroup, NodeId, NodeKind,
    NodeRegistry, NodeType, RampInterpolation, RampStop,
};
pub use port::{Port, PortId, PortType, PortDirection, PortValue};
pub use link::{Link, LinkId};
pub use graph::{GraphError, ShaderGraph};
pub use texture::{AlphaMode, ColorSpace, Extension, ImageRef, ImageTexture, Interpolation};
pub use material::{BlendMode, Material, MaterialId, MaterialSettings, ShadowMode};
pub use scene::{ObjectKind, SceneDocument, SceneObject};
pub use graphs::shader::{create_shader_registry, ShaderSchema};
