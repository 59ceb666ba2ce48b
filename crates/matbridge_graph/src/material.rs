// SPDX-License-Identifier: MIT OR Apache-2.0
//! Materials: a shading graph plus render flags.

use crate::graph::ShaderGraph;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub Uuid);

impl MaterialId {
    /// Create a new random material ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MaterialId {
    fn default() -> Self {
        Self::new()
    }
}

/// How the surface is composited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BlendMode {
    /// Alpha ignored
    #[default]
    Opaque,
    /// Binary cutout at the alpha cutoff
    Clip,
    /// Dithered (stochastic) transparency
    Hashed,
    /// Sorted alpha blending
    Blend,
}

/// How the surface casts shadows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ShadowMode {
    /// Casts no shadow
    None,
    /// Solid shadow regardless of alpha
    #[default]
    Opaque,
    /// Shadow cut out at the alpha cutoff
    Clip,
    /// Dithered shadow following alpha
    Hashed,
}

/// Material-level render flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSettings {
    /// Surface compositing
    pub blend_mode: BlendMode,
    /// Shadow casting
    pub shadow_mode: ShadowMode,
    /// Alpha below this is discarded in [`BlendMode::Clip`]
    pub alpha_cutoff: f32,
    /// Hide faces seen from behind
    pub backface_culling: bool,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            blend_mode: BlendMode::Opaque,
            shadow_mode: ShadowMode::Opaque,
            alpha_cutoff: 0.5,
            backface_culling: false,
        }
    }
}

/// A material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Unique material ID
    pub id: MaterialId,
    /// Material name
    pub name: String,
    /// Shading graph
    pub graph: ShaderGraph,
    /// Render flags; `blend_mode` doubles as the transparency hint
    #[serde(default)]
    pub settings: MaterialSettings,
}

impl Material {
    /// Create a material with an empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: MaterialId::new(),
            name: name.into(),
            graph: ShaderGraph::default(),
            settings: MaterialSettings::default(),
        }
    }

    /// Set the graph
    pub fn with_graph(mut self, graph: ShaderGraph) -> Self {
        self.graph = graph;
        self
    }

    /// Set the blend mode
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.settings.blend_mode = blend_mode;
        self
    }

    /// Copy this material under a new ID and name
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            id: MaterialId::new(),
            name: name.into(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_gets_new_identity() {
        let original = Material::new("Body").with_blend_mode(BlendMode::Blend);
        let copy = original.duplicate("VRM_TOON_Body");

        assert_ne!(original.id, copy.id);
        assert_eq!(copy.name, "VRM_TOON_Body");
        assert_eq!(copy.settings.blend_mode, BlendMode::Blend);
    }
}
