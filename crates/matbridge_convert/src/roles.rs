// SPDX-License-Identifier: MIT OR Apache-2.0
//! Inferred semantic roles of a source graph.
//!
//! Roles own snapshots of the texture settings they refer to, so synthesis
//! never reads the source graph and a material can be rebuilt in place.

use matbridge_graph::{ImageTexture, Node, NodeId};

/// RGBA black, the "no emission" color
pub const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Whether the RGB part of a color is exactly zero
pub fn is_black(color: [f32; 4]) -> bool {
    color[..3].iter().all(|c| *c == 0.0)
}

/// An image-texture node found in the source graph
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSource {
    /// Node in the source graph
    pub node: NodeId,
    /// Node name in the source graph
    pub name: String,
    /// Image, UV map and sampling settings
    pub texture: ImageTexture,
}

impl ImageSource {
    /// Snapshot an image-texture node; `None` unless it has an image
    pub fn from_node(node: &Node) -> Option<Self> {
        let texture = node.image_texture()?;
        Some(Self {
            node: node.id,
            name: node.name.clone(),
            texture: texture.clone(),
        })
    }
}

/// Where transparency comes from
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AlphaSource {
    /// Surface is opaque
    #[default]
    None,
    /// Alpha channel of the base-color image
    FromBaseAlpha,
    /// A dedicated alpha/opacity image
    SeparateImage(ImageSource),
}

impl AlphaSource {
    /// Whether any transparency was inferred
    pub fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Normal map image paired with the normal-map node that decoded it
#[derive(Debug, Clone, PartialEq)]
pub struct NormalSource {
    /// Image feeding the normal map's Color input
    pub image: ImageSource,
    /// Normal-map node in the source graph
    pub normal_map: NodeId,
}

/// Emission color, strength and optional texture
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionSource {
    /// Linear RGBA; black when only a texture emits
    pub color: [f32; 4],
    /// Always `>= 0`
    pub strength: f32,
    /// Emission texture, when the color input is driven by one
    pub image: Option<ImageSource>,
}

impl Default for EmissionSource {
    fn default() -> Self {
        Self {
            color: BLACK,
            strength: 0.0,
            image: None,
        }
    }
}

impl EmissionSource {
    /// Whether the surface glows
    pub fn is_emissive(&self) -> bool {
        self.strength > 0.0 || self.image.is_some()
    }
}

/// The four roles inferred from one source graph
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoleResult {
    /// Base-color texture
    pub base_color: Option<ImageSource>,
    /// Transparency source
    pub alpha: AlphaSource,
    /// Normal map texture
    pub normal: Option<NormalSource>,
    /// Emission color, strength and texture
    pub emission: EmissionSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_ignores_alpha() {
        assert!(is_black([0.0, 0.0, 0.0, 0.3]));
        assert!(!is_black([0.0, 0.01, 0.0, 1.0]));
    }

    #[test]
    fn test_default_roles_are_empty() {
        let roles = RoleResult::default();
        assert!(roles.base_color.is_none());
        assert!(!roles.alpha.is_some());
        assert!(roles.normal.is_none());
        assert!(!roles.emission.is_emissive());
        assert_eq!(roles.emission.color, BLACK);
    }
}
