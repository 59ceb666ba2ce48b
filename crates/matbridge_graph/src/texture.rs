// SPDX-License-Identifier: MIT OR Apache-2.0
//! Image texture attributes and image references.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Color space a texture is sampled in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorSpace {
    /// Display-referred perceptual color
    #[default]
    Srgb,
    /// Raw data (normals, masks, alpha)
    NonColor,
    /// Scene-linear color
    LinearRec709,
}

/// Behavior outside the [0, 1] UV range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Extension {
    /// Tile the image
    #[default]
    Repeat,
    /// Stretch edge texels outward
    Extend,
    /// Transparent outside the image
    Clip,
    /// Tile with alternating flips
    Mirror,
}

/// Texel interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Interpolation {
    /// Bilinear
    #[default]
    Linear,
    /// Nearest texel
    Closest,
    /// Bicubic
    Cubic,
    /// Bicubic when magnifying, otherwise bilinear
    Smart,
}

/// How the host interprets the alpha channel of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AlphaMode {
    /// Host reports no alpha handling
    #[default]
    None,
    /// Unassociated alpha
    Straight,
    /// Color already multiplied by alpha
    Premultiplied,
    /// Alpha channel holds unrelated data
    ChannelPacked,
}

impl AlphaMode {
    /// Whether the host flags the image as carrying alpha
    pub fn is_flagged(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Reference to an image datablock owned by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image name
    pub name: String,
    /// Backing file, if any
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Reported channel count
    #[serde(default)]
    pub channels: u8,
    /// Reported bits per pixel
    #[serde(default)]
    pub depth: u16,
    /// Reported alpha handling
    #[serde(default)]
    pub alpha_mode: AlphaMode,
    /// Channel metadata was read from the file instead of reported by the host
    #[serde(default)]
    pub probed: bool,
}

impl ImageRef {
    /// Create a reference with no reported channel metadata
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            channels: 0,
            depth: 0,
            alpha_mode: AlphaMode::None,
            probed: false,
        }
    }

    /// Set the backing file
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the reported channel count and bit depth
    pub fn with_channels(mut self, channels: u8, depth: u16) -> Self {
        self.channels = channels;
        self.depth = depth;
        self
    }

    /// Set the reported alpha mode
    pub fn with_alpha_mode(mut self, alpha_mode: AlphaMode) -> Self {
        self.alpha_mode = alpha_mode;
        self
    }
}

/// Attributes of an image-texture node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ImageTexture {
    /// Sampled image; a node without one is treated as empty
    #[serde(default)]
    pub image: Option<ImageRef>,
    /// UV map to sample with; empty means the active map
    #[serde(default)]
    pub uv_map: String,
    /// Wrap mode
    #[serde(default)]
    pub extension: Extension,
    /// Texel filtering
    #[serde(default)]
    pub interpolation: Interpolation,
    /// sRGB for colors, Non-Color for data maps
    #[serde(default)]
    pub color_space: ColorSpace,
}

impl ImageTexture {
    /// Create texture attributes sampling `image`
    pub fn new(image: ImageRef) -> Self {
        Self {
            image: Some(image),
            ..Self::default()
        }
    }

    /// Set the UV map
    pub fn with_uv_map(mut self, uv_map: impl Into<String>) -> Self {
        self.uv_map = uv_map.into();
        self
    }

    /// Copy image, UV map and sampling settings under a new color space
    pub fn retagged(&self, color_space: ColorSpace) -> Self {
        Self {
            color_space,
            ..self.clone()
        }
    }
}
