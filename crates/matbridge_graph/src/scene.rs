// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene documents: materials plus the objects whose slots use them.
//!
//! This is the minimal slice of a host scene a conversion pass needs. It is
//! serializable so scenes can be exported from a host and converted offline.

use crate::material::{Material, MaterialId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Current scene document format version
pub const SCENE_FORMAT_VERSION: u32 = 1;

/// Host object type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Polygon mesh
    Mesh,
    /// Curve with geometry
    Curve,
    /// NURBS surface
    Surface,
    /// Metaball
    Meta,
    /// Text object
    Font,
    /// Skeleton; no material slots
    Armature,
    /// Camera
    Camera,
    /// Light
    Light,
    /// Transform-only empty
    Empty,
}

impl ObjectKind {
    /// Whether objects of this kind render with material slots
    pub fn has_surface(self) -> bool {
        matches!(
            self,
            Self::Mesh | Self::Curve | Self::Surface | Self::Meta | Self::Font
        )
    }
}

/// An object with material slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object name
    pub name: String,
    /// Object type
    pub kind: ObjectKind,
    /// Whether the object is part of the current selection
    #[serde(default)]
    pub selected: bool,
    /// Material slots; `None` is an empty slot
    #[serde(default)]
    pub material_slots: Vec<Option<MaterialId>>,
}

impl SceneObject {
    /// Create an unselected object with no slots
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            selected: false,
            material_slots: Vec::new(),
        }
    }

    /// Mark the object selected
    pub fn selected(mut self) -> Self {
        self.selected = true;
        self
    }

    /// Append a material slot
    pub fn with_slot(mut self, material: Option<MaterialId>) -> Self {
        self.material_slots.push(material);
        self
    }
}

/// A scene document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Scene name
    pub name: String,
    /// Materials by ID, in creation order
    #[serde(default)]
    pub materials: IndexMap<MaterialId, Material>,
    /// Objects in scene order
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

fn default_version() -> u32 {
    SCENE_FORMAT_VERSION
}

impl SceneDocument {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: SCENE_FORMAT_VERSION,
            name: name.into(),
            materials: IndexMap::new(),
            objects: Vec::new(),
        }
    }

    /// Add a material, returning its ID
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = material.id;
        self.materials.insert(id, material);
        id
    }

    /// Get a material by ID
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    /// Get a mutable material by ID
    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(&id)
    }

    /// Find a material by name
    pub fn material_by_name(&self, name: &str) -> Option<&Material> {
        self.materials.values().find(|m| m.name == name)
    }

    /// Add an object
    pub fn add_object(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    /// Serialize to RON format
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON format
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self::new("Scene")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphs::shader::{create_shader_registry, ShaderSchema};
    use crate::node::NodeKind;
    use crate::texture::{ImageRef, ImageTexture};

    #[test]
    fn test_ron_roundtrip_keeps_graph() {
        let registry = create_shader_registry(ShaderSchema::V4);
        let mut material = Material::new("Face");
        let tex = registry
            .create_node(NodeKind::ImageTexture(ImageTexture::new(ImageRef::new("face.png"))))
            .unwrap();
        let bsdf = registry.create_node(NodeKind::PrincipledBsdf).unwrap();
        let color_out = tex.output("Color").unwrap().id;
        let base_in = bsdf.input("Base Color").unwrap().id;
        let tex_id = material.graph.add_node(tex);
        let bsdf_id = material.graph.add_node(bsdf);
        material.graph.connect(tex_id, color_out, bsdf_id, base_in).unwrap();

        let mut scene = SceneDocument::new("Avatar");
        let id = scene.add_material(material);
        scene.add_object(SceneObject::new("Body", ObjectKind::Mesh).selected().with_slot(Some(id)));

        let ron = scene.to_ron().unwrap();
        let loaded = SceneDocument::from_ron(&ron).unwrap();
        assert_eq!(loaded, scene);
        assert_eq!(loaded.material(id).unwrap().graph.link_count(), 1);
    }

    #[test]
    fn test_surface_kinds() {
        assert!(ObjectKind::Mesh.has_surface());
        assert!(ObjectKind::Font.has_surface());
        assert!(!ObjectKind::Armature.has_surface());
        assert!(!ObjectKind::Light.has_surface());
    }
}
