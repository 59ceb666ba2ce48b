// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene document files.

use matbridge_graph::scene::SCENE_FORMAT_VERSION;
use matbridge_graph::SceneDocument;
use std::path::Path;

use crate::error::CliError;

/// On-disk encoding of a scene document, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Ron,
    Json,
}

impl SceneFormat {
    /// Format of `path`, from its extension
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("ron") => Ok(Self::Ron),
            Some("json") => Ok(Self::Json),
            _ => Err(CliError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parse a scene document
    pub fn parse(self, content: &str) -> Result<SceneDocument, CliError> {
        let scene = match self {
            Self::Ron => SceneDocument::from_ron(content)?,
            Self::Json => serde_json::from_str(content)?,
        };

        if scene.version > SCENE_FORMAT_VERSION {
            return Err(CliError::UnsupportedVersion {
                found: scene.version,
                supported: SCENE_FORMAT_VERSION,
            });
        }
        Ok(scene)
    }

    /// Serialize a scene document
    pub fn write(self, scene: &SceneDocument) -> Result<String, CliError> {
        Ok(match self {
            Self::Ron => scene.to_ron()?,
            Self::Json => serde_json::to_string_pretty(scene)?,
        })
    }
}

/// Load a scene document
pub fn load_scene(path: &Path) -> Result<SceneDocument, CliError> {
    let format = SceneFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    let scene = format.parse(&content)?;
    tracing::debug!(
        "Loaded scene '{}' from {}: {} materials, {} objects",
        scene.name,
        path.display(),
        scene.materials.len(),
        scene.objects.len()
    );
    Ok(scene)
}

/// Save a scene document
pub fn save_scene(scene: &SceneDocument, path: &Path) -> Result<(), CliError> {
    let content = SceneFormat::from_path(path)?.write(scene)?;
    std::fs::write(path, content).map_err(|e| CliError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use matbridge_graph::{Material, ObjectKind, SceneObject};
    use std::path::PathBuf;

    fn sample_scene() -> SceneDocument {
        let mut scene = SceneDocument::new("Avatar");
        let id = scene.add_material(Material::new("Skin"));
        scene.add_object(SceneObject::new("Body", ObjectKind::Mesh).selected().with_slot(Some(id)));
        scene
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SceneFormat::from_path(Path::new("a/b.ron")).unwrap(), SceneFormat::Ron);
        assert_eq!(SceneFormat::from_path(Path::new("B.JSON")).unwrap(), SceneFormat::Json);
        assert!(matches!(
            SceneFormat::from_path(Path::new("scene.blend")),
            Err(CliError::UnsupportedFormat(_))
        ));
        assert!(SceneFormat::from_path(&PathBuf::from("scene")).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let scene = sample_scene();
        let text = SceneFormat::Json.write(&scene).unwrap();
        assert_eq!(SceneFormat::Json.parse(&text).unwrap(), scene);
    }

    #[test]
    fn test_save_and_load_ron() {
        let path = std::env::temp_dir().join(format!("matbridge-scene-{}.ron", std::process::id()));
        let scene = sample_scene();
        save_scene(&scene, &path).unwrap();

        let loaded = load_scene(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_newer_scene_rejected() {
        let mut scene = sample_scene();
        scene.version = SCENE_FORMAT_VERSION + 1;
        let text = SceneFormat::Ron.write(&scene).unwrap();
        assert!(matches!(
            SceneFormat::Ron.parse(&text),
            Err(CliError::UnsupportedVersion { .. })
        ));
    }
}
