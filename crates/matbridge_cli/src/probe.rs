// SPDX-License-Identifier: MIT OR Apache-2.0
//! Image metadata probing.
//!
//! Hosts often report stale or missing channel information for images.
//! Probing opens each referenced file and records its real channel count,
//! bit depth and alpha presence, so alpha inference works from actual data.

use matbridge_graph::{AlphaMode, ImageRef, NodeId, NodeKind, SceneDocument, ShaderGraph};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extensions of files indexed as images
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "ico", "tga", "hdr", "exr"];

/// Channel layout read from an image file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub channels: u8,
    /// Bits per pixel
    pub depth: u16,
    pub has_alpha: bool,
}

/// Decode `path` and read its color layout
pub fn probe_file(path: &Path) -> Result<ImageInfo, image::ImageError> {
    let color = image::open(path)?.color();
    Ok(ImageInfo {
        channels: color.channel_count(),
        depth: color.bits_per_pixel(),
        has_alpha: color.has_alpha(),
    })
}

/// Image files under a directory, by lowercase file name
#[derive(Debug, Default)]
pub struct ImageIndex {
    by_name: HashMap<String, PathBuf>,
}

impl ImageIndex {
    /// Index every image file below `root`; the first file seen per name wins
    pub fn scan(root: &Path) -> Self {
        let mut by_name = HashMap::new();
        let files = walkdir::WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file());

        for entry in files {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
            if !is_image {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                by_name
                    .entry(name.to_ascii_lowercase())
                    .or_insert_with(|| path.to_path_buf());
            }
        }

        tracing::debug!("Indexed {} images under {}", by_name.len(), root.display());
        Self { by_name }
    }

    /// Image file named `name`, case-insensitively
    pub fn find(&self, name: &str) -> Option<&Path> {
        self.by_name.get(&name.to_ascii_lowercase()).map(PathBuf::as_path)
    }

    /// Number of indexed images
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no images were found
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Counters of a probing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeReport {
    /// Image references refreshed from disk
    pub refreshed: usize,
    /// References with no locatable file
    pub missing: usize,
    /// Files that could not be decoded
    pub unreadable: usize,
}

/// Refreshes image metadata across a scene
pub struct ImageProber<'a> {
    /// Directory relative image paths are resolved against
    base_dir: PathBuf,
    index: Option<&'a ImageIndex>,
    cache: HashMap<PathBuf, Option<ImageInfo>>,
    report: ProbeReport,
}

impl<'a> ImageProber<'a> {
    /// Create a prober resolving relative paths against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            index: None,
            cache: HashMap::new(),
            report: ProbeReport::default(),
        }
    }

    /// Fall back to `index` for images whose recorded path does not exist
    pub fn with_index(mut self, index: &'a ImageIndex) -> Self {
        self.index = Some(index);
        self
    }

    /// Refresh every image reference in `scene`, group trees included
    pub fn probe_scene(mut self, scene: &mut SceneDocument) -> ProbeReport {
        for material in scene.materials.values_mut() {
            self.probe_graph(&mut material.graph);
        }

        tracing::info!(
            "Probed images: {} refreshed, {} missing, {} unreadable",
            self.report.refreshed,
            self.report.missing,
            self.report.unreadable
        );
        self.report
    }

    fn probe_graph(&mut self, graph: &mut ShaderGraph) {
        let ids: Vec<NodeId> = graph.node_ids().collect();
        for id in ids {
            let Some(node) = graph.node_mut(id) else {
                continue;
            };
            match &mut node.kind {
                NodeKind::ImageTexture(texture) => {
                    if let Some(image) = texture.image.as_mut() {
                        self.probe_image(image);
                    }
                }
                NodeKind::Group(group) => {
                    if let Some(tree) = group.tree.as_mut() {
                        self.probe_graph(tree);
                    }
                }
                _ => {}
            }
        }
    }

    fn resolve(&self, image: &ImageRef) -> Option<PathBuf> {
        if let Some(path) = &image.path {
            let path = self.base_dir.join(path);
            if path.is_file() {
                return Some(path);
            }
        }

        let index = self.index?;
        let file_name = image
            .path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .unwrap_or(&image.name);
        index.find(file_name).map(Path::to_path_buf)
    }

    fn probe_image(&mut self, image: &mut ImageRef) {
        let Some(path) = self.resolve(image) else {
            tracing::debug!("No file found for image '{}'", image.name);
            self.report.missing += 1;
            return;
        };

        let info = *self.cache.entry(path.clone()).or_insert_with(|| match probe_file(&path) {
            Ok(info) => Some(info),
            Err(e) => {
                tracing::warn!("Cannot read image {}: {e}", path.display());
                None
            }
        });

        let Some(info) = info else {
            self.report.unreadable += 1;
            return;
        };

        image.channels = info.channels;
        image.depth = info.depth;
        image.alpha_mode = match (info.has_alpha, image.alpha_mode) {
            (true, AlphaMode::None) => AlphaMode::Straight,
            (true, mode) => mode,
            (false, _) => AlphaMode::None,
        };
        image.probed = true;
        self.report.refreshed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matbridge_graph::{
        create_shader_registry, ImageTexture, Material, NodeGroup, ShaderSchema,
    };

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("matbridge-probe-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn image_node(image: ImageRef) -> matbridge_graph::Node {
        create_shader_registry(ShaderSchema::V4)
            .create_node(NodeKind::ImageTexture(ImageTexture::new(image)))
            .unwrap()
    }

    fn images(graph: &ShaderGraph) -> Vec<ImageRef> {
        graph
            .nodes()
            .filter_map(|n| n.image_texture())
            .filter_map(|t| t.image.clone())
            .collect()
    }

    #[test]
    fn test_probe_rgba_and_rgb() {
        let dir = temp_dir("layout");
        image::RgbaImage::new(2, 2).save(dir.join("body.png")).unwrap();
        image::RgbImage::new(2, 2).save(dir.join("face.png")).unwrap();

        let rgba = probe_file(&dir.join("body.png")).unwrap();
        assert_eq!(rgba, ImageInfo { channels: 4, depth: 32, has_alpha: true });
        let rgb = probe_file(&dir.join("face.png")).unwrap();
        assert_eq!(rgb, ImageInfo { channels: 3, depth: 24, has_alpha: false });

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_index_skips_non_images() {
        let dir = temp_dir("index");
        std::fs::write(dir.join("notes.txt"), b"hello").unwrap();
        assert!(ImageIndex::scan(&dir).is_empty());

        image::RgbImage::new(1, 1).save(dir.join("face.png")).unwrap();
        let index = ImageIndex::scan(&dir);
        assert!(!index.is_empty());
        assert!(index.find("FACE.png").is_some());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_probe_scene_refreshes_metadata() {
        let dir = temp_dir("scene");
        image::RgbaImage::new(2, 2).save(dir.join("body.png")).unwrap();
        std::fs::create_dir_all(dir.join("textures")).unwrap();
        image::RgbImage::new(2, 2).save(dir.join("textures").join("hair.png")).unwrap();

        let mut inner = ShaderGraph::new("Inner");
        inner.add_node(image_node(ImageRef::new("Hair").with_path("/nonexistent/HAIR.png")));

        let mut graph = ShaderGraph::default();
        graph.add_node(image_node(
            ImageRef::new("body").with_path("body.png").with_alpha_mode(AlphaMode::ChannelPacked),
        ));
        graph.add_node(image_node(ImageRef::new("gone.png")));
        graph.add_node(
            create_shader_registry(ShaderSchema::V4)
                .create_node(NodeKind::Group(NodeGroup { tree: Some(Box::new(inner)) }))
                .unwrap(),
        );

        let mut scene = SceneDocument::new("Avatar");
        let id = scene.add_material(Material::new("Skin").with_graph(graph));

        let index = ImageIndex::scan(&dir);
        assert_eq!(index.len(), 2);
        let report = ImageProber::new(&dir).with_index(&index).probe_scene(&mut scene);
        assert_eq!(report, ProbeReport { refreshed: 2, missing: 1, unreadable: 0 });

        let graph = &scene.material(id).unwrap().graph;
        let body = &images(graph)[0];
        assert_eq!((body.channels, body.depth), (4, 32));
        assert!(body.probed);
        assert_eq!(body.alpha_mode, AlphaMode::ChannelPacked);

        let group_tree = graph
            .nodes()
            .find_map(|n| match &n.kind {
                NodeKind::Group(group) => group.tree.as_deref(),
                _ => None,
            })
            .unwrap();
        let hair = &images(group_tree)[0];
        assert_eq!((hair.channels, hair.depth), (3, 24));
        assert_eq!(hair.alpha_mode, AlphaMode::None);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unreadable_file_keeps_reported_metadata() {
        let dir = temp_dir("broken");
        std::fs::write(dir.join("broken.png"), b"not a png").unwrap();

        let mut graph = ShaderGraph::default();
        graph.add_node(image_node(ImageRef::new("broken").with_path("broken.png").with_channels(4, 32)));
        let mut scene = SceneDocument::new("Avatar");
        let id = scene.add_material(Material::new("Skin").with_graph(graph));

        let report = ImageProber::new(&dir).probe_scene(&mut scene);
        assert_eq!(report.unreadable, 1);
        let image = &images(&scene.material(id).unwrap().graph)[0];
        assert_eq!((image.channels, image.depth), (4, 32));
        assert!(!image.probed);

        std::fs::remove_dir_all(&dir).ok();
    }
}
