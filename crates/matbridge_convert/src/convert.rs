// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion run over a scene's material slots.

use matbridge_graph::{MaterialId, SceneDocument};
use std::collections::HashMap;

use crate::config::{ConversionOptions, Scope};
use crate::error::ConvertError;
use crate::infer::infer_roles;
use crate::synth::synthesize;

/// Counters of one conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionReport {
    /// Objects in scope
    pub objects: usize,
    /// Material slots visited on those objects
    pub slots_scanned: usize,
    /// Slots now pointing at a converted material, cache hits included
    pub slots_converted: usize,
    /// Slots holding a material that was left alone
    pub slots_skipped: usize,
    /// Materials synthesized, one per distinct source
    pub unique_materials: usize,
}

/// What happened to one slot
enum SlotOutcome {
    Empty,
    Skipped,
    Reused(MaterialId),
    Converted(MaterialId),
}

/// One pass over a scene, caching source -> target materials
pub struct ConversionRun {
    options: ConversionOptions,
    cache: HashMap<MaterialId, MaterialId>,
}

impl ConversionRun {
    /// Create a run with `options`
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            cache: HashMap::new(),
        }
    }

    /// Options of this run
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Target material already produced for `source`
    pub fn cached(&self, source: MaterialId) -> Option<MaterialId> {
        self.cache.get(&source).copied()
    }

    /// Convert every material slot of the objects in scope
    pub fn convert_scene(&mut self, scene: &mut SceneDocument) -> Result<ConversionReport, ConvertError> {
        let scope = self.options.scope;
        let targets: Vec<usize> = scene
            .objects
            .iter()
            .enumerate()
            .filter(|(_, object)| object.kind.has_surface())
            .filter(|(_, object)| scope == Scope::Scene || object.selected)
            .map(|(index, _)| index)
            .collect();

        if targets.is_empty() {
            return Err(ConvertError::NoTargets { scope });
        }

        let mut report = ConversionReport {
            objects: targets.len(),
            ..ConversionReport::default()
        };

        for index in targets {
            for slot in 0..scene.objects[index].material_slots.len() {
                report.slots_scanned += 1;
                let current = scene.objects[index].material_slots[slot];
                let outcome = match current {
                    Some(source) => self.convert_slot(scene, source),
                    None => SlotOutcome::Empty,
                };

                match outcome {
                    SlotOutcome::Empty => {}
                    SlotOutcome::Skipped => report.slots_skipped += 1,
                    SlotOutcome::Reused(target) => {
                        scene.objects[index].material_slots[slot] = Some(target);
                        report.slots_converted += 1;
                    }
                    SlotOutcome::Converted(target) => {
                        scene.objects[index].material_slots[slot] = Some(target);
                        report.slots_converted += 1;
                        report.unique_materials += 1;
                    }
                }
            }
        }

        tracing::info!(
            "Converted {} of {} slots on {} objects ({} skipped, {} new materials)",
            report.slots_converted,
            report.slots_scanned,
            report.objects,
            report.slots_skipped,
            report.unique_materials,
        );
        Ok(report)
    }

    fn convert_slot(&mut self, scene: &mut SceneDocument, source_id: MaterialId) -> SlotOutcome {
        let prefix = self.options.marker_prefix();
        let Some(source) = scene.material(source_id) else {
            tracing::warn!("Slot references missing material {source_id:?}, skipped");
            return SlotOutcome::Skipped;
        };

        if source.name.starts_with(prefix) && !self.options.overwrite {
            tracing::debug!("'{}' already converted, skipped", source.name);
            return SlotOutcome::Skipped;
        }

        if let Some(target) = self.cached(source_id) {
            return SlotOutcome::Reused(target);
        }

        if !self.options.create_new && !self.options.overwrite {
            return SlotOutcome::Skipped;
        }

        // Roles are owned snapshots, so the source may be rebuilt in place below
        let roles = infer_roles(source, &self.options.inference);
        let synthesis = &self.options.synthesis;

        let (target_id, summary) = if self.options.create_new {
            let mut target = source.duplicate(format!("{prefix}{}", source.name));
            let summary = synthesize(&mut target, &roles, synthesis);
            (scene.add_material(target), summary)
        } else {
            let Some(target) = scene.material_mut(source_id) else {
                return SlotOutcome::Skipped;
            };
            (source_id, synthesize(target, &roles, synthesis))
        };

        if let Some(target) = scene.material(target_id) {
            tracing::info!(
                "Converted material '{}' ({:?}, alpha {:?}, {} nodes)",
                target.name,
                synthesis.target,
                summary.alpha,
                summary.nodes_created,
            );
        }

        self.cache.insert(source_id, target_id);
        SlotOutcome::Converted(target_id)
    }
}

/// Convert `scene` in one run with `options`
pub fn convert_scene(
    scene: &mut SceneDocument,
    options: ConversionOptions,
) -> Result<ConversionReport, ConvertError> {
    ConversionRun::new(options).convert_scene(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TargetModel;
    use matbridge_graph::{Material, ObjectKind, SceneObject};

    fn scene_with(objects: Vec<SceneObject>) -> SceneDocument {
        let mut scene = SceneDocument::new("Test");
        for object in objects {
            scene.add_object(object);
        }
        scene
    }

    #[test]
    fn test_no_targets() {
        let mut scene = scene_with(vec![
            SceneObject::new("Camera", ObjectKind::Camera).selected(),
            SceneObject::new("Body", ObjectKind::Mesh),
        ]);
        let result = convert_scene(&mut scene, ConversionOptions::default());
        assert!(matches!(result, Err(ConvertError::NoTargets { scope: Scope::Selected })));
    }

    #[test]
    fn test_scene_scope_includes_unselected() {
        let mut scene = SceneDocument::new("Test");
        let id = scene.add_material(Material::new("Skin"));
        scene.add_object(SceneObject::new("Body", ObjectKind::Mesh).with_slot(Some(id)));
        scene.add_object(SceneObject::new("Text", ObjectKind::Font).with_slot(None));

        let mut options = ConversionOptions::default();
        options.scope = Scope::Scene;
        let report = convert_scene(&mut scene, options).unwrap();
        assert_eq!(report.objects, 2);
        assert_eq!(report.slots_scanned, 2);
        assert_eq!(report.slots_converted, 1);
        assert_eq!(report.unique_materials, 1);
        assert!(scene.material_by_name("VRM_SIMPLE_Skin").is_some());
        assert!(scene.material_by_name("Skin").is_some());
    }

    #[test]
    fn test_neither_create_nor_overwrite_skips() {
        let mut scene = SceneDocument::new("Test");
        let id = scene.add_material(Material::new("Skin"));
        scene.add_object(SceneObject::new("Body", ObjectKind::Mesh).selected().with_slot(Some(id)));

        let mut options = ConversionOptions::for_target(TargetModel::Toon);
        options.create_new = false;
        let report = convert_scene(&mut scene, options).unwrap();
        assert_eq!(report.slots_skipped, 1);
        assert_eq!(scene.objects[0].material_slots[0], Some(id));
        assert_eq!(scene.materials.len(), 1);
    }

    #[test]
    fn test_overwrite_rebuilds_in_place() {
        let mut scene = SceneDocument::new("Test");
        let id = scene.add_material(Material::new("Skin"));
        scene.add_object(SceneObject::new("Body", ObjectKind::Mesh).selected().with_slot(Some(id)));

        let mut options = ConversionOptions::for_target(TargetModel::Toon);
        options.create_new = false;
        options.overwrite = true;
        let mut run = ConversionRun::new(options);
        let report = run.convert_scene(&mut scene).unwrap();

        assert_eq!(report.unique_materials, 1);
        assert_eq!(run.cached(id), Some(id));
        assert_eq!(scene.materials.len(), 1);
        let material = scene.material(id).unwrap();
        assert!(material.graph.output_node().is_some());
        assert_eq!(material.settings.blend_mode, matbridge_graph::BlendMode::Clip);
    }

    #[test]
    fn test_missing_material_is_skipped() {
        let mut scene = scene_with(vec![
            SceneObject::new("Body", ObjectKind::Mesh).selected().with_slot(Some(MaterialId::new())),
        ]);
        let report = convert_scene(&mut scene, ConversionOptions::default()).unwrap();
        assert_eq!(report.slots_skipped, 1);
        assert_eq!(report.slots_converted, 0);
    }
}
