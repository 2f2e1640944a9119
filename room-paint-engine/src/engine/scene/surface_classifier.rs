use std::collections::HashMap;
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::surface::get_role_name;

use crate::engine::assets::bounds::RoomBounds;
use crate::engine::assets::room_manifest::{ClassificationConfig, RoomManifest};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::paint_material::paint_material;
use crate::engine::scene::room_graph::RoomGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceClass {
    Paintable,
    Excluded,
}

impl SurfaceClass {
    pub fn role_id(&self) -> u8 {
        match self {
            Self::Paintable => 0,
            Self::Excluded => 1,
        }
    }
}

impl fmt::Display for SurfaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&get_role_name(self.role_id()))
    }
}

/// Node metadata a policy classifies from.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceNode {
    /// Lower-cased hierarchical name, e.g. `scene/wall_north/wall_north.0`.
    pub label: String,
    /// World-space height of the node's geometry centre.
    pub position_y: f32,
    pub scale_y: f32,
}

impl SurfaceNode {
    fn segments(&self) -> impl Iterator<Item = &str> {
        self.label.rsplit('/')
    }

    /// The mesh node and its primitive child, without enclosing groups.
    fn own_name(&self) -> String {
        let mut own: Vec<&str> = self.segments().take(2).collect();
        own.reverse();
        own.join("/").to_lowercase()
    }
}

/// Pure mapping from node metadata to a surface tag.
pub trait SurfacePolicy: Send + Sync {
    fn classify(&self, node: &SurfaceNode, bounds: &RoomBounds) -> SurfaceClass;
}

/// Substring vocabularies first, then the floor heuristic, defaulting to paintable.
/// Tall scaled nodes are structural walls, which the default already covers.
#[derive(Debug, Clone)]
pub struct NamingHeuristic {
    exclude: Vec<String>,
    include: Vec<String>,
    floor_epsilon: f32,
    wall_scale_threshold: f32,
}

impl NamingHeuristic {
    pub fn from_config(config: &ClassificationConfig) -> Self {
        let lower = |terms: &[String]| terms.iter().map(|t| t.to_lowercase()).collect();
        Self {
            exclude: lower(&config.exclude),
            include: lower(&config.include),
            floor_epsilon: config.floor_epsilon,
            wall_scale_threshold: config.wall_scale_threshold,
        }
    }
}

impl Default for NamingHeuristic {
    fn default() -> Self {
        Self::from_config(&ClassificationConfig::default())
    }
}

impl SurfacePolicy for NamingHeuristic {
    fn classify(&self, node: &SurfaceNode, bounds: &RoomBounds) -> SurfaceClass {
        let label = node.label.to_lowercase();
        let own_name = node.own_name();
        let matches =
            |name: &str, terms: &[String]| terms.iter().any(|t| name.contains(t.as_str()));

        // Exclusions apply through groups, inclusions only to the node itself.
        if matches(&label, &self.exclude) {
            return SurfaceClass::Excluded;
        }
        if matches(&own_name, &self.include) {
            return SurfaceClass::Paintable;
        }
        if (node.position_y - bounds.floor_height()).abs() <= self.floor_epsilon {
            return SurfaceClass::Excluded;
        }
        if node.scale_y > self.wall_scale_threshold {
            debug!("{} taken as a structural wall (scale {:.2})", node.label, node.scale_y);
        }
        SurfaceClass::Paintable
    }
}

/// Per-asset tags keyed by node name, falling back to another policy.
pub struct OverridePolicy {
    overrides: HashMap<String, SurfaceClass>,
    fallback: Box<dyn SurfacePolicy>,
}

impl OverridePolicy {
    pub fn new(overrides: &HashMap<String, SurfaceClass>, fallback: Box<dyn SurfacePolicy>) -> Self {
        Self {
            overrides: overrides
                .iter()
                .map(|(name, class)| (name.to_lowercase(), *class))
                .collect(),
            fallback,
        }
    }
}

impl SurfacePolicy for OverridePolicy {
    fn classify(&self, node: &SurfaceNode, bounds: &RoomBounds) -> SurfaceClass {
        // Deepest named segment wins.
        node.segments()
            .find_map(|segment| self.overrides.get(segment).copied())
            .unwrap_or_else(|| self.fallback.classify(node, bounds))
    }
}

pub fn classify_surfaces<'a>(
    nodes: impl IntoIterator<Item = &'a SurfaceNode>,
    bounds: &RoomBounds,
    policy: &dyn SurfacePolicy,
) -> Vec<SurfaceClass> {
    nodes
        .into_iter()
        .map(|node| policy.classify(node, bounds))
        .collect()
}

/// Policy used when the room is classified.
#[derive(Resource)]
pub struct ActiveSurfacePolicy(pub Box<dyn SurfacePolicy>);

impl Default for ActiveSurfacePolicy {
    fn default() -> Self {
        Self(Box::new(NamingHeuristic::default()))
    }
}

impl ActiveSurfacePolicy {
    pub fn from_manifest(manifest: &RoomManifest) -> Self {
        let heuristic = Box::new(NamingHeuristic::from_config(&manifest.classification));
        if manifest.classification.overrides.is_empty() {
            Self(heuristic)
        } else {
            Self(Box::new(OverridePolicy::new(
                &manifest.classification.overrides,
                heuristic,
            )))
        }
    }
}

/// Cached classification tag on a room mesh node.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceTag(pub SurfaceClass);

#[derive(Debug, Clone)]
pub struct PaintableSurface {
    pub entity: Entity,
    pub label: String,
    /// Material owned by this node alone.
    pub material: Handle<StandardMaterial>,
}

#[derive(Debug, Clone)]
pub struct ExcludedSurface {
    pub entity: Entity,
    pub label: String,
    pub material: Option<Handle<StandardMaterial>>,
}

/// Partition of the current room, built once per load.
#[derive(Resource, Debug, Clone)]
pub struct PaintableSurfaces {
    pub paintable: Vec<PaintableSurface>,
    pub excluded: Vec<ExcludedSurface>,
    pub bounds: RoomBounds,
}

/// Classify the loaded room and give each paintable node its own paint material.
/// Waits until the scene is ready and its geometry has bounds.
pub fn classify_room_surfaces(
    mut commands: Commands,
    mut progress: ResMut<LoadingProgress>,
    policy: Res<ActiveSurfacePolicy>,
    manifest: Option<Res<RoomManifest>>,
    graph: RoomGraph,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !progress.scene_ready || progress.surfaces_classified {
        return;
    }
    let Some(root) = progress.room_root else {
        return;
    };
    let Some(bounds) = graph.room_bounds(root) else {
        debug!("Room geometry not ready, deferring classification");
        return;
    };

    let finish = manifest
        .map(|m| m.finish)
        .unwrap_or_default()
        .clamped();

    let nodes: Vec<(Entity, SurfaceNode)> = graph
        .mesh_entities(root)
        .into_iter()
        .filter_map(|entity| graph.surface_node(entity, root).map(|node| (entity, node)))
        .collect();
    let classes = classify_surfaces(nodes.iter().map(|(_, node)| node), &bounds, policy.0.as_ref());

    let mut surfaces = PaintableSurfaces {
        paintable: Vec::new(),
        excluded: Vec::new(),
        bounds,
    };

    for ((entity, node), class) in nodes.into_iter().zip(classes) {
        let original = graph.material(entity);
        commands.entity(entity).insert(SurfaceTag(class));
        debug!("{} -> {}", node.label, class);

        match class {
            SurfaceClass::Paintable => {
                let base = original.as_ref().and_then(|h| materials.get(h)).cloned();
                let material = materials.add(paint_material(base.as_ref(), &finish));
                commands
                    .entity(entity)
                    .insert(MeshMaterial3d(material.clone()));
                surfaces.paintable.push(PaintableSurface {
                    entity,
                    label: node.label,
                    material,
                });
            }
            SurfaceClass::Excluded => surfaces.excluded.push(ExcludedSurface {
                entity,
                label: node.label,
                material: original,
            }),
        }
    }

    info!(
        "✓ Surfaces classified: {} paintable, {} excluded",
        surfaces.paintable.len(),
        surfaces.excluded.len()
    );

    commands.insert_resource(surfaces);
    progress.surfaces_classified = true;
}
