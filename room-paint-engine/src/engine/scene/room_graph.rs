use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::render::mesh::MeshAabb;
use bevy::render::primitives::Aabb;

use crate::engine::assets::bounds::RoomBounds;
use crate::engine::scene::surface_classifier::SurfaceNode;

/// Read access to the mesh nodes below a spawned room scene.
#[derive(SystemParam)]
pub struct RoomGraph<'w, 's> {
    children: Query<'w, 's, &'static Children>,
    parents: Query<'w, 's, &'static ChildOf>,
    names: Query<'w, 's, &'static Name>,
    nodes: Query<
        'w,
        's,
        (
            &'static GlobalTransform,
            &'static Mesh3d,
            Option<&'static Aabb>,
            Option<&'static MeshMaterial3d<StandardMaterial>>,
        ),
    >,
    meshes: Res<'w, Assets<Mesh>>,
}

impl RoomGraph<'_, '_> {
    /// Mesh-bearing descendants of `root`, in hierarchy order.
    pub fn mesh_entities(&self, root: Entity) -> Vec<Entity> {
        self.children
            .iter_descendants(root)
            .filter(|entity| self.nodes.contains(*entity))
            .collect()
    }

    /// World bounds of a single mesh node, `None` until its geometry is known.
    pub fn node_bounds(&self, entity: Entity) -> Option<RoomBounds> {
        let (transform, mesh, aabb, _) = self.nodes.get(entity).ok()?;
        let local = match aabb {
            Some(aabb) => *aabb,
            None => self.meshes.get(&mesh.0)?.compute_aabb()?,
        };
        Some(RoomBounds::from_local_aabb(&local, transform))
    }

    /// Union of every mesh node's world bounds. `None` while nothing has geometry.
    pub fn room_bounds(&self, root: Entity) -> Option<RoomBounds> {
        self.mesh_entities(root)
            .into_iter()
            .filter_map(|entity| self.node_bounds(entity))
            .reduce(RoomBounds::union)
    }

    /// Lower-cased names from just below `root` down to `entity`, joined with `/`.
    pub fn label(&self, entity: Entity, root: Entity) -> String {
        let mut segments: Vec<String> = std::iter::once(entity)
            .chain(self.parents.iter_ancestors(entity))
            .take_while(|e| *e != root)
            .filter_map(|e| self.names.get(e).ok())
            .map(|name| name.as_str().to_lowercase())
            .collect();
        segments.reverse();
        segments.join("/")
    }

    pub fn surface_node(&self, entity: Entity, root: Entity) -> Option<SurfaceNode> {
        let (transform, ..) = self.nodes.get(entity).ok()?;
        let (scale, _, translation) = transform.to_scale_rotation_translation();
        let position_y = self
            .node_bounds(entity)
            .map_or(translation.y, |bounds| bounds.center().y);

        Some(SurfaceNode {
            label: self.label(entity, root),
            position_y,
            scale_y: scale.y,
        })
    }

    pub fn material(&self, entity: Entity) -> Option<Handle<StandardMaterial>> {
        let (.., material) = self.nodes.get(entity).ok()?;
        material.map(|m| m.0.clone())
    }
}
