use bevy::prelude::*;
use bevy::render::primitives::Aabb;

use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::surface_classifier::ActiveSurfacePolicy;

pub struct TestRoom {
    pub root: Entity,
    pub wall: Entity,
    pub floor: Entity,
    pub sofa: Entity,
    pub ceiling: Entity,
    pub shared_material: Handle<StandardMaterial>,
}

fn spawn_node(
    world: &mut World,
    root: Entity,
    name: &str,
    translation: Vec3,
    half_extents: Vec3,
    material: &Handle<StandardMaterial>,
) -> Entity {
    world
        .spawn((
            Name::new(name.to_string()),
            Mesh3d(Handle::default()),
            MeshMaterial3d(material.clone()),
            Aabb::from_min_max(-half_extents, half_extents),
            GlobalTransform::from_translation(translation),
            ChildOf(root),
        ))
        .id()
}

/// A 6 x 2.8 x 6 room whose four nodes all share one textured material.
pub fn spawn_test_room(world: &mut World) -> TestRoom {
    world.init_resource::<Assets<Mesh>>();
    world.init_resource::<Assets<Image>>();
    world.init_resource::<Assets<StandardMaterial>>();
    world.init_resource::<ActiveSurfacePolicy>();

    let texture = world.resource_mut::<Assets<Image>>().add(Image::default());
    let shared_material = world
        .resource_mut::<Assets<StandardMaterial>>()
        .add(StandardMaterial {
            base_color: Color::srgb(0.8, 0.8, 0.8),
            base_color_texture: Some(texture),
            perceptual_roughness: 0.3,
            metallic: 0.5,
            ..default()
        });

    let root = world
        .spawn((Name::new("Room"), Transform::default(), GlobalTransform::default()))
        .id();

    let wall = spawn_node(
        world,
        root,
        "Wall_North",
        Vec3::new(0.0, 1.4, -3.0),
        Vec3::new(3.0, 1.4, 0.05),
        &shared_material,
    );
    let floor = spawn_node(
        world,
        root,
        "Floor_Main",
        Vec3::ZERO,
        Vec3::new(3.0, 0.0, 3.0),
        &shared_material,
    );
    let sofa = spawn_node(
        world,
        root,
        "Sofa_01",
        Vec3::new(1.0, 0.4, 1.0),
        Vec3::new(1.0, 0.4, 0.5),
        &shared_material,
    );
    let ceiling = spawn_node(
        world,
        root,
        "Ceiling",
        Vec3::new(0.0, 2.8, 0.0),
        Vec3::new(3.0, 0.0, 3.0),
        &shared_material,
    );

    world.insert_resource(LoadingProgress {
        scene_ready: true,
        room_root: Some(root),
        ..default()
    });

    TestRoom {
        root,
        wall,
        floor,
        sofa,
        ceiling,
        shared_material,
    }
}
