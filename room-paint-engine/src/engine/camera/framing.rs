use bevy::prelude::*;

use constants::framing::FORWARD_OFFSET_RANGE;

use crate::engine::assets::bounds::RoomBounds;
use crate::engine::assets::room_manifest::{FramingSettings, RoomManifest};
use crate::engine::camera::viewport_camera::{OrbitCamera, RoomCamera};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::room_graph::RoomGraph;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye).looking_at(self.target, Vec3::Y)
    }
}

/// Eye-level pose at the room's horizontal centre, nudged forward along +Z
/// and looking slightly down. Heights are measured from the room floor.
pub fn frame_room(bounds: &RoomBounds, settings: &FramingSettings) -> CameraPose {
    let center = bounds.center();
    let floor = bounds.floor_height();
    let offset = settings
        .forward_offset
        .clamp(FORWARD_OFFSET_RANGE.0, FORWARD_OFFSET_RANGE.1);

    CameraPose {
        eye: Vec3::new(center.x, floor + settings.eye_height, center.z + offset),
        target: Vec3::new(center.x, floor + settings.target_height, center.z),
    }
}

/// Place the room camera once per load. Later frames belong to the orbit controller.
pub fn frame_room_camera(
    mut commands: Commands,
    mut progress: ResMut<LoadingProgress>,
    manifest: Option<Res<RoomManifest>>,
    graph: RoomGraph,
    mut cameras: Query<&mut Transform, With<RoomCamera>>,
) {
    if !progress.scene_ready || progress.camera_framed {
        return;
    }
    let Some(root) = progress.room_root else {
        return;
    };
    let Some(bounds) = graph.room_bounds(root) else {
        return;
    };

    let settings = manifest.map(|m| m.framing).unwrap_or_default();
    let pose = frame_room(&bounds, &settings);

    for mut transform in &mut cameras {
        *transform = pose.transform();
    }
    commands.insert_resource(OrbitCamera::from_pose(&pose));
    progress.camera_framed = true;

    info!(
        "✓ Camera framed: eye {:.2?} target {:.2?}",
        pose.eye, pose.target
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::test_room::spawn_test_room;
    use approx::assert_abs_diff_eq;
    use bevy::ecs::system::RunSystemOnce;

    fn room() -> RoomBounds {
        RoomBounds::new(Vec3::new(-2.0, 0.0, -4.0), Vec3::new(6.0, 2.6, 2.0))
    }

    #[test]
    fn default_pose_sits_at_eye_level_in_the_centre() {
        let pose = frame_room(&room(), &FramingSettings::default());
        assert_abs_diff_eq!(pose.eye.x, 2.0);
        assert_abs_diff_eq!(pose.eye.y, 1.6);
        assert_abs_diff_eq!(pose.eye.z, -0.5);
        assert_abs_diff_eq!(pose.target.x, 2.0);
        assert_abs_diff_eq!(pose.target.y, 1.4);
        assert_abs_diff_eq!(pose.target.z, -1.0);
    }

    #[test]
    fn heights_follow_a_raised_floor() {
        let bounds = RoomBounds::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(4.0, 5.5, 4.0));
        let pose = frame_room(&bounds, &FramingSettings::default());
        assert_abs_diff_eq!(pose.eye.y, 4.6, epsilon = 1e-5);
        assert_abs_diff_eq!(pose.target.y, 4.4, epsilon = 1e-5);
    }

    #[test]
    fn forward_offset_is_clamped() {
        let settings = FramingSettings {
            forward_offset: 5.0,
            ..default()
        };
        let pose = frame_room(&room(), &settings);
        assert_abs_diff_eq!(pose.eye.z - pose.target.z, 1.0);
    }

    #[test]
    fn pose_looks_slightly_down() {
        let transform = frame_room(&room(), &FramingSettings::default()).transform();
        let forward = transform.forward();
        assert!(forward.y < 0.0);
        assert!(forward.z < 0.0);
    }

    #[test]
    fn framing_runs_once_per_load() {
        let mut world = World::new();
        spawn_test_room(&mut world);
        let camera = world.spawn((RoomCamera, Transform::default())).id();

        world.run_system_once(frame_room_camera).unwrap();
        let framed = *world.get::<Transform>(camera).unwrap();
        assert_abs_diff_eq!(framed.translation.y, 1.6, epsilon = 1e-5);
        assert!(world.resource::<LoadingProgress>().camera_framed);
        assert!(world.get_resource::<OrbitCamera>().is_some());

        // User moves the camera; a second pass must leave it alone.
        world.get_mut::<Transform>(camera).unwrap().translation = Vec3::new(9.0, 9.0, 9.0);
        world.run_system_once(frame_room_camera).unwrap();
        assert_eq!(
            world.get::<Transform>(camera).unwrap().translation,
            Vec3::new(9.0, 9.0, 9.0)
        );
    }

    #[test]
    fn framing_waits_for_geometry() {
        let mut world = World::new();
        spawn_test_room(&mut world);
        world.resource_mut::<LoadingProgress>().room_root = None;
        world.spawn((RoomCamera, Transform::default()));

        world.run_system_once(frame_room_camera).unwrap();
        assert!(!world.resource::<LoadingProgress>().camera_framed);
    }
}
