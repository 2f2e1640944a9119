use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::math::EulerRot;
use bevy::prelude::*;

use constants::framing::{MAX_ORBIT_DISTANCE, MIN_ORBIT_DISTANCE, PITCH_LIMIT};

use crate::engine::camera::framing::CameraPose;

/// Marker for the 3D camera that renders the room.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct RoomCamera;

/// Orbit state around the look-at target, seeded from the framed pose.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl OrbitCamera {
    pub fn from_pose(pose: &CameraPose) -> Self {
        let offset = pose.eye - pose.target;
        let distance = offset.length().max(MIN_ORBIT_DISTANCE);
        let dir = offset.normalize_or(Vec3::Z);

        Self {
            focus: pose.target,
            yaw: dir.x.atan2(dir.z),
            pitch: (-dir.y).clamp(-1.0, 1.0).asin(),
            distance,
        }
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    pub fn eye(&self) -> Vec3 {
        self.focus + self.rotation() * Vec3::Z * self.distance
    }

    pub fn orbit(&mut self, delta: Vec2) {
        let yaw_sens = 0.0035;
        let pitch_sens = 0.0030;
        self.yaw -= delta.x * yaw_sens;
        self.pitch = (self.pitch - delta.y * pitch_sens).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance * (1.0 - amount * 0.1))
            .clamp(MIN_ORBIT_DISTANCE, MAX_ORBIT_DISTANCE);
    }
}

/// Drag to orbit, wheel to zoom, WASD to pan the focus across the floor.
pub fn orbit_camera_controller(
    mut camera_query: Query<&mut Transform, With<RoomCamera>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    touches: Res<Touches>,
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
        orbit.orbit(mouse_delta);
    }

    // Single-finger drag orbits on touch screens.
    let mut active_touches = touches.iter();
    if let (Some(touch), None) = (active_touches.next(), active_touches.next()) {
        if touch.delta() != Vec2::ZERO {
            orbit.orbit(touch.delta());
        }
    }

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }
    if scroll_accum.abs() > f32::EPSILON {
        orbit.zoom(scroll_accum);
    }

    let mut move_input = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        move_input.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        move_input.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        move_input.x += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        move_input.x -= 1.0;
    }

    if move_input != Vec2::ZERO {
        let heading = Quat::from_rotation_y(orbit.yaw);
        let forward = heading * Vec3::Z;
        let right = heading * Vec3::X;

        let mut speed = 1.5;
        if keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            speed *= 2.5;
        }

        let world_delta = right * move_input.x + forward * move_input.y;
        orbit.focus += world_delta.normalize() * speed * time.delta_secs();
    }

    let target_rot = orbit.rotation();
    let target_pos = orbit.eye();

    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, lerp_speed);
    camera_transform.rotation = camera_transform.rotation.slerp(target_rot, lerp_speed);
}
