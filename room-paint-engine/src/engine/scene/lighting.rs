use bevy::prelude::*;

use constants::render_settings::{AMBIENT_BRIGHTNESS, AMBIENT_COLOUR, SUN_ILLUMINANCE};

/// Soft ambient fill plus one angled sun so painted walls show some falloff.
pub fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: AMBIENT_COLOUR,
        brightness: AMBIENT_BRIGHTNESS,
        ..default()
    });

    commands.spawn((
        Name::new("Sun"),
        DirectionalLight {
            illuminance: SUN_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}
