use bevy::prelude::*;

/// Paint finish bounds. Walls read matte-to-satin and are never metallic.
pub const PAINT_ROUGHNESS: f32 = 0.65;
pub const PAINT_ROUGHNESS_RANGE: (f32, f32) = (0.45, 0.85);
pub const PAINT_METALNESS: f32 = 0.0;
pub const PAINT_METALNESS_RANGE: (f32, f32) = (0.0, 0.02);

pub const CLEAR_COLOUR: Color = Color::srgb(0.08, 0.08, 0.09);
pub const AMBIENT_COLOUR: Color = Color::srgb(1.0, 0.97, 0.92);
pub const AMBIENT_BRIGHTNESS: f32 = 350.0;
pub const SUN_ILLUMINANCE: f32 = 6_000.0;

pub const PANEL_COLOUR: Color = Color::srgba(0.10, 0.11, 0.13, 0.85);
pub const BUTTON_COLOUR: Color = Color::srgb(0.22, 0.24, 0.28);
pub const BUTTON_HOVER_COLOUR: Color = Color::srgb(0.26, 0.28, 0.32);
pub const BUTTON_PRESSED_COLOUR: Color = Color::srgb(0.18, 0.20, 0.24);
pub const BUTTON_DISABLED_COLOUR: Color = Color::srgb(0.15, 0.15, 0.16);
