/// Default viewer eye height above the room floor, in metres.
pub const EYE_HEIGHT: f32 = 1.6;

/// Look-at height; slightly under eye level for a natural downward gaze.
pub const TARGET_HEIGHT: f32 = 1.4;

/// Forward bias along +Z so the first view faces into the room.
pub const FORWARD_OFFSET: f32 = 0.5;

/// Allowed range for the forward bias.
pub const FORWARD_OFFSET_RANGE: (f32, f32) = (0.0, 1.0);

/// Orbit distance limits once the user takes over the camera.
pub const MIN_ORBIT_DISTANCE: f32 = 0.1;
pub const MAX_ORBIT_DISTANCE: f32 = 12.0;

/// Pitch is kept away from the poles to avoid gimbal flips.
pub const PITCH_LIMIT: f32 = 1.55;
