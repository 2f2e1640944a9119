/// Side length of the averaging window used by the colour sampler.
pub const SAMPLE_BLOCK_SIZE: u32 = 5;

/// Native capture defaults (device index, requested resolution, frame rate).
pub const CAMERA_INDEX: u32 = 0;
pub const CAMERA_WIDTH: u32 = 1280;
pub const CAMERA_HEIGHT: u32 = 720;
pub const CAMERA_FPS: u32 = 30;

/// Host-page element holding the live camera stream in web builds.
pub const VIDEO_ELEMENT_ID: &str = "camera-feed";
