use bevy::prelude::*;

/// Milestones of the room load. Each flag is set once per load.
#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub manifest_loaded: bool,
    pub scene_ready: bool,
    pub surfaces_classified: bool,
    pub camera_framed: bool,
    /// Entity carrying the room's `SceneRoot`.
    pub room_root: Option<Entity>,
    /// Set when the manifest or model failed to load.
    pub load_error: Option<String>,
}

impl LoadingProgress {
    /// Geometry is classified and framed; the preview can render.
    pub fn room_ready(&self) -> bool {
        self.surfaces_classified && self.camera_framed
    }
}
