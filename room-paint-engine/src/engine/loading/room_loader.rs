use bevy::asset::LoadState;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::surface_classifier::PaintableSurfaces;
use crate::rpc::web_rpc::WebRpcInterface;

/// Entity carrying the room model's scene.
#[derive(Component)]
pub struct RoomRoot;

pub fn spawn_room(
    commands: &mut Commands,
    asset_server: &AssetServer,
    model: &str,
    loading_progress: &mut LoadingProgress,
) {
    info!("Loading room model {model}");
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(model.to_string()));

    let root = commands
        .spawn((
            RoomRoot,
            Name::new("Room"),
            SceneRoot(scene),
            Transform::default(),
        ))
        .observe(on_room_scene_ready)
        .id();

    loading_progress.room_root = Some(root);
}

/// Scene-dependent work waits for this flag.
pub fn on_room_scene_ready(
    trigger: Trigger<SceneInstanceReady>,
    mut loading_progress: ResMut<LoadingProgress>,
) {
    if loading_progress.room_root == Some(trigger.target()) {
        info!("✓ Room scene ready");
        loading_progress.scene_ready = true;
    }
}

pub fn watch_room_load(
    mut loading_progress: ResMut<LoadingProgress>,
    asset_server: Res<AssetServer>,
    rooms: Query<&SceneRoot, With<RoomRoot>>,
) {
    if loading_progress.scene_ready || loading_progress.load_error.is_some() {
        return;
    }
    for scene_root in &rooms {
        if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&scene_root.0) {
            error!("Room model failed to load: {err}");
            loading_progress.load_error = Some(err.to_string());
        }
    }
}

/// Tell the host page once the room is usable or has failed.
pub fn report_room_status(
    loading_progress: Res<LoadingProgress>,
    surfaces: Option<Res<PaintableSurfaces>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut reported: Local<bool>,
) {
    if *reported || !loading_progress.is_changed() {
        return;
    }
    if !loading_progress.room_ready() && loading_progress.load_error.is_none() {
        return;
    }

    rpc_interface.send_notification("room_status", room_status(&loading_progress, surfaces.as_deref()));
    *reported = true;
}

pub fn room_status(
    loading_progress: &LoadingProgress,
    surfaces: Option<&PaintableSurfaces>,
) -> serde_json::Value {
    serde_json::json!({
        "loaded": loading_progress.room_ready(),
        "paintable": surfaces.map_or(0, |s| s.paintable.len()),
        "excluded": surfaces.map_or(0, |s| s.excluded.len()),
        "error": loading_progress.load_error,
    })
}
