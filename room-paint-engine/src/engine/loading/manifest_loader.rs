use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::constants::path::RELATIVE_MANIFEST_PATH;
use crate::engine::assets::room_manifest::RoomManifest;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::room_loader::spawn_room;
use crate::engine::scene::surface_classifier::ActiveSurfacePolicy;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    handle: Option<Handle<RoomManifest>>,
}

// Start the loading process
pub fn start_loading(mut manifest_loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    let manifest_path = format!("{}/manifest.json", RELATIVE_MANIFEST_PATH);
    info!("Loading room manifest from {manifest_path}");
    manifest_loader.handle = Some(asset_server.load(manifest_path));
}

/// Install the manifest and spawn the room model. A manifest that fails to
/// load is replaced by the defaults so the room still appears.
pub fn load_manifest_system(
    mut commands: Commands,
    mut loading_progress: ResMut<LoadingProgress>,
    manifest_loader: Res<ManifestLoader>,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<RoomManifest>>,
) {
    if loading_progress.manifest_loaded {
        return;
    }
    let Some(handle) = manifest_loader.handle.as_ref() else {
        return;
    };

    let manifest = if let Some(manifest) = manifests.get(handle) {
        info!("✓ Room manifest loaded");
        manifest.clone()
    } else if let Some(LoadState::Failed(err)) = asset_server.get_load_state(handle) {
        error!("Room manifest failed to load ({err}), using defaults");
        RoomManifest::default()
    } else {
        return;
    };

    commands.insert_resource(ActiveSurfacePolicy::from_manifest(&manifest));
    spawn_room(&mut commands, &asset_server, &manifest.model, &mut loading_progress);
    commands.insert_resource(manifest);
    loading_progress.manifest_loaded = true;
}
