use bevy::asset::AssetMetaCheck;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use constants::render_settings::CLEAR_COLOUR;

use crate::engine::assets::room_manifest::RoomManifest;
use crate::engine::camera::framing::frame_room_camera;
use crate::engine::camera::viewport_camera::{OrbitCamera, RoomCamera, orbit_camera_controller};
use crate::engine::core::app_state::{AppMode, UiCamera, enter_preview, exit_preview};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::manifest_loader::{ManifestLoader, load_manifest_system, start_loading};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::room_loader::{report_room_status, watch_room_load};
use crate::engine::scene::lighting::spawn_lighting;
use crate::engine::scene::paint_material::{ActivePaint, apply_paint_colour};
use crate::engine::scene::surface_classifier::{ActiveSurfacePolicy, classify_room_surfaces};
use crate::rpc::web_rpc::WebRpcPlugin;
use crate::tools::colour_sampler::ColourSamplerPlugin;
use crate::tools::mode_toggle::{ModeRequestEvent, handle_mode_requests, mode_button_interaction};

#[cfg(not(target_arch = "wasm32"))]
use crate::tools::mode_toggle::handle_mode_keyboard_shortcuts;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppMode>()
        // Registers RoomManifest as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<RoomManifest>::new(&["json"]))
        .add_plugins(WebRpcPlugin)
        .add_plugins(ColourSamplerPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<ActiveSurfacePolicy>()
        .init_resource::<ActivePaint>()
        .insert_resource(ClearColor(CLEAR_COLOUR))
        .add_event::<ModeRequestEvent>();

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                // Room pipeline: manifest, scene, classification, framing, paint
                load_manifest_system,
                watch_room_load,
                classify_room_surfaces,
                frame_room_camera,
                apply_paint_colour,
                report_room_status,
            )
                .chain(),
        )
        .add_systems(Update, (mode_button_interaction, handle_mode_requests).chain())
        .add_systems(
            Update,
            orbit_camera_controller
                .run_if(in_state(AppMode::Preview))
                .run_if(resource_exists::<OrbitCamera>),
        )
        .add_systems(OnEnter(AppMode::Preview), enter_preview)
        .add_systems(OnExit(AppMode::Preview), exit_preview);

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(
            Update,
            handle_mode_keyboard_shortcuts.before(handle_mode_requests),
        );
    }

    app
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);
    spawn_cameras(&mut commands);
}

/// Room camera renders first and stays off until preview; the UI camera draws on top.
fn spawn_cameras(commands: &mut Commands) {
    commands.spawn((
        Name::new("Room Camera"),
        Camera3d::default(),
        Camera {
            order: 0,
            is_active: false,
            ..default()
        },
        Transform::from_xyz(0.0, 1.6, 4.0).looking_at(Vec3::new(0.0, 1.2, 0.0), Vec3::Y),
        RoomCamera,
    ));

    commands.spawn((
        Name::new("UI Camera"),
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::Default,
            ..default()
        },
        IsDefaultUiCamera,
        UiCamera,
    ));
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
