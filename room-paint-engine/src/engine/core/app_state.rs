use bevy::prelude::*;

use crate::engine::camera::viewport_camera::RoomCamera;

/// Top-level screen. Capture shows the live feed, Preview shows the painted room.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppMode {
    #[default]
    Capture,
    Preview,
}

impl AppMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Capture => "capture",
            AppMode::Preview => "preview",
        }
    }

    fn other(&self) -> Self {
        match self {
            AppMode::Capture => AppMode::Preview,
            AppMode::Preview => AppMode::Capture,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeRequest {
    Preview,
    /// Retake: always allowed from preview.
    Capture,
    Toggle,
}

impl ModeRequest {
    /// Accepts `preview`/`vr`, `capture`/`camera` and `toggle`, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "preview" | "vr" => Some(Self::Preview),
            "capture" | "camera" | "retake" => Some(Self::Capture),
            "toggle" => Some(Self::Toggle),
            _ => None,
        }
    }

    pub fn target(&self, current: AppMode) -> AppMode {
        match self {
            Self::Preview => AppMode::Preview,
            Self::Capture => AppMode::Capture,
            Self::Toggle => current.other(),
        }
    }
}

/// Guarded transition. `None` when the request leaves the mode unchanged or
/// asks for preview before any colour has been captured.
pub fn resolve_mode_request(
    current: AppMode,
    request: ModeRequest,
    has_captured: bool,
) -> Option<AppMode> {
    match (current, request.target(current)) {
        (AppMode::Capture, AppMode::Preview) if has_captured => Some(AppMode::Preview),
        (AppMode::Preview, AppMode::Capture) => Some(AppMode::Capture),
        _ => None,
    }
}

/// Marker for the 2D camera drawing the overlay UI.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct UiCamera;

pub fn enter_preview(
    mut room_cameras: Query<&mut Camera, With<RoomCamera>>,
    mut ui_cameras: Query<&mut Camera, (With<UiCamera>, Without<RoomCamera>)>,
) {
    for mut camera in &mut room_cameras {
        camera.is_active = true;
    }
    for mut camera in &mut ui_cameras {
        camera.clear_color = ClearColorConfig::None;
    }
    info!("→ Entered preview");
}

/// Stop rendering the room while capturing.
pub fn exit_preview(
    mut room_cameras: Query<&mut Camera, With<RoomCamera>>,
    mut ui_cameras: Query<&mut Camera, (With<UiCamera>, Without<RoomCamera>)>,
) {
    for mut camera in &mut room_cameras {
        camera.is_active = false;
    }
    for mut camera in &mut ui_cameras {
        camera.clear_color = ClearColorConfig::Default;
    }
    info!("→ Entered capture");
}
