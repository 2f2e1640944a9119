use bevy::prelude::*;

use constants::render_settings::{BUTTON_COLOUR, PANEL_COLOUR};

use crate::engine::core::app_state::AppMode;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::paint_material::ActivePaint;
use crate::tools::colour_sampler::live_feed::LiveFeed;
use crate::tools::mode_toggle::{ModeButton, ModeButtonLabel};

/// Image node showing the live feed. Its rectangle is the sampling viewport.
#[derive(Component)]
pub struct VideoSurface;

#[derive(Component)]
pub struct Swatch;

#[derive(Component)]
pub struct SwatchLabel;

#[derive(Component)]
pub struct LoadingPlaceholder;

const SAMPLE_HINT: &str = "Tap a wall to sample its colour";

// Full-window feed with the swatch readout bottom-left and the mode button bottom-right
pub fn spawn_capture_overlay(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut feed: ResMut<LiveFeed>,
) {
    feed.display = images.add(Image::default());

    commands
        .spawn((
            Name::new("CaptureOverlay"),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                VideoSurface,
                Name::new("VideoSurface"),
                ImageNode::new(feed.display.clone()),
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
            ));

            parent.spawn((
                LoadingPlaceholder,
                Name::new("LoadingPlaceholder"),
                Text::new("Loading room..."),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.85)),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Percent(50.0),
                    top: Val::Percent(50.0),
                    ..default()
                },
                Visibility::Hidden,
            ));

            parent
                .spawn((
                    Name::new("SwatchPanel"),
                    BackgroundColor(PANEL_COLOUR),
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(12.0),
                        bottom: Val::Px(12.0),
                        padding: UiRect::all(Val::Px(8.0)),
                        column_gap: Val::Px(10.0),
                        align_items: AlignItems::Center,
                        ..default()
                    },
                ))
                .with_children(|panel| {
                    panel.spawn((
                        Swatch,
                        Name::new("Swatch"),
                        BackgroundColor(Color::NONE),
                        BorderColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
                        Node {
                            width: Val::Px(36.0),
                            height: Val::Px(36.0),
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                    ));
                    panel.spawn((
                        SwatchLabel,
                        Text::new(SAMPLE_HINT),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });

            parent
                .spawn((
                    ModeButton,
                    Name::new("ModeButton"),
                    Button,
                    BackgroundColor(BUTTON_COLOUR),
                    BorderColor(Color::srgba(0.0, 0.0, 0.0, 0.25)),
                    Node {
                        position_type: PositionType::Absolute,
                        right: Val::Px(12.0),
                        bottom: Val::Px(12.0),
                        padding: UiRect::axes(Val::Px(16.0), Val::Px(10.0)),
                        border: UiRect::all(Val::Px(1.0)),
                        ..default()
                    },
                ))
                .with_children(|button| {
                    button.spawn((
                        ModeButtonLabel,
                        Text::new("Preview"),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });
        });
}

pub fn update_swatch(
    paint: Res<ActivePaint>,
    mut swatches: Query<&mut BackgroundColor, With<Swatch>>,
    mut labels: Query<&mut Text, With<SwatchLabel>>,
) {
    if !paint.is_changed() {
        return;
    }
    let Some(colour) = paint.colour else {
        return;
    };
    for mut background in &mut swatches {
        background.0 = colour.display_colour();
    }
    for mut text in &mut labels {
        text.0 = colour.hex();
    }
}

/// Show the feed in capture, the placeholder in preview until the room is ready.
pub fn sync_overlay(
    mode: Res<State<AppMode>>,
    progress: Res<LoadingProgress>,
    mut video: Query<&mut Visibility, With<VideoSurface>>,
    mut placeholder: Query<(&mut Visibility, &mut Text), (With<LoadingPlaceholder>, Without<VideoSurface>)>,
    mut button_labels: Query<&mut Text, (With<ModeButtonLabel>, Without<LoadingPlaceholder>)>,
) {
    let capturing = *mode.get() == AppMode::Capture;

    for mut visibility in &mut video {
        visibility.set_if_neq(if capturing {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
    }

    let waiting = !capturing && !progress.room_ready();
    for (mut visibility, mut text) in &mut placeholder {
        visibility.set_if_neq(if waiting {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        });
        let message = match &progress.load_error {
            Some(err) => format!("Room failed to load: {err}"),
            None => "Loading room...".to_string(),
        };
        if text.0 != message {
            text.0 = message;
        }
    }

    let label = if capturing { "Preview" } else { "Retake" };
    for mut text in &mut button_labels {
        if text.0 != label {
            text.0 = label.to_string();
        }
    }
}
