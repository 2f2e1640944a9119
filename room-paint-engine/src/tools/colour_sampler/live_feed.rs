use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use image::{DynamicImage, RgbImage};

use crate::engine::assets::room_manifest::RoomManifest;
use crate::engine::scene::paint_material::ActivePaint;
use crate::rpc::web_rpc::WebRpcInterface;
use crate::tools::colour_sampler::sampler::{SampleOutcome, SamplePolicy, sample_colour_at};

/// Where the current frame comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedSource {
    #[default]
    None,
    Camera,
    Still,
    Video,
}

/// Latest decoded frame plus the rectangle it is displayed in, in logical
/// screen pixels. Sampling is not ready until both exist.
#[derive(Resource, Debug, Default)]
pub struct LiveFeed {
    frame: Option<RgbImage>,
    viewport: Option<Rect>,
    pub source: FeedSource,
    /// Texture the overlay shows the feed through.
    pub display: Handle<Image>,
}

impl LiveFeed {
    pub fn is_ready(&self) -> bool {
        self.frame.is_some() && self.viewport.is_some()
    }

    pub fn set_frame(&mut self, frame: RgbImage, source: FeedSource) {
        self.frame = Some(frame);
        self.source = source;
    }

    pub fn clear_frame(&mut self) {
        self.frame = None;
    }

    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Option<Rect>) {
        self.viewport = viewport;
    }

    pub fn sample(&self, screen_point: Vec2, policy: SamplePolicy) -> SampleOutcome {
        let Some(viewport) = self.viewport else {
            return SampleOutcome::NotReady;
        };
        sample_colour_at(self.frame.as_ref(), screen_point, viewport, policy)
    }
}

/// A tap on the displayed feed, in logical screen pixels.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SampleRequest {
    pub screen_point: Vec2,
}

/// Sample the feed for each request and publish the colour as the active paint.
/// A not-ready feed leaves the paint untouched.
pub fn sample_colour_on_request(
    mut requests: EventReader<SampleRequest>,
    feed: Res<LiveFeed>,
    manifest: Option<Res<RoomManifest>>,
    mut paint: ResMut<ActivePaint>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if !feed.is_ready() {
        for request in requests.read() {
            debug!(
                "Sample at {:?} skipped, no frame on screen yet",
                request.screen_point
            );
        }
        return;
    }

    let policy = manifest
        .map(|m| m.sampling.to_policy())
        .unwrap_or_default();

    for request in requests.read() {
        match feed.sample(request.screen_point, policy) {
            SampleOutcome::NotReady => {
                debug!(
                    "Sample at {:?} skipped, frame or viewport is empty",
                    request.screen_point
                );
            }
            SampleOutcome::Sampled {
                colour,
                image_point,
            } => {
                info!(
                    "Sampled {} at image ({}, {})",
                    colour, image_point.x, image_point.y
                );
                paint.set_if_neq(ActivePaint {
                    colour: Some(colour),
                    sampled: true,
                });
                rpc_interface.send_notification(
                    "colour_sampled",
                    serde_json::json!({
                        "hex": colour.hex(),
                        "rgb": colour.channels(),
                        "image_x": image_point.x,
                        "image_y": image_point.y,
                    }),
                );
            }
        }
    }
}

/// Rectangle of a UI node in logical pixels, from its physical centre and size.
pub fn video_viewport_rect(center: Vec2, size: Vec2, inverse_scale_factor: f32) -> Option<Rect> {
    let size = size * inverse_scale_factor;
    if size.x <= 0.0 || size.y <= 0.0 {
        return None;
    }
    Some(Rect::from_center_size(center * inverse_scale_factor, size))
}

/// Copy the current frame into the overlay texture.
pub fn update_feed_display(feed: Res<LiveFeed>, mut images: ResMut<Assets<Image>>) {
    if !feed.is_changed() {
        return;
    }
    let Some(frame) = feed.frame.as_ref() else {
        return;
    };
    if let Some(image) = images.get_mut(&feed.display) {
        *image = Image::from_dynamic(
            DynamicImage::ImageRgb8(frame.clone()),
            true,
            RenderAssetUsages::RENDER_WORLD,
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::*;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use bevy::prelude::*;
    use bevy::ui::ComputedNode;
    use bevy::window::PrimaryWindow;

    use super::{FeedSource, LiveFeed, SampleRequest, video_viewport_rect};
    use crate::engine::assets::room_manifest::RoomManifest;
    use crate::error::FeedError;
    use crate::tools::colour_sampler::capture_ui::VideoSurface;

    /// Turn clicks and touches on the capture screen into sample requests.
    /// Presses over a button belong to the button.
    pub fn emit_sample_requests(
        mouse_button: Res<ButtonInput<MouseButton>>,
        touches: Res<Touches>,
        windows: Query<&Window, With<PrimaryWindow>>,
        buttons: Query<&Interaction, With<Button>>,
        mut requests: EventWriter<SampleRequest>,
    ) {
        if buttons.iter().any(|i| *i != Interaction::None) {
            return;
        }

        if mouse_button.just_pressed(MouseButton::Left) {
            if let Some(position) = windows.single().ok().and_then(|w| w.cursor_position()) {
                requests.write(SampleRequest {
                    screen_point: position,
                });
            }
        }

        for touch in touches.iter_just_pressed() {
            requests.write(SampleRequest {
                screen_point: touch.position(),
            });
        }
    }

    pub fn track_video_viewport(
        surfaces: Query<(&ComputedNode, &GlobalTransform), With<VideoSurface>>,
        mut feed: ResMut<LiveFeed>,
    ) {
        let viewport = surfaces.iter().next().and_then(|(node, transform)| {
            video_viewport_rect(
                transform.translation().truncate(),
                node.size(),
                node.inverse_scale_factor(),
            )
        });
        if feed.viewport() != viewport {
            feed.set_viewport(viewport);
        }
    }

    pub fn load_still_frame(path: &str) -> Result<image::RgbImage, FeedError> {
        let full_path = bevy::asset::io::file::FileAssetReader::get_base_path()
            .join("assets")
            .join(path);
        let image = image::open(&full_path).map_err(|source| FeedError::StillFrame {
            path: full_path.display().to_string(),
            source,
        })?;
        Ok(image.to_rgb8())
    }

    /// Use the manifest's still photo as the feed once the manifest arrives.
    pub fn install_still_frame(
        manifest: Option<Res<RoomManifest>>,
        mut feed: ResMut<LiveFeed>,
    ) {
        let Some(manifest) = manifest else {
            return;
        };
        if !manifest.is_added() {
            return;
        }
        let Some(path) = manifest.still_frame.as_deref() else {
            return;
        };

        match load_still_frame(path) {
            Ok(frame) => {
                info!(
                    "✓ Still frame {path} ({}x{}) in use as the live feed",
                    frame.width(),
                    frame.height()
                );
                feed.set_frame(frame, FeedSource::Still);
            }
            Err(err) => warn!("{err}, keeping the camera feed"),
        }
    }
}
