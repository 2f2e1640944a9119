//! Colour sampling from the live feed.
//!
//! A tap becomes a `SampleRequest`; the request is mapped from screen space into
//! the current frame, reduced to one colour and published as the `ActivePaint`.
//! Frames come from a native webcam, a still photo, or the host page's `<video>`.
//!
//! ```text
//! tap / touch / RPC sample_colour
//!   └─> SampleRequest
//!       └─> sample_colour_on_request()
//!           ├─> ActivePaint (when the feed is ready)
//!           └─> colour_sampled notification
//! ```

use bevy::prelude::*;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::AppMode;
use crate::engine::scene::paint_material::ActivePaint;

/// Native capture-screen overlay: feed, swatch readout, mode button.
#[cfg(not(target_arch = "wasm32"))]
pub mod capture_ui;

/// Frame holder, sample requests and the sampling system.
pub mod live_feed;

/// Webcam capture on a background thread.
#[cfg(all(
    feature = "native-camera",
    any(target_os = "linux", target_os = "macos", target_os = "windows")
))]
pub mod native_camera;

/// Screen-to-image mapping and block averaging.
pub mod sampler;

/// Frame reads from the host page's video element.
#[cfg(target_arch = "wasm32")]
pub mod web_video;

use live_feed::{LiveFeed, SampleRequest, sample_colour_on_request};

pub struct ColourSamplerPlugin;

impl Plugin for ColourSamplerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LiveFeed>()
            .init_resource::<ActivePaint>()
            .add_event::<SampleRequest>();

        #[cfg(target_arch = "wasm32")]
        app.add_systems(
            Update,
            (web_video::refresh_web_feed, sample_colour_on_request).chain(),
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            use capture_ui::{spawn_capture_overlay, sync_overlay, update_swatch};
            use live_feed::{
                emit_sample_requests, install_still_frame, track_video_viewport,
                update_feed_display,
            };

            app.add_systems(Startup, spawn_capture_overlay).add_systems(
                Update,
                (
                    install_still_frame,
                    track_video_viewport,
                    emit_sample_requests.run_if(in_state(AppMode::Capture)),
                    sample_colour_on_request,
                    update_feed_display,
                    update_swatch,
                    sync_overlay,
                )
                    .chain(),
            );
        }

        #[cfg(all(
            feature = "native-camera",
            any(target_os = "linux", target_os = "macos", target_os = "windows")
        ))]
        {
            use native_camera::{
                pump_camera_frames, release_camera_for_still_frame, start_camera_stream,
                stop_camera_stream,
            };

            app.add_systems(OnEnter(AppMode::Capture), start_camera_stream)
                .add_systems(OnExit(AppMode::Capture), stop_camera_stream)
                .add_systems(
                    Update,
                    (
                        pump_camera_frames
                            .before(live_feed::install_still_frame)
                            .run_if(in_state(AppMode::Capture)),
                        release_camera_for_still_frame.after(live_feed::install_still_frame),
                    ),
                );
        }

        #[cfg(all(
            not(target_arch = "wasm32"),
            not(all(
                feature = "native-camera",
                any(target_os = "linux", target_os = "macos", target_os = "windows")
            ))
        ))]
        info!("Built without native-camera; set still_frame in the manifest to sample a photo");
    }
}
