//! Frame access for the host page's `<video>` element in web builds.

use bevy::prelude::*;
use image::RgbImage;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement};

use crate::engine::assets::room_manifest::RoomManifest;
use crate::error::FeedError;
use crate::tools::colour_sampler::live_feed::{FeedSource, LiveFeed, SampleRequest};

/// `HTMLMediaElement.HAVE_CURRENT_DATA`
const HAVE_CURRENT_DATA: u16 = 2;

fn browser_error(context: &str, err: wasm_bindgen::JsValue) -> FeedError {
    FeedError::Browser(format!("{context}: {err:?}"))
}

/// Current video frame and its on-page rectangle.
/// `Ok(None)` while the element has not decoded a frame yet.
pub fn read_video_frame(element_id: &str) -> Result<Option<(RgbImage, Rect)>, FeedError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| FeedError::Browser("No document".to_string()))?;

    let video: HtmlVideoElement = document
        .get_element_by_id(element_id)
        .and_then(|e| e.dyn_into().ok())
        .ok_or_else(|| FeedError::ElementMissing(element_id.to_string()))?;

    let (width, height) = (video.video_width(), video.video_height());
    if video.ready_state() < HAVE_CURRENT_DATA || width == 0 || height == 0 {
        return Ok(None);
    }

    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| browser_error("Create canvas", e))?
        .dyn_into()
        .map_err(|_| FeedError::Browser("Canvas element has the wrong type".to_string()))?;
    canvas.set_width(width);
    canvas.set_height(height);

    let context: CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| browser_error("Get 2d context", e))?
        .and_then(|c| c.dyn_into().ok())
        .ok_or_else(|| FeedError::Browser("2d context unavailable".to_string()))?;

    context
        .draw_image_with_html_video_element(&video, 0.0, 0.0)
        .map_err(|e| browser_error("Draw video frame", e))?;
    let rgba = context
        .get_image_data(0.0, 0.0, width as f64, height as f64)
        .map_err(|e| browser_error("Read pixels", e))?
        .data()
        .0;

    let rgb: Vec<u8> = rgba
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let frame = RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| FeedError::Browser("Pixel buffer size mismatch".to_string()))?;

    let bounds = video.get_bounding_client_rect();
    let rect = Rect::new(
        bounds.left() as f32,
        bounds.top() as f32,
        bounds.right() as f32,
        bounds.bottom() as f32,
    );

    Ok(Some((frame, rect)))
}

/// Refresh the feed from the page's video right before pending samples run.
pub fn refresh_web_feed(
    mut requests: EventReader<SampleRequest>,
    manifest: Option<Res<RoomManifest>>,
    mut feed: ResMut<LiveFeed>,
    mut warned: Local<bool>,
) {
    if requests.is_empty() {
        return;
    }
    requests.clear();

    let element_id = manifest
        .map(|m| m.video_element_id.clone())
        .unwrap_or_else(|| constants::sampling::VIDEO_ELEMENT_ID.to_string());

    match read_video_frame(&element_id) {
        Ok(Some((frame, rect))) => {
            feed.set_frame(frame, FeedSource::Video);
            feed.set_viewport(Some(rect));
        }
        Ok(None) => feed.clear_frame(),
        Err(err) => {
            if !*warned {
                warn!("{err}");
                *warned = true;
            }
            feed.clear_frame();
        }
    }
}
