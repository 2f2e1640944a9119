//! Webcam capture for native builds.
//!
//! The device is owned by a capture thread that keeps only the newest frame.
//! Dropping the `CameraStream` resource stops the thread, which closes the device.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use bevy::prelude::*;
use image::RgbImage;
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution},
};

use constants::sampling::{CAMERA_FPS, CAMERA_HEIGHT, CAMERA_INDEX, CAMERA_WIDTH};

use crate::error::FeedError;
use crate::tools::colour_sampler::live_feed::{FeedSource, LiveFeed};

#[derive(Default)]
struct FrameSlot {
    frame: Option<RgbImage>,
    error: Option<FeedError>,
}

#[derive(Resource)]
pub struct CameraStream {
    slot: Arc<Mutex<FrameSlot>>,
    running: Arc<AtomicBool>,
}

impl CameraStream {
    pub fn spawn(index: u32, width: u32, height: u32, fps: u32) -> Self {
        let slot = Arc::new(Mutex::new(FrameSlot::default()));
        let running = Arc::new(AtomicBool::new(true));

        let thread_slot = slot.clone();
        let thread_running = running.clone();
        let spawned = thread::Builder::new()
            .name("camera-capture".to_string())
            .spawn(move || run_capture(index, width, height, fps, thread_slot, thread_running));

        if let Err(e) = spawned {
            if let Ok(mut slot) = slot.lock() {
                slot.error = Some(FeedError::CameraInit(format!("Spawn capture thread: {e}")));
            }
        }

        Self { slot, running }
    }

    pub fn take_frame(&self) -> Option<RgbImage> {
        self.slot.lock().ok().and_then(|mut slot| slot.frame.take())
    }

    pub fn take_error(&self) -> Option<FeedError> {
        self.slot.lock().ok().and_then(|mut slot| slot.error.take())
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Drop for CameraStream {
    fn drop(&mut self) {
        self.stop();
    }
}

fn open_camera(index: u32, width: u32, height: u32, fps: u32) -> Result<Camera, FeedError> {
    let format = CameraFormat::new(Resolution::new(width, height), FrameFormat::YUYV, fps);
    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

    let mut camera = Camera::new(CameraIndex::Index(index), requested)
        .map_err(|e| FeedError::CameraInit(format!("Create camera: {e}")))?;
    camera
        .open_stream()
        .map_err(|e| FeedError::CameraInit(format!("Open stream: {e}")))?;
    Ok(camera)
}

fn grab_frame(camera: &mut Camera) -> Result<RgbImage, FeedError> {
    let frame = camera
        .frame()
        .map_err(|e| FeedError::CameraFrame(format!("Fetch frame: {e}")))?;
    let decoded = frame
        .decode_image::<RgbFormat>()
        .map_err(|e| FeedError::CameraFrame(format!("Decode RGB: {e}")))?;

    let (width, height) = decoded.dimensions();
    RgbImage::from_raw(width, height, decoded.into_raw())
        .ok_or_else(|| FeedError::CameraFrame("Frame buffer size mismatch".to_string()))
}

fn run_capture(
    index: u32,
    width: u32,
    height: u32,
    fps: u32,
    slot: Arc<Mutex<FrameSlot>>,
    running: Arc<AtomicBool>,
) {
    let store_error = |error: FeedError| {
        if let Ok(mut slot) = slot.lock() {
            slot.error = Some(error);
        }
    };

    let mut camera = match open_camera(index, width, height, fps) {
        Ok(camera) => camera,
        Err(e) => return store_error(e),
    };

    while running.load(Ordering::Relaxed) {
        match grab_frame(&mut camera) {
            Ok(frame) => {
                if let Ok(mut slot) = slot.lock() {
                    slot.frame = Some(frame);
                }
            }
            Err(e) => {
                store_error(e);
                break;
            }
        }
    }

    let _ = camera.stop_stream();
}

/// Open the webcam when capture starts, unless a still frame is the feed.
pub fn start_camera_stream(
    mut commands: Commands,
    feed: Res<LiveFeed>,
    stream: Option<Res<CameraStream>>,
) {
    if feed.source == FeedSource::Still || stream.is_some() {
        return;
    }
    info!("Opening camera {CAMERA_INDEX} at {CAMERA_WIDTH}x{CAMERA_HEIGHT}");
    commands.insert_resource(CameraStream::spawn(
        CAMERA_INDEX,
        CAMERA_WIDTH,
        CAMERA_HEIGHT,
        CAMERA_FPS,
    ));
}

/// Release the device on leaving capture. The held frame is dropped so a
/// stale image is never sampled after re-entry.
pub fn stop_camera_stream(mut commands: Commands, mut feed: ResMut<LiveFeed>) {
    commands.remove_resource::<CameraStream>();
    if feed.source == FeedSource::Camera {
        feed.clear_frame();
    }
}

/// A still frame replaces the webcam, so close the device once one is installed.
pub fn release_camera_for_still_frame(
    mut commands: Commands,
    feed: Res<LiveFeed>,
    stream: Option<Res<CameraStream>>,
) {
    if stream.is_some() && feed.source == FeedSource::Still {
        info!("Still frame in use, closing camera");
        commands.remove_resource::<CameraStream>();
    }
}

pub fn pump_camera_frames(
    stream: Option<Res<CameraStream>>,
    mut feed: ResMut<LiveFeed>,
    mut commands: Commands,
) {
    let Some(stream) = stream else {
        return;
    };

    if let Some(error) = stream.take_error() {
        warn!("{error}, camera feed disabled");
        commands.remove_resource::<CameraStream>();
        return;
    }

    if let Some(frame) = stream.take_frame() {
        feed.set_frame(frame, FeedSource::Camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn idle_stream() -> CameraStream {
        CameraStream {
            slot: Arc::new(Mutex::new(FrameSlot::default())),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    #[test]
    fn still_frame_closes_the_camera() {
        let mut world = World::new();
        let stream = idle_stream();
        let running = stream.running.clone();
        world.insert_resource(stream);
        let mut feed = LiveFeed::default();
        feed.set_frame(RgbImage::new(2, 2), FeedSource::Still);
        world.insert_resource(feed);

        world.run_system_once(release_camera_for_still_frame).unwrap();

        assert!(world.get_resource::<CameraStream>().is_none());
        assert!(!running.load(Ordering::Relaxed));
    }

    #[test]
    fn camera_feed_keeps_its_stream() {
        let mut world = World::new();
        world.insert_resource(idle_stream());
        let mut feed = LiveFeed::default();
        feed.set_frame(RgbImage::new(2, 2), FeedSource::Camera);
        world.insert_resource(feed);

        world.run_system_once(release_camera_for_still_frame).unwrap();

        assert!(world.get_resource::<CameraStream>().is_some());
    }
}
