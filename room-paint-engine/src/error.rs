//! Error types for the room paint engine.
//!
//! None of these are fatal: feed errors mark the live feed as not ready and
//! parse errors are reported back to whoever supplied the text.

use thiserror::Error;

/// Failures from the collaborators that supply video frames.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Opening or starting the camera failed.
    #[error("Camera init error: {0}")]
    CameraInit(String),

    /// Grabbing or decoding a frame failed.
    #[error("Camera frame error: {0}")]
    CameraFrame(String),

    /// The configured still frame could not be read.
    #[error("Still frame error: {path}")]
    StillFrame {
        path: String,
        #[source]
        source: image::ImageError,
    },

    /// The host page has no `<video>` element with the configured id.
    #[error("Video element `{0}` not found")]
    ElementMissing(String),

    /// A browser API call rejected.
    #[error("Browser call failed: {0}")]
    Browser(String),
}

/// Rejections when parsing `#RRGGBB` strings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColourParseError {
    #[error("expected 6 hex digits, got `{0}`")]
    Length(String),

    #[error("invalid hex digit in `{0}`")]
    Digit(String),
}
