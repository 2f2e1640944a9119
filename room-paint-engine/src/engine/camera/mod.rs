//! Room camera placement and navigation.
//!
//! The camera is framed once per room load at eye level inside the room,
//! after which the orbit controller owns it.

/// One-shot eye-level framing from the room bounds.
pub mod framing;

/// Orbit, zoom and pan controller for the preview.
pub mod viewport_camera;
