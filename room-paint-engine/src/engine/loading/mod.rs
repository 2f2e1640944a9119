//! Room loading: manifest, model scene and readiness flags.
//!
//! Scene-dependent systems check `LoadingProgress` and do nothing until the
//! room's scene instance has been spawned.

/// Room manifest loading with fallback to defaults.
pub mod manifest_loader;

/// Loading progress flags shared by classification, framing and the UI.
pub mod progress;

/// Room scene spawning, the scene-ready hook and load failure reporting.
pub mod room_loader;
