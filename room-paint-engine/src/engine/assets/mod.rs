//! Room configuration and spatial bounds.

/// World-space bounds of the loaded room model.
pub mod bounds;

/// JSON room manifest: model path, framing, classification, finish and sampling settings.
pub mod room_manifest;
