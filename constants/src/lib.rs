//! Shared tuning values for the room paint preview engine.
//!
//! Kept in a separate crate so the engine and any future tooling agree on
//! vocabulary, thresholds and finish ranges without a runtime dependency.

pub mod framing;
pub mod render_settings;
pub mod sampling;
pub mod surface;
