//! Core application setup and mode management.
//!
//! Builds the app for native and WASM targets, owns the capture/preview state
//! machine and the camera switch that goes with it.

/// App construction: plugins, resources and system ordering.
pub mod app_setup;

/// Capture/preview modes, the capture guard and camera switching on transitions.
pub mod app_state;

/// Platform-specific window configuration for native and WASM builds.
///
/// Binds to the host page canvas on the web and enables vsync everywhere.
pub mod window_config;
