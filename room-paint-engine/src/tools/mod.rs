//! User-facing tools: colour capture and the capture/preview switch.
//!
//! ## Capture flow
//!
//! ```text
//! Capture mode
//!   tap on feed ──> SampleRequest ──> ActivePaint ──> walls repainted
//!   Preview button / Space / RPC set_mode
//!     └─> ModeRequestEvent
//!         └─> handle_mode_requests() ──> Preview mode (room camera on)
//! ```
//!
//! Native builds draw their own overlay and accept keyboard shortcuts. WASM
//! builds leave the overlay to the host page and take everything over RPC.

/// Live feed, sampling policies and the capture overlay.
pub mod colour_sampler;

/// Mode requests from keyboard, UI button and RPC.
pub mod mode_toggle;
