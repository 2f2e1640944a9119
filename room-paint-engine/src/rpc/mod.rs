//! JSON-RPC 2.0 communication layer for the host page.
//!
//! WASM builds run inside an iframe; the page owns the `<video>` element and the
//! buttons, the engine owns the room. Both sides talk over `postMessage`.
//!
//! ## Message Flow
//!
//! ```text
//! Host (Parent Window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ handle_rpc_request()
//!        │                                        ├─ apply RpcActions
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! Handlers never touch the world directly. They read an `EngineSnapshot` and
//! push `RpcAction`s, which `handle_rpc_messages` turns into events and resource
//! writes. Requests without an id are notifications: actions still run, no
//! response is sent.
//!
//! ## Methods
//!
//! - `sample_colour {x, y}`: Queue a sample at a page coordinate; the colour
//!   arrives as a `colour_sampled` notification
//! - `set_mode {mode}`: `preview`/`vr`, `capture`/`camera`/`retake` or `toggle`
//! - `set_paint_colour {hex}`: Paint the walls with an explicit `#RRGGBB`
//!   (preview still needs a colour sampled from the feed)
//! - `get_state`: Current mode, paint colour and room status
//!
//! ## Notifications
//!
//! - `colour_sampled {hex, rgb, image_x, image_y}`
//! - `mode_changed {mode}`
//! - `room_status {loaded, paintable, excluded, error}`
//!
//! ## Error Codes
//!
//! - `-32600`: Invalid request (not `jsonrpc: "2.0"`)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//!
//! Malformed JSON is logged and dropped.

/// JSON-RPC 2.0 bridge to the host page.
///
/// Message listener, request dispatch and outgoing notification queue.
pub mod web_rpc;
