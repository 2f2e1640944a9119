//! Colour values exchanged between the sampler and the scene colouriser.
//!
//! Sampled colours are display-space (sRGB) bytes; materials receive linear
//! light values converted through `bevy_color`.

/// Immutable sampled colour with its canonical `#rrggbb` form.
pub mod paint_colour;

pub use paint_colour::PaintColour;
