//! Room scene colouring.
//!
//! Mesh nodes below the loaded room are partitioned once per load into
//! paintable walls and excluded surfaces. Each wall receives its own paint
//! material; later colour changes only touch those materials.
//!
//! ```text
//! SceneInstanceReady
//!   └─> classify_room_surfaces()   (once, when bounds exist)
//!       └─> PaintableSurfaces
//!           └─> apply_paint_colour()   (on ActivePaint change)
//! ```

/// Ambient and directional light setup.
pub mod lighting;

/// Per-wall paint materials and colour application.
pub mod paint_material;

/// Hierarchy queries over the spawned room: mesh nodes, labels and bounds.
pub mod room_graph;

/// Pluggable paintable/excluded classification and the load-time system that caches it.
pub mod surface_classifier;

#[cfg(test)]
pub(crate) mod test_room;
