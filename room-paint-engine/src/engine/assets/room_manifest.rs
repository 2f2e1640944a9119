use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use constants::framing::{EYE_HEIGHT, FORWARD_OFFSET, TARGET_HEIGHT};
use constants::render_settings::{
    PAINT_METALNESS, PAINT_METALNESS_RANGE, PAINT_ROUGHNESS, PAINT_ROUGHNESS_RANGE,
};
use constants::sampling::{SAMPLE_BLOCK_SIZE, VIDEO_ELEMENT_ID};
use constants::surface::{EXCLUDED_TERMS, FLOOR_EPSILON, INCLUDED_TERMS, WALL_SCALE_THRESHOLD};

use crate::engine::scene::surface_classifier::SurfaceClass;
use crate::tools::colour_sampler::sampler::SamplePolicy;

/// Room configuration as a Bevy asset. Every field is optional in the JSON,
/// missing values fall back to the shared constants.
#[derive(Asset, Debug, Clone, PartialEq, Serialize, Deserialize, TypePath, Resource)]
#[serde(default)]
pub struct RoomManifest {
    /// glTF model path relative to the asset root.
    pub model: String,
    pub framing: FramingSettings,
    pub classification: ClassificationConfig,
    pub finish: PaintFinish,
    pub sampling: SamplingConfig,
    /// Id of the host page's `<video>` element in web builds.
    pub video_element_id: String,
    /// Image used in place of a live camera on native builds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub still_frame: Option<String>,
}

impl Default for RoomManifest {
    fn default() -> Self {
        Self {
            model: "room/room.glb".to_string(),
            framing: FramingSettings::default(),
            classification: ClassificationConfig::default(),
            finish: PaintFinish::default(),
            sampling: SamplingConfig::default(),
            video_element_id: VIDEO_ELEMENT_ID.to_string(),
            still_frame: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramingSettings {
    /// Eye height above the room floor.
    pub eye_height: f32,
    /// Look-at height above the room floor.
    pub target_height: f32,
    /// Forward bias along +Z from the room centre.
    pub forward_offset: f32,
}

impl Default for FramingSettings {
    fn default() -> Self {
        Self {
            eye_height: EYE_HEIGHT,
            target_height: TARGET_HEIGHT,
            forward_offset: FORWARD_OFFSET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    pub floor_epsilon: f32,
    pub wall_scale_threshold: f32,
    /// Explicit tags keyed by node name, matched case-insensitively.
    pub overrides: HashMap<String, SurfaceClass>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            exclude: EXCLUDED_TERMS.iter().map(|t| t.to_string()).collect(),
            include: INCLUDED_TERMS.iter().map(|t| t.to_string()).collect(),
            floor_epsilon: FLOOR_EPSILON,
            wall_scale_threshold: WALL_SCALE_THRESHOLD,
            overrides: HashMap::new(),
        }
    }
}

/// Surface finish for painted walls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintFinish {
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for PaintFinish {
    fn default() -> Self {
        Self {
            roughness: PAINT_ROUGHNESS,
            metalness: PAINT_METALNESS,
        }
    }
}

impl PaintFinish {
    /// Clamp into the matte-to-satin, non-metallic range.
    pub fn clamped(&self) -> Self {
        Self {
            roughness: self
                .roughness
                .clamp(PAINT_ROUGHNESS_RANGE.0, PAINT_ROUGHNESS_RANGE.1),
            metalness: self
                .metalness
                .clamp(PAINT_METALNESS_RANGE.0, PAINT_METALNESS_RANGE.1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingKind {
    SinglePixel,
    #[default]
    BlockAverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub policy: SamplingKind,
    pub size: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            policy: SamplingKind::default(),
            size: SAMPLE_BLOCK_SIZE,
        }
    }
}

impl SamplingConfig {
    pub fn to_policy(&self) -> SamplePolicy {
        match self.policy {
            SamplingKind::SinglePixel => SamplePolicy::SinglePixel,
            SamplingKind::BlockAverage => SamplePolicy::BlockAverage { size: self.size },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_manifest_uses_defaults() {
        let manifest: RoomManifest = serde_json::from_str("{}").unwrap();
        assert_eq!(manifest, RoomManifest::default());
        assert_eq!(manifest.model, "room/room.glb");
        assert_eq!(manifest.framing.eye_height, 1.6);
        assert_eq!(manifest.framing.target_height, 1.4);
        assert_eq!(manifest.classification.exclude.len(), 11);
        assert_eq!(
            manifest.sampling.to_policy(),
            SamplePolicy::BlockAverage { size: 5 }
        );
    }

    #[test]
    fn partial_sections_keep_sibling_defaults() {
        let json = r#"{
            "model": "room/loft.glb",
            "framing": { "eye_height": 1.7 },
            "sampling": { "policy": "single_pixel" },
            "still_frame": "room/wall.jpg"
        }"#;
        let manifest: RoomManifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.model, "room/loft.glb");
        assert_eq!(manifest.framing.eye_height, 1.7);
        assert_eq!(manifest.framing.target_height, 1.4);
        assert_eq!(manifest.sampling.to_policy(), SamplePolicy::SinglePixel);
        assert_eq!(manifest.still_frame.as_deref(), Some("room/wall.jpg"));
        assert_eq!(manifest.video_element_id, "camera-feed");
    }

    #[test]
    fn overrides_parse_as_surface_classes() {
        let json = r#"{ "classification": { "overrides": {
            "Skirting": "excluded",
            "Feature_Panel": "paintable"
        } } }"#;
        let manifest: RoomManifest = serde_json::from_str(json).unwrap();
        let overrides = &manifest.classification.overrides;
        assert_eq!(overrides["Skirting"], SurfaceClass::Excluded);
        assert_eq!(overrides["Feature_Panel"], SurfaceClass::Paintable);
        assert_eq!(manifest.classification.floor_epsilon, 0.05);
    }

    #[test]
    fn finish_is_clamped_to_paint_range() {
        let finish = PaintFinish {
            roughness: 0.1,
            metalness: 1.0,
        }
        .clamped();
        assert_eq!(finish.roughness, 0.45);
        assert_eq!(finish.metalness, 0.02);
        assert_eq!(PaintFinish::default().clamped(), PaintFinish::default());
    }
}
