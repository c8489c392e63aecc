//! Structured viewer settings received as JSON from the remote client

use serde::{Deserialize, Serialize};

use crate::core::Error;

/// Quality level for configurable render features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QualityLevel {
    Low,
    Medium,
    High,
}

/// View-layer configuration handed to the engine verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewSettings {
    pub hdr_color_buffer: QualityLevel,
    pub dynamic_resolution: bool,
    pub msaa: bool,
    pub fxaa: bool,
    pub ambient_occlusion: bool,
    pub bloom: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            hdr_color_buffer: QualityLevel::Medium,
            dynamic_resolution: true,
            msaa: true,
            fxaa: true,
            ambient_occlusion: true,
            bloom: true,
        }
    }
}

/// Full viewer settings: view configuration plus the derived camera
/// parameters and the auto-scale policy the loader consults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerSettings {
    pub auto_scale_enabled: bool,
    pub camera_focal_length: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub view: ViewSettings,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            auto_scale_enabled: true,
            camera_focal_length: 28.0,
            camera_near: 0.05,
            camera_far: 1000.0,
            view: ViewSettings::default(),
        }
    }
}

impl ViewerSettings {
    /// Parse a settings payload. Unknown fields are ignored and missing
    /// fields keep their defaults, so older clients stay compatible.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }
}
