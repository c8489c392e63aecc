//! The live-scene handle bundle

use crate::engine::{Entity, IndirectLightHandle, ModelHandle, SkyboxHandle};

/// Handles to the engine objects currently installed in the scene.
///
/// A convenience bundle, not an owner: the engine owns the objects, and
/// every field is refreshed whenever the underlying object is replaced.
#[derive(Debug, Default)]
pub struct ViewerContent {
    /// The currently displayed model, if any
    pub model: Option<ModelHandle>,
    /// Indirect light derived from the current environment
    pub indirect_light: Option<IndirectLightHandle>,
    /// Skybox derived from the current environment
    pub skybox: Option<SkyboxHandle>,
    /// Light entities embedded in the current model asset
    pub asset_lights: Vec<Entity>,
}

impl ViewerContent {
    pub fn new() -> Self {
        Self::default()
    }
}
