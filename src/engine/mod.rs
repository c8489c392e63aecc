//! Rendering-engine collaborator interface
//!
//! The viewer delegates all GPU work to an external engine. This module
//! defines the trait the core drives and the opaque handle types it holds.
//! Geometry upload, shader compilation, and frame composition live behind
//! the trait; the core decides only *when* each call happens and on which
//! execution context.

pub mod handle;

#[cfg(test)]
pub mod fake;

use glam::{Mat4, Vec3};

use crate::core::Error;
use crate::scene::settings::ViewSettings;

pub use handle::{
    Entity, FenceHandle, IndirectLightHandle, MaterialHandle, ModelHandle, SkyboxHandle,
    TextureHandle,
};

/// Result of a non-blocking fence poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceStatus {
    /// GPU work submitted before the fence has not finished yet
    Unsignaled,
    /// All work submitted before the fence has completed
    Signaled,
}

/// Priority queue for shader-variant precompilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompilePriority {
    High,
    Low,
}

/// Shader variant filter bits for material precompilation
pub mod variant {
    pub const DIRECTIONAL_LIGHTING: u32 = 1 << 0;
    pub const DYNAMIC_LIGHTING: u32 = 1 << 1;
    pub const SHADOW_RECEIVER: u32 = 1 << 2;
    pub const FOG: u32 = 1 << 3;
    pub const SKINNING: u32 = 1 << 4;
    pub const SCREEN_SPACE_REFLECTIONS: u32 = 1 << 5;
    pub const VARIANCE_SHADOWS: u32 = 1 << 6;
}

/// Axis-aligned bounding box of a model's geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// A decoded equirectangular HDR image, ready for cubemap conversion
#[derive(Debug, Clone)]
pub struct EquirectImage {
    pub width: u32,
    pub height: u32,
    /// Linear RGB, row-major, `width * height` texels
    pub pixels: Vec<[f32; 3]>,
}

/// Resolver for resources referenced by a text-form gltf model.
///
/// Called once per referenced URI; returning `None` lets the engine proceed
/// with that resource missing.
pub type ResourceResolver<'a> = dyn FnMut(&str) -> Option<Vec<u8>> + 'a;

/// The rendering engine the viewer core drives.
///
/// Every method that creates or destroys an engine object must be called
/// from the render-owning execution context. The core upholds that; the
/// engine may assume it.
pub trait RenderEngine {
    /// Upload a binary glb model, replacing nothing; the caller destroys
    /// the previous model first.
    fn load_model_glb(&mut self, bytes: &[u8]) -> Result<ModelHandle, Error>;

    /// Upload a text-form gltf model, pulling referenced resources through
    /// `resolver`.
    fn load_model_gltf(
        &mut self,
        bytes: &[u8],
        resolver: &mut ResourceResolver<'_>,
    ) -> Result<ModelHandle, Error>;

    fn destroy_model(&mut self, model: ModelHandle);

    /// Create a fence that signals once previously submitted upload work
    /// has completed on the GPU.
    fn create_fence(&mut self) -> FenceHandle;

    /// Non-blocking fence poll
    fn poll_fence(&mut self, fence: FenceHandle) -> FenceStatus;

    fn destroy_fence(&mut self, fence: FenceHandle);

    /// Upload a decoded equirectangular image as a texture
    fn create_equirect_texture(&mut self, image: &EquirectImage) -> TextureHandle;

    /// Convert an equirectangular texture to a cubemap texture
    fn equirect_to_cubemap(&mut self, equirect: TextureHandle) -> TextureHandle;

    /// Run specular prefiltering over a cubemap, producing reflections
    fn prefilter_specular(&mut self, cubemap: TextureHandle) -> TextureHandle;

    fn create_indirect_light(
        &mut self,
        reflections: TextureHandle,
        intensity: f32,
    ) -> IndirectLightHandle;

    fn create_skybox(&mut self, cubemap: TextureHandle) -> SkyboxHandle;

    fn destroy_texture(&mut self, texture: TextureHandle);
    fn destroy_indirect_light(&mut self, light: IndirectLightHandle);
    fn destroy_skybox(&mut self, skybox: SkyboxHandle);

    /// All entities currently carrying a renderable component
    fn renderable_entities(&self) -> Vec<Entity>;

    /// Materials bound to the entity's primitives, one per primitive
    fn entity_materials(&self, entity: Entity) -> Vec<MaterialHandle>;

    /// Queue shader-variant precompilation for a material
    fn compile_material(
        &mut self,
        material: MaterialHandle,
        priority: CompilePriority,
        variants: u32,
    );

    /// Geometry bounds of a loaded model, if known
    fn model_bounds(&self, model: ModelHandle) -> Option<Aabb>;

    fn set_root_transform(&mut self, model: ModelHandle, transform: Mat4);

    /// Light entities embedded in the model asset
    fn model_light_entities(&self, model: ModelHandle) -> Vec<Entity>;

    fn animation_count(&self, model: ModelHandle) -> usize;
    fn apply_animation(&mut self, model: ModelHandle, index: usize, elapsed_secs: f32);
    fn update_bone_matrices(&mut self, model: ModelHandle);

    /// Submit the current frame's render commands
    fn render_frame(&mut self, frame_time_nanos: u64);

    /// Apply structured view settings (quality, post-processing toggles)
    fn apply_view_settings(&mut self, settings: &ViewSettings);

    /// Update camera projection parameters
    fn set_camera(&mut self, focal_length_mm: f32, near: f32, far: f32);
}
