//! Scripted in-memory engine for tests
//!
//! Records every call in an operation log so tests can assert ordering,
//! and lets tests control fence signaling and decode failures.

use std::collections::{HashMap, HashSet};

use glam::{Mat4, Vec3};

use super::{
    Aabb, CompilePriority, Entity, EquirectImage, FenceHandle, FenceStatus, IndirectLightHandle,
    MaterialHandle, ModelHandle, RenderEngine, ResourceResolver, SkyboxHandle, TextureHandle,
};
use crate::core::Error;
use crate::scene::settings::ViewSettings;

#[derive(Default)]
pub struct FakeEngine {
    next_id: u64,
    /// Chronological log of engine calls, e.g. `"destroy_model(3)"`
    pub ops: Vec<String>,
    /// Fences the test has signaled
    pub signaled: HashSet<FenceHandle>,
    /// Poll count per fence
    pub fence_polls: HashMap<FenceHandle, u32>,
    /// Renderable entities and their per-primitive materials
    pub renderables: Vec<(Entity, Vec<MaterialHandle>)>,
    /// Materials submitted for precompilation
    pub compiled: Vec<(MaterialHandle, CompilePriority, u32)>,
    /// URIs the next gltf load should pull through the resolver
    pub gltf_uris: Vec<String>,
    /// URIs the resolver failed to produce during gltf loads
    pub unresolved: Vec<String>,
    /// Force model loads to fail
    pub fail_model_decode: bool,
    /// Bounds reported for every loaded model
    pub bounds: Option<Aabb>,
    /// Animation count reported for every loaded model
    pub animations: usize,
    pub root_transforms: Vec<(ModelHandle, Mat4)>,
    pub view_settings_applied: u32,
    pub camera: Option<(f32, f32, f32)>,
    pub frames_rendered: u32,
    pub animations_applied: Vec<(ModelHandle, usize, f32)>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            bounds: Some(Aabb {
                min: Vec3::splat(-1.0),
                max: Vec3::splat(1.0),
            }),
            ..Self::default()
        }
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Mark a fence as satisfied; subsequent polls return `Signaled`
    pub fn signal_fence(&mut self, fence: FenceHandle) {
        let _ = self.signaled.insert(fence);
    }

    pub fn op_names(&self) -> Vec<&str> {
        self.ops
            .iter()
            .map(|op| op.split('(').next().unwrap_or(op))
            .collect()
    }
}

impl RenderEngine for FakeEngine {
    fn load_model_glb(&mut self, bytes: &[u8]) -> Result<ModelHandle, Error> {
        if self.fail_model_decode {
            return Err(Error::Decode("glb decode failed".into()));
        }
        let handle = ModelHandle(self.next());
        self.ops
            .push(format!("load_model_glb({}, {} bytes)", handle.0, bytes.len()));
        Ok(handle)
    }

    fn load_model_gltf(
        &mut self,
        bytes: &[u8],
        resolver: &mut ResourceResolver<'_>,
    ) -> Result<ModelHandle, Error> {
        if self.fail_model_decode {
            return Err(Error::Decode("gltf decode failed".into()));
        }
        let uris = self.gltf_uris.clone();
        for uri in &uris {
            if resolver(uri).is_none() {
                self.unresolved.push(uri.clone());
            }
        }
        let handle = ModelHandle(self.next());
        self.ops
            .push(format!("load_model_gltf({}, {} bytes)", handle.0, bytes.len()));
        Ok(handle)
    }

    fn destroy_model(&mut self, model: ModelHandle) {
        self.ops.push(format!("destroy_model({})", model.0));
    }

    fn create_fence(&mut self) -> FenceHandle {
        let fence = FenceHandle(self.next());
        self.ops.push(format!("create_fence({})", fence.0));
        fence
    }

    fn poll_fence(&mut self, fence: FenceHandle) -> FenceStatus {
        *self.fence_polls.entry(fence).or_insert(0) += 1;
        if self.signaled.contains(&fence) {
            FenceStatus::Signaled
        } else {
            FenceStatus::Unsignaled
        }
    }

    fn destroy_fence(&mut self, fence: FenceHandle) {
        self.ops.push(format!("destroy_fence({})", fence.0));
    }

    fn create_equirect_texture(&mut self, image: &EquirectImage) -> TextureHandle {
        let texture = TextureHandle(self.next());
        self.ops.push(format!(
            "create_equirect_texture({}, {}x{})",
            texture.0, image.width, image.height
        ));
        texture
    }

    fn equirect_to_cubemap(&mut self, equirect: TextureHandle) -> TextureHandle {
        let texture = TextureHandle(self.next());
        self.ops
            .push(format!("equirect_to_cubemap({} -> {})", equirect.0, texture.0));
        texture
    }

    fn prefilter_specular(&mut self, cubemap: TextureHandle) -> TextureHandle {
        let texture = TextureHandle(self.next());
        self.ops
            .push(format!("prefilter_specular({} -> {})", cubemap.0, texture.0));
        texture
    }

    fn create_indirect_light(
        &mut self,
        reflections: TextureHandle,
        intensity: f32,
    ) -> IndirectLightHandle {
        let light = IndirectLightHandle(self.next());
        self.ops.push(format!(
            "create_indirect_light({}, refl {}, {})",
            light.0, reflections.0, intensity
        ));
        light
    }

    fn create_skybox(&mut self, cubemap: TextureHandle) -> SkyboxHandle {
        let skybox = SkyboxHandle(self.next());
        self.ops
            .push(format!("create_skybox({}, cube {})", skybox.0, cubemap.0));
        skybox
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.ops.push(format!("destroy_texture({})", texture.0));
    }

    fn destroy_indirect_light(&mut self, light: IndirectLightHandle) {
        self.ops.push(format!("destroy_indirect_light({})", light.0));
    }

    fn destroy_skybox(&mut self, skybox: SkyboxHandle) {
        self.ops.push(format!("destroy_skybox({})", skybox.0));
    }

    fn renderable_entities(&self) -> Vec<Entity> {
        self.renderables.iter().map(|(e, _)| *e).collect()
    }

    fn entity_materials(&self, entity: Entity) -> Vec<MaterialHandle> {
        self.renderables
            .iter()
            .find(|(e, _)| *e == entity)
            .map(|(_, m)| m.clone())
            .unwrap_or_default()
    }

    fn compile_material(
        &mut self,
        material: MaterialHandle,
        priority: CompilePriority,
        variants: u32,
    ) {
        self.compiled.push((material, priority, variants));
    }

    fn model_bounds(&self, _model: ModelHandle) -> Option<Aabb> {
        self.bounds
    }

    fn set_root_transform(&mut self, model: ModelHandle, transform: Mat4) {
        self.ops.push(format!("set_root_transform({})", model.0));
        self.root_transforms.push((model, transform));
    }

    fn model_light_entities(&self, _model: ModelHandle) -> Vec<Entity> {
        Vec::new()
    }

    fn animation_count(&self, _model: ModelHandle) -> usize {
        self.animations
    }

    fn apply_animation(&mut self, model: ModelHandle, index: usize, elapsed_secs: f32) {
        self.animations_applied.push((model, index, elapsed_secs));
    }

    fn update_bone_matrices(&mut self, model: ModelHandle) {
        self.ops.push(format!("update_bone_matrices({})", model.0));
    }

    fn render_frame(&mut self, _frame_time_nanos: u64) {
        self.frames_rendered += 1;
        self.ops.push("render_frame".into());
    }

    fn apply_view_settings(&mut self, _settings: &ViewSettings) {
        self.view_settings_applied += 1;
        self.ops.push("apply_view_settings".into());
    }

    fn set_camera(&mut self, focal_length_mm: f32, near: f32, far: f32) {
        self.camera = Some((focal_length_mm, near, far));
        self.ops.push("set_camera".into());
    }
}
