//! Fence-gated shader-variant precompilation
//!
//! Geometry upload completion is detected by polling a GPU fence once per
//! frame. Only then are the scene's materials warmed up, in two priority
//! passes, so the expensive variant compilation never lands on the frame
//! that introduced the geometry.

use std::collections::HashSet;
use std::time::Instant;

use crate::core::{EventSender, ViewerEvent};
use crate::engine::{CompilePriority, FenceHandle, FenceStatus, RenderEngine, variant};

/// Common lighting and shadow variants, wanted as soon as possible
pub const HIGH_PRIORITY_VARIANTS: u32 =
    variant::DIRECTIONAL_LIGHTING | variant::DYNAMIC_LIGHTING | variant::SHADOW_RECEIVER;

/// Effects variants that can trickle in later
pub const LOW_PRIORITY_VARIANTS: u32 = variant::FOG
    | variant::SKINNING
    | variant::SCREEN_SPACE_REFLECTIONS
    | variant::VARIANCE_SHADOWS;

/// Compiler state, advanced by the per-frame poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileState {
    /// No load in flight
    Idle,
    /// A load issued a fence that has not signaled yet
    AwaitingFence,
    /// Fence satisfied this frame; precompilation being submitted
    Compiling,
}

/// The one outstanding fence between upload and completion detection
#[derive(Debug)]
struct LoadFence {
    handle: FenceHandle,
    issued_at: Instant,
}

/// Detects geometry-upload completion and triggers variant precompilation
pub struct FenceGatedCompiler {
    state: CompileState,
    fence: Option<LoadFence>,
}

impl FenceGatedCompiler {
    pub fn new() -> Self {
        Self {
            state: CompileState::Idle,
            fence: None,
        }
    }

    pub fn state(&self) -> CompileState {
        self.state
    }

    /// Issue a fence for a load that just uploaded geometry.
    ///
    /// At most one fence is outstanding: a newer load supersedes the
    /// previous one, whose handle is destroyed unconsumed.
    pub fn begin_load(&mut self, engine: &mut dyn RenderEngine) {
        if let Some(previous) = self.fence.take() {
            engine.destroy_fence(previous.handle);
        }
        self.fence = Some(LoadFence {
            handle: engine.create_fence(),
            issued_at: Instant::now(),
        });
        self.state = CompileState::AwaitingFence;
    }

    /// Non-blocking per-frame poll.
    ///
    /// A satisfied fence is released before compilation starts, so it can
    /// never be polled twice.
    pub fn poll(&mut self, engine: &mut dyn RenderEngine, events: &EventSender) {
        let Some(fence) = self.fence.as_ref() else {
            return;
        };
        if engine.poll_fence(fence.handle) == FenceStatus::Unsignaled {
            return;
        }

        if let Some(fence) = self.fence.take() {
            let load_millis = fence.issued_at.elapsed().as_millis() as u64;
            log::info!("Engine took {} ms to load the model geometry", load_millis);
            events.send(ViewerEvent::GeometryReady { load_millis });
            engine.destroy_fence(fence.handle);

            self.state = CompileState::Compiling;
            self.compile_scene_materials(engine);
            self.state = CompileState::Idle;
        }
    }

    /// Collect the distinct materials in use and submit both passes
    fn compile_scene_materials(&self, engine: &mut dyn RenderEngine) {
        let mut materials = HashSet::new();
        for entity in engine.renderable_entities() {
            for material in engine.entity_materials(entity) {
                let _ = materials.insert(material);
            }
        }
        log::info!("Precompiling variants for {} materials", materials.len());
        for material in materials {
            engine.compile_material(material, CompilePriority::High, HIGH_PRIORITY_VARIANTS);
            engine.compile_material(material, CompilePriority::Low, LOW_PRIORITY_VARIANTS);
        }
    }
}

impl Default for FenceGatedCompiler {
    fn default() -> Self {
        Self::new()
    }
}
