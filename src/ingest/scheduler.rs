//! Per-frame ingestion driver
//!
//! One `tick` per display refresh, driven by whatever fixed-rate callback
//! the embedding layer has (vsync choreographer, winit redraw, a timer).
//! The tick is an explicit ordered step sequence: fence poll, background
//! handoff, animation, render, progress peek, message dispatch. Everything
//! that touches engine objects happens inside the tick, which makes the
//! calling thread the render-owning execution context.

use std::path::PathBuf;

use tokio::sync::mpsc;

use crate::channel::RemoteChannel;
use crate::core::{Error, EventSender, FrameClock, ViewerEvent};
use crate::engine::RenderEngine;
use crate::ingest::compiler::FenceGatedCompiler;
use crate::ingest::loader::{AssetLoader, LoadOutcome};
use crate::ingest::tracker::DownloadTracker;
use crate::scene::{ViewerContent, ViewerSettings};

/// Drives ingestion once per display refresh
pub struct FrameScheduler {
    clock: FrameClock,
    tracker: DownloadTracker,
    compiler: FenceGatedCompiler,
    loader: AssetLoader,
    events: EventSender,
    outcomes: mpsc::UnboundedReceiver<LoadOutcome>,
    content: ViewerContent,
    settings: ViewerSettings,
}

impl FrameScheduler {
    /// Create a scheduler whose loader runs decode tasks on a dedicated
    /// runtime
    pub fn new(events: EventSender, cache_dir: PathBuf) -> Result<Self, Error> {
        let (loader, outcomes) = AssetLoader::new(events.clone(), cache_dir)?;
        Ok(Self::with_loader(events, loader, outcomes))
    }

    /// Create a scheduler whose loader spawns onto the current tokio
    /// runtime
    pub fn new_with_current_runtime(events: EventSender, cache_dir: PathBuf) -> Self {
        let (loader, outcomes) = AssetLoader::new_with_current_runtime(events.clone(), cache_dir);
        Self::with_loader(events, loader, outcomes)
    }

    fn with_loader(
        events: EventSender,
        loader: AssetLoader,
        outcomes: mpsc::UnboundedReceiver<LoadOutcome>,
    ) -> Self {
        Self {
            clock: FrameClock::new(),
            tracker: DownloadTracker::new(),
            compiler: FenceGatedCompiler::new(),
            loader,
            events,
            outcomes,
            content: ViewerContent::new(),
            settings: ViewerSettings::default(),
        }
    }

    /// Run one frame. The caller re-arms itself for the next refresh before
    /// invoking this, so a slow step can never silence the callback chain.
    pub fn tick(&mut self, engine: &mut dyn RenderEngine, channel: &mut dyn RemoteChannel) {
        self.clock.tick();

        // 1. Completion detection for the outstanding geometry fence
        self.compiler.poll(engine, &self.events);

        // 2. Handoff point: background decode results rejoin the render
        //    context here
        while let Ok(outcome) = self.outcomes.try_recv() {
            self.loader.apply(
                outcome,
                engine,
                &mut self.content,
                &self.settings,
                &mut self.compiler,
            );
        }

        // 3. Advance animation by wall time since scheduler start
        if let Some(model) = self.content.model {
            if engine.animation_count(model) > 0 {
                engine.apply_animation(model, 0, self.clock.elapsed_secs());
            }
            engine.update_bone_matrices(model);
        }

        // 4. Submit the frame
        engine.render_frame(self.clock.elapsed_nanos());

        // 5. Surface a newly started download, once per label
        if let Some(label) = channel.peek_in_progress_label() {
            if channel.is_binary(&label) && self.tracker.observe(&label) {
                log::info!("Downloading {}", label);
                self.events.send(ViewerEvent::DownloadStarted(label));
            }
        }

        // 6. Take at most one completed message
        if let Some(message) = channel.take_completed_message() {
            self.tracker.complete(&message.label);
            if channel.is_json(&message.label) {
                // Settings are cheap and I/O-free: applied inline
                self.loader
                    .apply_settings(message, engine, &mut self.content, &mut self.settings);
            } else {
                self.loader.dispatch(message, engine, &mut self.content);
            }
        }
    }

    pub fn content(&self) -> &ViewerContent {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut ViewerContent {
        &mut self.content
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn tracker(&self) -> &DownloadTracker {
        &self.tracker
    }

    pub fn loader_mut(&mut self) -> &mut AssetLoader {
        &mut self.loader
    }
}
