//! Asset load dispatch
//!
//! One incoming message becomes one load: settings apply synchronously on
//! the render context, everything else runs its decode phase on a
//! background task and returns as a [`LoadOutcome`] the scheduler applies
//! at the next frame's handoff point. Engine objects are only ever touched
//! during dispatch and apply, both on the render context.

use std::collections::HashMap;
use std::future::Future;
use std::io::{BufReader, Seek, Write};
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use crate::channel::{IncomingMessage, MessageKind, classify};
use crate::core::{Error, EventSender, ViewerEvent};
use crate::engine::{EquirectImage, RenderEngine};
use crate::ingest::archive::{self, ExtractOptions, ExtractionResult};
use crate::ingest::compiler::FenceGatedCompiler;
use crate::scene::{ViewerContent, ViewerSettings, update_root_transform};

/// Indirect-light intensity applied to remotely loaded environments
const IBL_INTENSITY: f32 = 30_000.0;

/// Monotonic stamp on every dispatched load.
///
/// Overlapping loads race freely on the background pool; the stamp lets the
/// apply step drop a slow completion that a newer request has superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Model bytes prepared off-thread, ready for render-context upload
#[derive(Debug)]
pub enum ModelPayload {
    Glb(Vec<u8>),
    Gltf {
        bytes: Vec<u8>,
        /// Archive path of the model entry; resource URIs resolve against
        /// its directory
        entry_path: String,
        /// Extracted sibling resources by archive path
        resources: HashMap<String, Vec<u8>>,
    },
}

/// Completed background work, delivered back to the render context
#[derive(Debug)]
pub enum LoadOutcome {
    Model {
        request: RequestId,
        payload: ModelPayload,
    },
    Environment {
        request: RequestId,
        image: EquirectImage,
    },
    /// The load failed in a recoverable way; `status` is user-facing text
    Failed {
        request: RequestId,
        status: String,
    },
}

impl LoadOutcome {
    fn request(&self) -> RequestId {
        match self {
            Self::Model { request, .. }
            | Self::Environment { request, .. }
            | Self::Failed { request, .. } => *request,
        }
    }
}

/// Classifies incoming messages and executes the matching load routine
pub struct AssetLoader {
    events: EventSender,
    /// Directory for per-archive spill files
    cache_dir: PathBuf,
    extract_options: ExtractOptions,
    outcome_tx: mpsc::UnboundedSender<LoadOutcome>,
    next_request: u64,
    latest_request: u64,
    /// Dedicated runtime for decode tasks (`None` when riding an existing
    /// runtime)
    runtime: Option<tokio::runtime::Runtime>,
}

impl AssetLoader {
    /// Create a loader with its own background runtime, plus the outcome
    /// receiver the scheduler drains
    pub fn new(
        events: EventSender,
        cache_dir: PathBuf,
    ) -> Result<(Self, mpsc::UnboundedReceiver<LoadOutcome>), Error> {
        let runtime = tokio::runtime::Runtime::new()?;
        let (mut loader, outcome_rx) = Self::new_with_current_runtime(events, cache_dir);
        loader.runtime = Some(runtime);
        Ok((loader, outcome_rx))
    }

    /// Create a loader that spawns decode tasks on the current tokio
    /// runtime. Panics at spawn time if none is active.
    pub fn new_with_current_runtime(
        events: EventSender,
        cache_dir: PathBuf,
    ) -> (Self, mpsc::UnboundedReceiver<LoadOutcome>) {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let loader = Self {
            events,
            cache_dir,
            extract_options: ExtractOptions::default(),
            outcome_tx,
            next_request: 0,
            latest_request: 0,
            runtime: None,
        };
        (loader, outcome_rx)
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match &self.runtime {
            Some(runtime) => {
                let _ = runtime.spawn(task);
            }
            None => {
                let _ = tokio::spawn(task);
            }
        }
    }

    pub fn set_extract_options(&mut self, options: ExtractOptions) {
        self.extract_options = options;
    }

    /// Dispatch a binary (non-JSON) message. Runs on the render context;
    /// the decode phase is spawned so subsequent frames are never blocked.
    pub fn dispatch(
        &mut self,
        message: IncomingMessage,
        engine: &mut dyn RenderEngine,
        content: &mut ViewerContent,
    ) {
        log::info!(
            "Downloaded model {} ({} bytes)",
            message.label,
            message.payload.len()
        );
        self.events.send(ViewerEvent::Title(message.label.clone()));

        let request = self.begin_request();
        let tx = self.outcome_tx.clone();

        match classify(&message.label) {
            MessageKind::Archive => {
                // Bound peak memory: the old model goes away before the
                // archive is deflated.
                if let Some(model) = content.model.take() {
                    engine.destroy_model(model);
                }
                let cache_dir = self.cache_dir.clone();
                let options = self.extract_options.clone();
                self.spawn(async move {
                    let outcome = match load_archive(message.payload, cache_dir, options).await {
                        Ok(payload) => LoadOutcome::Model { request, payload },
                        Err(status) => LoadOutcome::Failed { request, status },
                    };
                    let _ = tx.send(outcome);
                });
            }
            MessageKind::Environment => {
                self.spawn(async move {
                    let decoded =
                        tokio::task::spawn_blocking(move || decode_hdr(&message.payload)).await;
                    let outcome = match decoded {
                        Ok(Ok(image)) => LoadOutcome::Environment { request, image },
                        Ok(Err(error)) => {
                            log::error!("HDR decode failed: {}", error);
                            LoadOutcome::Failed {
                                request,
                                status: "Could not decode HDR file.".to_owned(),
                            }
                        }
                        Err(join_error) => LoadOutcome::Failed {
                            request,
                            status: format!("Decode task failed: {}", join_error),
                        },
                    };
                    let _ = tx.send(outcome);
                });
            }
            MessageKind::Model => {
                self.spawn(async move {
                    let _ = tx.send(LoadOutcome::Model {
                        request,
                        payload: ModelPayload::Glb(message.payload),
                    });
                });
            }
        }
    }

    /// Apply a completed outcome on the render context.
    ///
    /// Outcomes superseded by a newer dispatch are dropped unapplied.
    pub fn apply(
        &mut self,
        outcome: LoadOutcome,
        engine: &mut dyn RenderEngine,
        content: &mut ViewerContent,
        settings: &ViewerSettings,
        compiler: &mut FenceGatedCompiler,
    ) {
        let request = outcome.request();
        if request.0 < self.latest_request {
            log::info!(
                "Dropping stale load result (request {} superseded by {})",
                request.0,
                self.latest_request
            );
            return;
        }

        match outcome {
            LoadOutcome::Model { payload, .. } => {
                self.install_model(payload, engine, content, settings, compiler);
            }
            LoadOutcome::Environment { image, .. } => {
                self.install_environment(&image, engine, content);
            }
            LoadOutcome::Failed { status, .. } => {
                self.events.status(status);
            }
        }
    }

    /// Apply a JSON settings payload synchronously on the render context
    pub fn apply_settings(
        &mut self,
        message: IncomingMessage,
        engine: &mut dyn RenderEngine,
        content: &mut ViewerContent,
        settings: &mut ViewerSettings,
    ) {
        let parsed = std::str::from_utf8(&message.payload)
            .map_err(|e| Error::Decode(e.to_string()))
            .and_then(ViewerSettings::from_json);
        let parsed = match parsed {
            Ok(parsed) => parsed,
            Err(error) => {
                log::error!("Rejecting settings payload {}: {}", message.label, error);
                self.events.status("Could not apply settings.");
                return;
            }
        };

        *settings = parsed;
        if let Some(model) = content.model {
            content.asset_lights = engine.model_light_entities(model);
        }
        engine.apply_view_settings(&settings.view);
        engine.set_camera(
            settings.camera_focal_length,
            settings.camera_near,
            settings.camera_far,
        );
        if let Some(model) = content.model {
            update_root_transform(engine, model, settings);
        }
    }

    fn begin_request(&mut self) -> RequestId {
        self.next_request += 1;
        self.latest_request = self.next_request;
        RequestId(self.next_request)
    }

    /// Fixed install order: destroy previous, upload, transform, fence
    fn install_model(
        &mut self,
        payload: ModelPayload,
        engine: &mut dyn RenderEngine,
        content: &mut ViewerContent,
        settings: &ViewerSettings,
        compiler: &mut FenceGatedCompiler,
    ) {
        if let Some(previous) = content.model.take() {
            engine.destroy_model(previous);
        }

        let events = self.events.clone();
        let loaded = match payload {
            ModelPayload::Glb(bytes) => engine.load_model_glb(&bytes),
            ModelPayload::Gltf {
                bytes,
                entry_path,
                mut resources,
            } => {
                let mut resolver = |uri: &str| {
                    let path = archive::resolve_relative(&entry_path, uri);
                    match resources.remove(&path) {
                        Some(bytes) => Some(bytes),
                        None => {
                            log::error!(
                                "Could not find '{}' in zip using base path '{}'",
                                uri,
                                entry_path
                            );
                            events.status(format!("Zip is missing {}", path));
                            None
                        }
                    }
                };
                engine.load_model_gltf(&bytes, &mut resolver)
            }
        };

        match loaded {
            Ok(model) => {
                content.model = Some(model);
                content.asset_lights = engine.model_light_entities(model);
                update_root_transform(engine, model, settings);
                // Records the load-start timestamp and issues the fence
                compiler.begin_load(engine);
            }
            Err(error) => {
                log::error!("Model upload failed: {}", error);
                self.events.status("Could not load model.");
            }
        }
    }

    /// Build the replacement environment fully before the old one goes
    /// away, so the scene is never without a valid environment mid-swap.
    fn install_environment(
        &mut self,
        image: &EquirectImage,
        engine: &mut dyn RenderEngine,
        content: &mut ViewerContent,
    ) {
        self.events.status("Successfully decoded HDR file.");

        let equirect = engine.create_equirect_texture(image);
        let cubemap = engine.equirect_to_cubemap(equirect);
        engine.destroy_texture(equirect);
        let reflections = engine.prefilter_specular(cubemap);
        let indirect_light = engine.create_indirect_light(reflections, IBL_INTENSITY);
        let skybox = engine.create_skybox(cubemap);

        if let Some(previous) = content.indirect_light.take() {
            engine.destroy_indirect_light(previous);
        }
        if let Some(previous) = content.skybox.take() {
            engine.destroy_skybox(previous);
        }
        content.indirect_light = Some(indirect_light);
        content.skybox = Some(skybox);
    }
}

/// Spill the payload to a temp file, extract it, and shape the result.
///
/// Returns user-facing status text on every failure path.
async fn load_archive(
    payload: Vec<u8>,
    cache_dir: PathBuf,
    options: ExtractOptions,
) -> Result<ModelPayload, String> {
    let extracted = tokio::task::spawn_blocking(move || stage_and_extract(payload, &cache_dir, &options))
        .await
        .map_err(|join_error| format!("Extraction task failed: {}", join_error))?
        .map_err(|error| {
            log::error!("Archive extraction failed: {}", error);
            format!("Could not extract zip: {}", error)
        })?;

    let Some(entry_path) = extracted.entry_path else {
        return Err("Could not find .gltf or .glb in the zip.".to_owned());
    };
    if let Some(path) = extracted.out_of_memory_entry {
        return Err(format!("Out of memory while deflating {}", path));
    }

    let mut buffers = extracted.buffers;
    let Some(bytes) = buffers.remove(&entry_path) else {
        return Err("Could not find .gltf or .glb in the zip.".to_owned());
    };

    if entry_path.ends_with(".glb") {
        Ok(ModelPayload::Glb(bytes))
    } else {
        Ok(ModelPayload::Gltf {
            bytes,
            entry_path,
            resources: buffers,
        })
    }
}

/// Blocking half of the archive path: one temp file per load, written
/// before extraction and removed on drop regardless of outcome.
fn stage_and_extract(
    payload: Vec<u8>,
    cache_dir: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionResult, Error> {
    let mut spill = tempfile::Builder::new()
        .prefix("incoming")
        .suffix(".zip")
        .tempfile_in(cache_dir)?;
    spill.write_all(&payload)?;
    // Release the in-memory transfer before deflating anything
    drop(payload);
    spill.as_file_mut().rewind()?;

    archive::extract(BufReader::new(spill.as_file()), options)
}

/// Decode an equirectangular Radiance HDR payload to linear RGB
fn decode_hdr(bytes: &[u8]) -> Result<EquirectImage, Error> {
    let dynamic = image::load_from_memory_with_format(bytes, image::ImageFormat::Hdr)
        .map_err(|e| Error::Decode(e.to_string()))?;
    let rgb = dynamic.to_rgb32f();
    let (width, height) = rgb.dimensions();
    Ok(EquirectImage {
        width,
        height,
        pixels: rgb.pixels().map(|p| p.0).collect(),
    })
}
