//! Vantage - frame-synchronized remote asset ingestion for a 3D viewer
//!
//! Rendering is delegated to an external engine behind the
//! [`engine::RenderEngine`] trait; network transport sits behind
//! [`channel::RemoteChannel`]. This crate owns the part in between: the
//! per-frame scheduler that ingests remotely delivered models,
//! environments, archives, and settings while the scene keeps rendering.

pub mod channel;
pub mod core;
pub mod engine;
pub mod ingest;
pub mod scene;
