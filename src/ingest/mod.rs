//! Frame-synchronized asset ingestion

pub mod archive;
pub mod compiler;
pub mod loader;
pub mod scheduler;
pub mod tracker;

pub use archive::{ExtractOptions, ExtractionResult, extract, extract_file, resolve_relative};
pub use compiler::{CompileState, FenceGatedCompiler};
pub use loader::{AssetLoader, LoadOutcome, ModelPayload, RequestId};
pub use scheduler::FrameScheduler;
pub use tracker::DownloadTracker;
