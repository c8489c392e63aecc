//! Streaming zip extraction with bounded-memory recovery
//!
//! Runs off the render thread. Entries are materialized one by one so a
//! single oversized entry aborts only the current load, with everything
//! extracted so far preserved for the diagnostic path.

use std::collections::HashMap;
use std::io::{Read, Seek};
use std::path::Path;

use crate::core::Error;

/// Name prefixes for junk that commonly pollutes zip files
const JUNK_PREFIXES: &[&str] = &["__MACOSX", ".DS_Store"];

/// Extraction knobs
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Upper bound on total bytes materialized across all entries. An entry
    /// that would exceed the remaining budget is treated the same as a
    /// failed allocation. `None` bounds only by what the allocator grants.
    pub memory_budget: Option<usize>,
}

/// Outcome of one zip extraction.
///
/// `entry_path` and `out_of_memory_entry` are independent: a model entry may
/// have been found before a later entry exhausted memory, so callers must
/// check both before using `buffers`.
#[derive(Debug, Default)]
pub struct ExtractionResult {
    /// First entry in archive order ending in a recognized model suffix
    pub entry_path: Option<String>,
    /// Decoded bytes per entry path, for everything materialized so far
    pub buffers: HashMap<String, Vec<u8>>,
    /// Path of the entry whose materialization exhausted memory, if any
    pub out_of_memory_entry: Option<String>,
}

/// Extract a zip archive from any seekable byte stream
pub fn extract<R: Read + Seek>(reader: R, options: &ExtractOptions) -> Result<ExtractionResult, Error> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut result = ExtractionResult::default();
    let mut remaining = options.memory_budget;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_owned();
        if JUNK_PREFIXES.iter().any(|junk| name.starts_with(junk)) {
            continue;
        }

        let declared = entry.size();
        let buffer = match materialize(&mut entry, declared, remaining) {
            Some(buffer) => buffer,
            None => {
                // Partial results are kept: the caller still reports which
                // entry broke the load.
                result.out_of_memory_entry = Some(name);
                break;
            }
        };

        log::info!("Deflated {} bytes from {}", buffer.len(), name);

        if let Some(budget) = remaining.as_mut() {
            *budget = budget.saturating_sub(buffer.len());
        }

        // First model entry in archive order wins; later model files are
        // carried as plain resources.
        if result.entry_path.is_none() && is_model_path(&name) {
            result.entry_path = Some(name.clone());
        }

        let _ = result.buffers.insert(name, buffer);
    }

    Ok(result)
}

/// Extract a zip archive spilled to disk
pub fn extract_file(path: &Path, options: &ExtractOptions) -> Result<ExtractionResult, Error> {
    let file = std::fs::File::open(path)?;
    extract(std::io::BufReader::new(file), options)
}

/// Whether a path names a loadable model file
pub fn is_model_path(path: &str) -> bool {
    path.ends_with(".gltf") || path.ends_with(".glb")
}

/// Fully materialize one entry, or `None` on memory exhaustion
fn materialize<R: Read>(entry: &mut R, declared: u64, remaining: Option<usize>) -> Option<Vec<u8>> {
    let declared = usize::try_from(declared).ok()?;
    if let Some(budget) = remaining {
        if declared > budget {
            return None;
        }
    }

    let mut buffer = Vec::new();
    buffer.try_reserve_exact(declared).ok()?;
    entry.read_to_end(&mut buffer).ok()?;
    Some(buffer)
}

/// Resolve a resource URI referenced by the model entry at `base`.
///
/// Resource paths are relative to the model entry's directory, which may be
/// the archive root or a nested folder. `.` and `..` segments are folded.
pub fn resolve_relative(base: &str, uri: &str) -> String {
    let prefix = match base.rfind('/') {
        Some(index) => &base[..index],
        None => "",
    };

    let mut segments: Vec<&str> = prefix.split('/').filter(|s| !s.is_empty()).collect();
    for segment in uri.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                let _ = segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
