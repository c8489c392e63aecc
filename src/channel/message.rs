//! Incoming messages and label classification

/// A fully received message from the remote channel.
///
/// Single-owner: the channel relinquishes its reference when the scheduler
/// takes the message, and the payload is moved (or spilled to disk and
/// dropped) by whichever load path consumes it. Large transfers are
/// reclaimed as soon as the spill completes.
#[derive(Debug)]
pub struct IncomingMessage {
    /// Filename-like label sent by the remote client
    pub label: String,
    /// Owned payload bytes
    pub payload: Vec<u8>,
}

impl IncomingMessage {
    pub fn new(label: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            payload,
        }
    }
}

/// Load path chosen for a binary (non-JSON) message.
///
/// Classification is a pure function of the label suffix; the same payload
/// relabeled with a different suffix routes to a different path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// `.zip` — a bundle holding a model plus its resources
    Archive,
    /// `.hdr` — an equirectangular environment map
    Environment,
    /// Anything else — a glb/gltf model payload
    Model,
}

/// Classify a binary message label by suffix
pub fn classify(label: &str) -> MessageKind {
    if label.ends_with(".zip") {
        MessageKind::Archive
    } else if label.ends_with(".hdr") {
        MessageKind::Environment
    } else {
        MessageKind::Model
    }
}
