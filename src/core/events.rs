//! User-facing viewer events
//!
//! The core never calls into presentation code. Everything a UI would show
//! (status toasts, the window title, download notices) is emitted on an
//! event channel the embedding layer subscribes to.

use tokio::sync::mpsc;

/// Events emitted by the ingestion core for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// Transient status text (decode failures, download notices, ...)
    Status(String),
    /// The label of the model most recently handed to the engine
    Title(String),
    /// A new remote transfer started for the given label
    DownloadStarted(String),
    /// Geometry upload finished; milliseconds from load start to fence signal
    GeometryReady { load_millis: u64 },
}

/// Cloneable sending half of the viewer event channel.
///
/// Sends never block and never fail visibly: a disconnected receiver just
/// means no UI is listening.
#[derive(Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<ViewerEvent>,
}

impl EventSender {
    /// Create an event channel, returning the sender and the UI-side receiver
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ViewerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Emit an event (dropped if no receiver is attached)
    pub fn send(&self, event: ViewerEvent) {
        let _ = self.tx.send(event);
    }

    /// Emit a status text event
    pub fn status(&self, text: impl Into<String>) {
        self.send(ViewerEvent::Status(text.into()));
    }
}
