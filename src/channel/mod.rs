//! Remote channel collaborator interface
//!
//! The transport that accepts connections and frames messages is out of
//! scope; the core only polls a small surface once per frame.

pub mod message;

pub use message::{IncomingMessage, MessageKind, classify};

/// The remote message source the frame scheduler polls.
///
/// The channel owns partially received transfers; the core sees a transfer
/// only as an in-progress label until it completes.
pub trait RemoteChannel {
    /// Label of a transfer currently being received, if any
    fn peek_in_progress_label(&self) -> Option<String>;

    /// Take one fully received message, transferring payload ownership to
    /// the caller. The channel drops its own reference so large buffers can
    /// be reclaimed.
    fn take_completed_message(&mut self) -> Option<IncomingMessage>;

    /// Whether a label names a JSON (settings) transfer
    fn is_json(&self, label: &str) -> bool {
        label.ends_with(".json")
    }

    /// Whether a label names a binary (model/environment/archive) transfer
    fn is_binary(&self, label: &str) -> bool {
        !self.is_json(label)
    }

    /// Shut the channel down
    fn close(&mut self);
}

#[cfg(test)]
pub mod fake {
    //! Scripted channel for scheduler tests

    use std::collections::VecDeque;

    use super::{IncomingMessage, RemoteChannel};

    #[derive(Default)]
    pub struct FakeChannel {
        pub in_progress: Option<String>,
        pub completed: VecDeque<IncomingMessage>,
        pub closed: bool,
    }

    impl FakeChannel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_completed(&mut self, message: IncomingMessage) {
            self.completed.push_back(message);
        }
    }

    impl RemoteChannel for FakeChannel {
        fn peek_in_progress_label(&self) -> Option<String> {
            self.in_progress.clone()
        }

        fn take_completed_message(&mut self) -> Option<IncomingMessage> {
            self.completed.pop_front()
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeChannel;
    use super::*;

    #[test]
    fn test_default_label_predicates() {
        let channel = FakeChannel::new();
        assert!(channel.is_json("settings.json"));
        assert!(!channel.is_binary("settings.json"));
        assert!(channel.is_binary("model.glb"));
        assert!(channel.is_binary("bundle.zip"));
    }

    #[test]
    fn test_close_is_sticky() {
        let mut channel = FakeChannel::new();
        channel.close();
        assert!(channel.closed);
    }

    #[test]
    fn test_take_transfers_ownership() {
        let mut channel = FakeChannel::new();
        channel.push_completed(IncomingMessage::new("a.glb", vec![0u8; 16]));

        let taken = channel.take_completed_message().unwrap();
        assert_eq!(taken.label, "a.glb");
        // Channel reference is gone
        assert!(channel.take_completed_message().is_none());
    }
}
