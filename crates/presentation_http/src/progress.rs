//! Batch progress fan-out
//!
//! Every batch reports into one broadcast channel; each connected progress
//! stream holds its own receiver. With nobody listening, updates are
//! dropped.

use application::ProgressSink;
use tokio::sync::broadcast;

/// Buffered updates per subscriber before it starts lagging
const CHANNEL_CAPACITY: usize = 64;

/// Broadcasts progress percentages to all subscribers
#[derive(Debug, Clone)]
pub struct ProgressBroadcaster {
    sender: broadcast::Sender<u8>,
}

impl Default for ProgressBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBroadcaster {
    /// Create a broadcaster with no subscribers
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Register a new subscriber
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<u8> {
        self.sender.subscribe()
    }

    /// Number of connected subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ProgressSink for ProgressBroadcaster {
    fn report(&self, percent: u8) {
        // Err only means nobody is listening
        let _ = self.sender.send(percent);
    }
}
