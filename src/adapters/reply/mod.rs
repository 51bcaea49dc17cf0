//! Reply sink adapters that do not talk to a transport.
//!
//! - **RecordingReplySink** - keeps every reply in memory (tests, dry runs)

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use crate::ports::{OutboundReply, ReplySink, TransportError};

/// Sink that records replies instead of delivering them.
///
/// Clones share the same recording.
#[derive(Debug, Clone, Default)]
pub struct RecordingReplySink {
    replies: Arc<Mutex<Vec<OutboundReply>>>,
    typing: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl RecordingReplySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following send fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// All replies so far.
    pub async fn replies(&self) -> Vec<OutboundReply> {
        self.replies.lock().await.clone()
    }

    /// Rendered text of all replies so far.
    pub async fn texts(&self) -> Vec<String> {
        self.replies
            .lock()
            .await
            .iter()
            .map(OutboundReply::render)
            .collect()
    }

    /// Number of typing signals received.
    pub fn typing_count(&self) -> usize {
        self.typing.load(Ordering::SeqCst)
    }

    /// Waits until at least `count` replies were recorded.
    pub async fn wait_for(&self, count: usize) {
        loop {
            let notified = self.notify.notified();
            if self.replies.lock().await.len() >= count {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl ReplySink for RecordingReplySink {
    async fn send(&self, reply: OutboundReply) -> Result<(), TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError::Network("simulated delivery failure".to_string()));
        }
        self.replies.lock().await.push(reply);
        self.notify.notify_waiters();
        Ok(())
    }

    async fn typing(&self) -> Result<(), TransportError> {
        self.typing.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
