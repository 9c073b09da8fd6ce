//! Toast notifications
//!
//! An ordered list of ephemeral messages. Each toast removes itself after
//! a fixed delay; dismissing early makes the later timer firing a no-op.
//! Observers subscribe to the list through a `watch` channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

/// Identifier of a shown toast
pub type ToastId = u64;

/// How a toast should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

/// An ephemeral notification
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub severity: Severity,
}

struct Inner {
    next_id: AtomicU64,
    toasts: watch::Sender<Vec<Toast>>,
    duration: Duration,
}

/// Ordered store of visible toasts with auto-expiry
#[derive(Clone)]
pub struct ToastStore {
    inner: Arc<Inner>,
}

impl ToastStore {
    pub fn new(duration: Duration) -> Self {
        let (toasts, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                toasts,
                duration,
            }),
        }
    }

    /// Append a toast and schedule its removal. Must be called inside a
    /// tokio runtime. Returns the toast's id for early dismissal.
    pub fn show(&self, message: impl Into<String>, severity: Severity) -> ToastId {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            message: message.into(),
            severity,
        };

        self.inner.toasts.send_modify(|list| list.push(toast));

        let store = self.clone();
        let duration = self.inner.duration;
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            store.dismiss(id);
        });

        id
    }

    /// Remove a toast early. Removing an already-expired toast is a no-op.
    pub fn dismiss(&self, id: ToastId) {
        self.inner
            .toasts
            .send_modify(|list| list.retain(|toast| toast.id != id));
    }

    pub fn success(&self, message: impl Into<String>) -> ToastId {
        self.show(message, Severity::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> ToastId {
        self.show(message, Severity::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> ToastId {
        self.show(message, Severity::Info)
    }

    pub fn warning(&self, message: impl Into<String>) -> ToastId {
        self.show(message, Severity::Warning)
    }

    /// Subscribe to the visible toast list
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.toasts.subscribe()
    }

    /// Snapshot of the visible toasts, in insertion order
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.toasts.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn toast_appears_and_auto_expires() {
        let store = ToastStore::new(Duration::from_secs(5));
        store.success("saved");

        let visible = store.toasts();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].message, "saved");
        assert_eq!(visible[0].severity, Severity::Success);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(store.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn early_dismiss_makes_timer_a_noop() {
        let store = ToastStore::new(Duration::from_secs(5));
        let keep = store.info("still here");
        let gone = store.error("dismiss me");

        store.dismiss(gone);
        assert_eq!(store.toasts().len(), 1);

        // The dismissed toast's timer fires after the first toast expired;
        // neither firing may disturb the other.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(store.toasts().len(), 1);
        assert_eq!(store.toasts()[0].id, keep);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(store.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn multiple_toasts_keep_insertion_order() {
        let store = ToastStore::new(Duration::from_secs(5));
        store.info("first");
        store.warning("second");
        store.success("third");

        let messages: Vec<String> = store.toasts().into_iter().map(|t| t.message).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }
}
