//! # Toast Queue
//!
//! Short-lived notifications. Each toast schedules its own removal when it
//! is shown; dismissing it early aborts that scheduled removal.
//!
//! ```text
//! show("Saved", Success) ──► id 1 ──► spawn(sleep(ttl); remove 1)
//! show("Oops", Error)    ──► id 2 ──► spawn(sleep(ttl); remove 2)
//! dismiss(2)             ──► remove 2, abort its timer
//! ```
//!
//! Auto-removal needs a Tokio runtime. Outside one, toasts stay until
//! dismissed.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    Success,
    Error,
    Info,
    Warning,
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToastKind::Success => "success",
            ToastKind::Error => "error",
            ToastKind::Info => "info",
            ToastKind::Warning => "warning",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub created_at: DateTime<Utc>,
}

struct Entry {
    toast: Toast,
    expiry: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    entries: VecDeque<Entry>,
}

impl Inner {
    fn take(&mut self, id: u64) -> Option<Entry> {
        let index = self.entries.iter().position(|entry| entry.toast.id == id)?;
        self.entries.remove(index)
    }
}

#[derive(Clone)]
pub struct ToastQueue {
    inner: Arc<Mutex<Inner>>,
    ttl: Duration,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        ToastQueue {
            inner: Arc::new(Mutex::new(Inner::default())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Queues a toast and returns its id. Ids increase monotonically.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) -> u64 {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;

        let toast = Toast {
            id,
            message: message.into(),
            kind,
            created_at: Utc::now(),
        };
        debug!(id, %kind, "Toast shown");

        let expiry = self.schedule_removal(id);
        inner.entries.push_back(Entry { toast, expiry });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Success)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Error)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Info)
    }

    pub fn warning(&self, message: impl Into<String>) -> u64 {
        self.show(message, ToastKind::Warning)
    }

    /// Removes a toast now. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let entry = self.lock().take(id);
        match entry {
            Some(entry) => {
                if let Some(expiry) = entry.expiry {
                    expiry.abort();
                }
                debug!(id, "Toast dismissed");
                true
            }
            None => false,
        }
    }

    /// Visible toasts, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.lock()
            .entries
            .iter()
            .map(|entry| entry.toast.clone())
            .collect()
    }

    fn schedule_removal(&self, id: u64) -> Option<JoinHandle<()>> {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(id, "No async runtime, toast will not expire on its own");
                return None;
            }
        };

        let inner = Arc::downgrade(&self.inner);
        let ttl = self.ttl;
        Some(handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Some(inner) = inner.upgrade() {
                let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
                if inner.take(id).is_some() {
                    debug!(id, "Toast expired");
                }
            }
        }))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_millis(3000);

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_ttl() {
        let queue = ToastQueue::new(TTL);
        let id = queue.success("Category saved");

        let visible = queue.toasts();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, id);
        assert_eq!(visible[0].kind, ToastKind::Success);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(queue.toasts().len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(queue.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_cancels_scheduled_removal() {
        let queue = ToastQueue::new(TTL);
        let first = queue.error("Failed to save");
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let second = queue.info("Syncing");

        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert_eq!(queue.toasts().len(), 1);

        // The first toast's timer would have fired here.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let visible = queue.toasts();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, second);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(queue.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let queue = ToastQueue::new(TTL);
        let a = queue.warning("a");
        let b = queue.info("b");
        queue.dismiss(a);
        let c = queue.success("c");
        assert!(a < b && b < c);
    }

    #[test]
    fn test_without_runtime_toasts_stay() {
        let queue = ToastQueue::new(TTL);
        let id = queue.show("Offline", ToastKind::Warning);
        assert_eq!(queue.toasts().len(), 1);
        assert!(queue.dismiss(id));
    }
}
