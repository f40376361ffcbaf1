//! Debounced documentation lookups driven by cursor movement.
//!
//! Cursor events arrive far faster than the kernel can answer, so a trailing
//! timer coalesces each burst into one lookup. The timer is global to the
//! debouncer: a cursor event in any cell resets it.
//!
//! Requests that were already dispatched are never cancelled. Each one
//! carries a generation number, and a response is only published if no newer
//! request was dispatched while it was in flight.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::document::CellDocument;
use crate::provider::DocumentationProvider;

use super::documentation::request_documentation;

/// Default quiescence delay before a lookup is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

/// Observable phase of the debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    /// A timer is armed and has not fired yet.
    Pending,
    /// At least one lookup is in flight and no timer is armed.
    Requesting,
}

/// Receiving side of the "current documentation" slot.
pub type DocumentationSlot = watch::Receiver<Option<String>>;

struct Scheduled {
    seq: u64,
    handle: JoinHandle<()>,
    document: Arc<CellDocument>,
    position: usize,
}

struct Inner<P: ?Sized> {
    provider: Arc<P>,
    delay: Duration,
    exclude_types: Vec<String>,
    scheduled: Mutex<Option<Scheduled>>,
    next_seq: AtomicU64,
    /// Generation of the most recently dispatched request.
    issued: AtomicU64,
    in_flight: AtomicUsize,
    slot: watch::Sender<Option<String>>,
}

/// Trailing debouncer that publishes documentation HTML for the last cursor
/// position of a burst.
pub struct DocumentationDebouncer<P: ?Sized> {
    inner: Arc<Inner<P>>,
}

impl<P> DocumentationDebouncer<P>
where
    P: DocumentationProvider + ?Sized,
{
    pub fn new(provider: Arc<P>, delay: Duration, exclude_types: Vec<String>) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                provider,
                delay,
                exclude_types,
                scheduled: Mutex::new(None),
                next_seq: AtomicU64::new(0),
                issued: AtomicU64::new(0),
                in_flight: AtomicUsize::new(0),
                slot,
            }),
        }
    }

    /// Arm the timer for a lookup at `position`, replacing any unfired timer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, document: Arc<CellDocument>, position: usize) {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let mut scheduled = self.inner.lock_scheduled();

        if let Some(previous) = scheduled.take() {
            previous.handle.abort();
        }

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(inner.delay).await;
            inner.fire(seq).await;
        });

        *scheduled = Some(Scheduled {
            seq,
            handle,
            document,
            position,
        });
    }

    /// Disarm the pending timer. Lookups already in flight keep running.
    pub fn cancel(&self) {
        if let Some(previous) = self.inner.lock_scheduled().take() {
            previous.handle.abort();
        }
    }

    pub fn state(&self) -> DebounceState {
        if self.inner.lock_scheduled().is_some() {
            DebounceState::Pending
        } else if self.inner.in_flight.load(Ordering::Acquire) > 0 {
            DebounceState::Requesting
        } else {
            DebounceState::Idle
        }
    }

    /// Watch the published documentation.
    pub fn subscribe(&self) -> DocumentationSlot {
        self.inner.slot.subscribe()
    }

    /// The currently published documentation.
    pub fn current(&self) -> Option<String> {
        self.inner.slot.borrow().clone()
    }
}

impl<P: ?Sized> Drop for DocumentationDebouncer<P> {
    fn drop(&mut self) {
        if let Some(previous) = self.inner.lock_scheduled().take() {
            previous.handle.abort();
        }
    }
}

impl<P: ?Sized> Inner<P> {
    fn lock_scheduled(&self) -> MutexGuard<'_, Option<Scheduled>> {
        self.scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, documentation: Option<String>) {
        self.slot.send_if_modified(|current| {
            if *current == documentation {
                return false;
            }
            *current = documentation;
            true
        });
    }
}

impl<P> Inner<P>
where
    P: DocumentationProvider + ?Sized,
{
    async fn fire(&self, seq: u64) {
        // A newer schedule may have replaced this timer after it woke up.
        let taken = {
            let mut scheduled = self.lock_scheduled();
            if scheduled.as_ref().map(|s| s.seq) == Some(seq) {
                scheduled.take()
            } else {
                None
            }
        };
        let Some(Scheduled {
            document, position, ..
        }) = taken
        else {
            return;
        };

        let generation = self.issued.fetch_add(1, Ordering::AcqRel) + 1;
        self.in_flight.fetch_add(1, Ordering::AcqRel);

        let outcome = request_documentation(
            &*self.provider,
            &document.text,
            position,
            document.cell_id.as_ref(),
            &self.exclude_types,
        )
        .await;

        self.in_flight.fetch_sub(1, Ordering::AcqRel);

        if self.issued.load(Ordering::Acquire) != generation {
            tracing::debug!(generation, "discarding stale documentation response");
            return;
        }

        let documentation = match outcome {
            Ok(found) => found.tooltip().map(|t| t.html),
            Err(err) => {
                tracing::warn!(error = %err, "documentation request failed");
                None
            }
        };
        self.publish(documentation);
    }
}
