use crate::transport::RecallTransport;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Opaque identity of a scheduled retraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(Uuid);

impl TaskId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recall_{}", self.0.simple())
    }
}

/// Read-only view of a pending retraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRetraction {
    pub id: TaskId,
    pub message_id: i64,
    pub scheduled_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
}

struct RetractionEntry {
    pending: PendingRetraction,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

type Registry = Arc<Mutex<HashMap<TaskId, RetractionEntry>>>;

fn lock_registry(registry: &Registry) -> MutexGuard<'_, HashMap<TaskId, RetractionEntry>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes the task from the registry when its future finishes or is dropped.
struct Deregister {
    registry: Registry,
    id: TaskId,
}

impl Drop for Deregister {
    fn drop(&mut self) {
        lock_registry(&self.registry).remove(&self.id);
    }
}

/// Tracks delayed deletions of messages the bot sent.
///
/// Deletion is best effort: a failed delete is logged and dropped.
pub struct RetractionScheduler {
    delay: Duration,
    registry: Registry,
}

impl RetractionScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            registry: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Delete `message_id` through `client` once the delay has elapsed.
    ///
    /// A zero id is tracked like any other but never sent to the transport.
    pub fn schedule(&self, client: Arc<dyn RecallTransport>, message_id: i64) -> TaskId {
        let id = TaskId::new();
        let token = CancellationToken::new();
        let deadline = deadline_after(self.delay);
        let scheduled_at = Utc::now();
        let due_at = chrono::Duration::from_std(self.delay)
            .ok()
            .and_then(|delay| scheduled_at.checked_add_signed(delay))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        // Hold the lock across spawn so the task cannot deregister before it
        // has been registered.
        let mut registry = lock_registry(&self.registry);
        let guard = Deregister {
            registry: Arc::clone(&self.registry),
            id,
        };
        let handle = tokio::spawn(run_retraction(
            client,
            message_id,
            deadline,
            token.clone(),
            guard,
        ));
        registry.insert(
            id,
            RetractionEntry {
                pending: PendingRetraction {
                    id,
                    message_id,
                    scheduled_at,
                    due_at,
                },
                token,
                handle: Some(handle),
            },
        );
        drop(registry);

        tracing::debug!(task = %id, message_id, "scheduled recall in {:?}", self.delay);
        id
    }

    /// Cancel every pending retraction and wait until all of them settled.
    pub async fn cancel_all(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut registry = lock_registry(&self.registry);
            registry
                .values_mut()
                .filter_map(|entry| {
                    entry.token.cancel();
                    entry.handle.take()
                })
                .collect()
        };

        for handle in handles {
            if let Err(e) = handle.await
                && !e.is_cancelled()
            {
                tracing::warn!("Recall task ended abnormally during shutdown: {e}");
            }
        }

        lock_registry(&self.registry).clear();
    }

    pub fn len(&self) -> usize {
        lock_registry(&self.registry).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: TaskId) -> bool {
        lock_registry(&self.registry).contains_key(&id)
    }

    /// Snapshot of pending retractions, soonest first.
    pub fn pending(&self) -> Vec<PendingRetraction> {
        let mut pending: Vec<_> = lock_registry(&self.registry)
            .values()
            .map(|entry| entry.pending.clone())
            .collect();
        pending.sort_by(|a, b| a.due_at.cmp(&b.due_at).then(a.id.cmp(&b.id)));
        pending
    }
}

/// Far enough ahead to never fire, for delays too large to represent.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

fn deadline_after(delay: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(delay).unwrap_or(now + FAR_FUTURE)
}

async fn run_retraction(
    client: Arc<dyn RecallTransport>,
    message_id: i64,
    deadline: Instant,
    token: CancellationToken,
    _guard: Deregister,
) {
    tokio::select! {
        () = token.cancelled() => {
            tracing::debug!(message_id, "recall cancelled before delay elapsed");
            return;
        }
        () = tokio::time::sleep_until(deadline) => {}
    }

    if message_id == 0 {
        return;
    }

    tokio::select! {
        () = token.cancelled() => {
            tracing::debug!(message_id, "recall cancelled during delete");
        }
        result = client.delete_message(message_id) => match result {
            Ok(()) => tracing::debug!(message_id, "auto-recalled message"),
            Err(e) => tracing::error!(message_id, "Failed to recall message: {e}"),
        },
    }
}
