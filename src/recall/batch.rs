use crate::config::RecallConfig;
use crate::event::MessageEvent;
use crate::message::MessageSegment;
use crate::transport::{HistoryMessage, RecallTransport};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub const DEFAULT_RECALL_COUNT: usize = 10;
pub const MAX_CONCURRENT_DELETES: usize = 10;

/// Parse the trailing whitespace-delimited token as a positive count.
pub fn parse_count(text: &str, default: usize) -> usize {
    text.split_whitespace()
        .next_back()
        .and_then(|token| token.parse::<usize>().ok())
        .filter(|count| *count > 0)
        .unwrap_or(default)
}

/// Every mentioned user, the bot included when it is mentioned; the bot
/// alone when nobody is.
pub fn resolve_targets(segments: &[MessageSegment], self_id: &str) -> BTreeSet<String> {
    let mut targets: BTreeSet<String> = segments
        .iter()
        .filter_map(|segment| match segment {
            MessageSegment::Mention { user_id } if !user_id.is_empty() => Some(user_id.clone()),
            _ => None,
        })
        .collect();
    if targets.is_empty() {
        targets.insert(self_id.to_string());
    }
    targets
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRecallRequest {
    pub group_id: String,
    pub target_user_ids: BTreeSet<String>,
    pub count: usize,
}

impl BatchRecallRequest {
    pub fn new(
        group_id: impl Into<String>,
        target_user_ids: BTreeSet<String>,
        count: usize,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            target_user_ids,
            count: count.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchRecallReport {
    pub requested: usize,
    pub fetched: usize,
    pub eligible: usize,
    pub deleted: usize,
}

impl BatchRecallReport {
    pub fn summary(&self) -> String {
        t!(
            "recall.summary",
            deleted = self.deleted,
            count = self.requested
        )
        .to_string()
    }
}

/// Serves the `recall` command: one quoted message, or the recent messages
/// of the mentioned users.
pub struct BatchRecallEngine {
    transport: Arc<dyn RecallTransport>,
    default_count: usize,
    concurrency: usize,
}

impl BatchRecallEngine {
    pub fn new(transport: Arc<dyn RecallTransport>) -> Self {
        Self {
            transport,
            default_count: DEFAULT_RECALL_COUNT,
            concurrency: MAX_CONCURRENT_DELETES,
        }
    }

    pub fn from_config(transport: Arc<dyn RecallTransport>, config: &RecallConfig) -> Self {
        Self {
            transport,
            default_count: config.batch_default_count.max(1),
            concurrency: config.batch_concurrency.max(1),
        }
    }

    /// Handle a recall command. Returns the reply for the issuing user, if
    /// any.
    pub async fn handle_command(&self, event: &mut MessageEvent, text: &str) -> Option<String> {
        let first = event.messages().first().cloned();
        match first {
            Some(MessageSegment::QuotedReply { message_id }) => {
                let reply = match self.transport.delete_message(message_id).await {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::debug!(message_id, "Quoted recall rejected: {e}");
                        Some(t!("recall.no_permission").to_string())
                    }
                };
                event.stop_processing();
                reply
            }
            _ if event
                .messages()
                .iter()
                .any(|segment| matches!(segment, MessageSegment::Mention { .. })) =>
            {
                let Some(group_id) = event.group_id() else {
                    tracing::debug!("recall command with mentions outside a group ignored");
                    return None;
                };
                let request = BatchRecallRequest::new(
                    group_id,
                    resolve_targets(event.messages(), event.self_id()),
                    parse_count(text, self.default_count),
                );
                Some(self.execute(&request).await.summary())
            }
            _ => None,
        }
    }

    /// Fetch the group's latest `count` messages and delete the ones sent by
    /// the targets, at most `concurrency` deletes in flight.
    pub async fn execute(&self, request: &BatchRecallRequest) -> BatchRecallReport {
        let mut report = BatchRecallReport {
            requested: request.count,
            ..BatchRecallReport::default()
        };

        let mut history = match self
            .transport
            .fetch_group_history(&request.group_id, 0, request.count, true)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(group = %request.group_id, "Failed to fetch message history: {e}");
                return report;
            }
        };
        history.reverse();
        report.fetched = history.len();

        let eligible: Vec<HistoryMessage> = history
            .into_iter()
            .filter(|msg| request.target_user_ids.contains(&msg.sender.user_id))
            .collect();
        report.eligible = eligible.len();

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut deletes = JoinSet::new();
        for msg in eligible {
            let semaphore = Arc::clone(&semaphore);
            let transport = Arc::clone(&self.transport);
            deletes.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return false;
                };
                match transport.delete_message(msg.message_id).await {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::debug!(message_id = msg.message_id, "Batch recall skipped: {e}");
                        false
                    }
                }
            });
        }

        while let Some(joined) = deletes.join_next().await {
            match joined {
                Ok(true) => report.deleted += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("Batch recall task failed: {e}"),
            }
        }

        tracing::info!(
            group = %request.group_id,
            deleted = report.deleted,
            eligible = report.eligible,
            requested = report.requested,
            "batch recall finished"
        );
        report
    }
}
