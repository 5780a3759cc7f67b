use super::policy::ContentPolicy;
use super::scheduler::{RetractionScheduler, TaskId};
use crate::config::RecallConfig;
use crate::event::MessageEvent;
use crate::transport::{RecallTransport, SendReceipt};
use std::sync::Arc;

/// What the pipeline did with an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoRecallOutcome {
    /// Group not in the whitelist; nothing evaluated.
    OutOfScope,
    /// Chain carries no segment the add-on acts on.
    Irrelevant,
    /// Policy let the message through untouched.
    Passed,
    /// Original suppressed and re-sent; `scheduled` is set when a delayed
    /// deletion was queued for `message_id`.
    Recalled {
        message_id: Option<i64>,
        scheduled: Option<TaskId>,
    },
}

/// Re-sends flagged bot replies itself so it learns their message id, then
/// retracts them after the configured delay.
pub struct AutoRecallPipeline {
    config: Arc<RecallConfig>,
    policy: Arc<ContentPolicy>,
    scheduler: Arc<RetractionScheduler>,
    transport: Arc<dyn RecallTransport>,
}

impl AutoRecallPipeline {
    pub fn new(
        config: Arc<RecallConfig>,
        policy: Arc<ContentPolicy>,
        scheduler: Arc<RetractionScheduler>,
        transport: Arc<dyn RecallTransport>,
    ) -> Self {
        Self {
            config,
            policy,
            scheduler,
            transport,
        }
    }

    pub async fn on_outgoing_message(&self, event: &mut MessageEvent) -> AutoRecallOutcome {
        let group_id = event.group_id().map(str::to_string);
        if !self.config.is_group_allowed(group_id.as_deref()) {
            return AutoRecallOutcome::OutOfScope;
        }

        if !event.result().kinds().any(|kind| kind.is_recognized()) {
            return AutoRecallOutcome::Irrelevant;
        }

        let chain = event.result().segments().to_vec();
        if !self.policy.should_recall(group_id.as_deref(), &chain) {
            return AutoRecallOutcome::Passed;
        }

        let wire = self.transport.to_wire_format(&chain);
        let receipt = self.resend(event, group_id.as_deref(), &wire).await;
        let message_id = receipt.and_then(|r| r.retractable_id());

        // Second evaluation also refreshes the last-seen slot.
        let scheduled = match message_id {
            Some(id) if self.policy.should_recall(group_id.as_deref(), &chain) => {
                Some(self.scheduler.schedule(Arc::clone(&self.transport), id))
            }
            _ => None,
        };

        event.result_mut().clear();
        event.stop_processing();

        AutoRecallOutcome::Recalled {
            message_id,
            scheduled,
        }
    }

    async fn resend(
        &self,
        event: &MessageEvent,
        group_id: Option<&str>,
        wire: &serde_json::Value,
    ) -> Option<SendReceipt> {
        let result = if let Some(group_id) = group_id {
            self.transport.send_group_message(group_id, wire).await
        } else if !event.sender_id().is_empty() {
            self.transport
                .send_private_message(event.sender_id(), wire)
                .await
        } else {
            return None;
        };

        match result {
            Ok(receipt) => Some(receipt),
            Err(e) => {
                tracing::warn!(
                    transport = self.transport.name(),
                    "Failed to re-send message for auto-recall: {e}"
                );
                None
            }
        }
    }
}
