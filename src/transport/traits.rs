use crate::error::TransportError;
use crate::message::{MessageSegment, onebot};
use async_trait::async_trait;

/// Result of a send call.
///
/// `message_id` is `None` (or zero) when the platform produced nothing that
/// can be retracted later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: Option<i64>,
}

impl SendReceipt {
    pub fn new(message_id: i64) -> Self {
        Self {
            message_id: Some(message_id),
        }
    }

    /// Identifier usable for a later delete, if any.
    pub fn retractable_id(&self) -> Option<i64> {
        self.message_id.filter(|id| *id != 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySender {
    pub user_id: String,
}

/// One entry of a group's message history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub message_id: i64,
    pub sender: HistorySender,
}

impl HistoryMessage {
    pub fn new(message_id: i64, sender_id: impl Into<String>) -> Self {
        Self {
            message_id,
            sender: HistorySender {
                user_id: sender_id.into(),
            },
        }
    }
}

/// Chat transport operations needed by the recall core.
///
/// Every call may fail independently; failures are errors, never sentinel
/// values mixed into a successful result.
#[async_trait]
pub trait RecallTransport: Send + Sync {
    /// Human-readable transport name
    fn name(&self) -> &str;

    async fn delete_message(&self, message_id: i64) -> Result<(), TransportError>;

    async fn send_group_message(
        &self,
        group_id: &str,
        message: &serde_json::Value,
    ) -> Result<SendReceipt, TransportError>;

    async fn send_private_message(
        &self,
        user_id: &str,
        message: &serde_json::Value,
    ) -> Result<SendReceipt, TransportError>;

    async fn fetch_group_history(
        &self,
        _group_id: &str,
        _start_seq: i64,
        _count: usize,
        _reverse_order: bool,
    ) -> Result<Vec<HistoryMessage>, TransportError> {
        Err(TransportError::Unsupported("group history".into()))
    }

    /// Translate a chain into this transport's wire format.
    fn to_wire_format(&self, chain: &[MessageSegment]) -> serde_json::Value {
        onebot::to_wire(chain)
    }
}
