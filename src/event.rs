use crate::message::{MessageChain, MessageSegment};

/// A message event as seen by the recall add-on.
///
/// `message` is what the user sent (used by the recall command), `result` is
/// what the bot is about to send back (used by auto-recall). The host reads
/// `result` and `is_stopped()` after the handlers ran.
#[derive(Debug, Clone, Default)]
pub struct MessageEvent {
    group_id: Option<String>,
    sender_id: String,
    self_id: String,
    message: Vec<MessageSegment>,
    result: MessageChain,
    stopped: bool,
}

impl MessageEvent {
    pub fn new(sender_id: impl Into<String>, self_id: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            self_id: self_id.into(),
            ..Self::default()
        }
    }

    pub fn in_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    pub fn with_message(mut self, message: Vec<MessageSegment>) -> Self {
        self.message = message;
        self
    }

    pub fn with_result(mut self, result: impl Into<MessageChain>) -> Self {
        self.result = result.into();
        self
    }

    /// Group the event belongs to; `None` for private chats. Empty ids are
    /// treated as absent.
    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    pub fn self_id(&self) -> &str {
        &self.self_id
    }

    pub fn messages(&self) -> &[MessageSegment] {
        &self.message
    }

    pub fn result(&self) -> &MessageChain {
        &self.result
    }

    pub fn result_mut(&mut self) -> &mut MessageChain {
        &mut self.result
    }

    /// Suppress any further handling of this event by the host.
    pub fn stop_processing(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}
