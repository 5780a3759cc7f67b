use crate::config::{DuplicateScope, RecallConfig};
use crate::message::MessageSegment;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

const GLOBAL_SLOT: &str = "*";
const PRIVATE_SLOT: &str = "private";

/// Why a chain was flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecallReason {
    /// Same chain as the previous evaluation in this scope.
    Repeat,
    /// A text segment is longer than the configured limit.
    TooLong { chars: usize, limit: usize },
    /// A text segment contains a banned keyword.
    Keyword(String),
    /// The image classifier flagged a picture.
    Image,
}

impl fmt::Display for RecallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Repeat => write!(f, "repeat of the previous message"),
            Self::TooLong { chars, limit } => {
                write!(f, "text of {chars} chars exceeds limit {limit}")
            }
            Self::Keyword(word) => write!(f, "contains banned keyword '{word}'"),
            Self::Image => write!(f, "image flagged by classifier"),
        }
    }
}

/// Verdict of the image classification hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVerdict {
    Pass,
    Flag,
}

impl ImageVerdict {
    /// Classify an image by its file reference. No classifier is wired in
    /// yet, so every image passes.
    pub fn classify(_file: &str) -> Self {
        Self::Pass
    }
}

/// Remembers the last evaluated chain for each scope.
#[derive(Debug)]
pub struct LastSeenTracker {
    scope: DuplicateScope,
    slots: Mutex<HashMap<String, Vec<MessageSegment>>>,
}

impl LastSeenTracker {
    pub fn new(scope: DuplicateScope) -> Self {
        Self {
            scope,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<MessageSegment>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot_key<'a>(&self, group_id: Option<&'a str>) -> &'a str {
        match self.scope {
            DuplicateScope::Global => GLOBAL_SLOT,
            DuplicateScope::PerGroup => group_id.unwrap_or(PRIVATE_SLOT),
        }
    }

    /// Compare `chain` with the slot, then overwrite the slot with `chain`.
    /// Returns whether it was a repeat. An empty previous chain never counts.
    pub fn observe(&self, group_id: Option<&str>, chain: &[MessageSegment]) -> bool {
        let key = self.slot_key(group_id);
        let mut slots = self.lock();
        let repeated = slots
            .get(key)
            .is_some_and(|previous| !previous.is_empty() && previous.as_slice() == chain);
        slots.insert(key.to_string(), chain.to_vec());
        repeated
    }

    pub fn last_seen(&self, group_id: Option<&str>) -> Option<Vec<MessageSegment>> {
        let key = self.slot_key(group_id);
        self.lock().get(key).cloned()
    }
}

/// Decides whether a message chain should be retracted.
#[derive(Debug)]
pub struct ContentPolicy {
    max_plain_len: usize,
    banned_keywords: Vec<String>,
    last_seen: LastSeenTracker,
}

impl ContentPolicy {
    pub fn new(config: &RecallConfig) -> Self {
        Self {
            max_plain_len: config.max_plain_len,
            banned_keywords: config
                .recall_words
                .iter()
                .filter(|word| !word.is_empty())
                .cloned()
                .collect(),
            last_seen: LastSeenTracker::new(config.duplicate_scope),
        }
    }

    pub fn last_seen(&self) -> &LastSeenTracker {
        &self.last_seen
    }

    pub fn should_recall(&self, group_id: Option<&str>, chain: &[MessageSegment]) -> bool {
        self.evaluate(group_id, chain).is_some()
    }

    /// Run the checks in order and report the first one that fires.
    ///
    /// Every call records `chain` as the scope's last-seen message, whatever
    /// the verdict.
    pub fn evaluate(
        &self,
        group_id: Option<&str>,
        chain: &[MessageSegment],
    ) -> Option<RecallReason> {
        if self.last_seen.observe(group_id, chain) {
            tracing::debug!(group = group_id.unwrap_or("-"), "recall policy: repeat");
            return Some(RecallReason::Repeat);
        }

        for segment in chain {
            match segment {
                MessageSegment::Text { text } => {
                    if let Some(reason) = self.check_text(text) {
                        tracing::debug!(group = group_id.unwrap_or("-"), "recall policy: {reason}");
                        return Some(reason);
                    }
                }
                MessageSegment::Image { file } => {
                    return match ImageVerdict::classify(file) {
                        ImageVerdict::Pass => None,
                        ImageVerdict::Flag => Some(RecallReason::Image),
                    };
                }
                MessageSegment::Video { .. }
                | MessageSegment::Face { .. }
                | MessageSegment::Mention { .. }
                | MessageSegment::MentionAll
                | MessageSegment::ForwardedBundle { .. }
                | MessageSegment::QuotedReply { .. } => {}
            }
        }

        None
    }

    fn check_text(&self, text: &str) -> Option<RecallReason> {
        let chars = text.chars().count();
        if chars > self.max_plain_len {
            return Some(RecallReason::TooLong {
                chars,
                limit: self.max_plain_len,
            });
        }
        self.banned_keywords
            .iter()
            .find(|word| text.contains(word.as_str()))
            .map(|word| RecallReason::Keyword(word.clone()))
    }
}
