use serde::{Deserialize, Serialize};

fn default_recall_time() -> u64 {
    60
}

fn default_max_plain_len() -> usize {
    50
}

fn default_error_keywords() -> Vec<String> {
    vec!["请求失败".into()]
}

fn default_batch_count() -> usize {
    10
}

fn default_batch_concurrency() -> usize {
    10
}

/// Where the "same message as last time" slot lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DuplicateScope {
    /// One slot per group (private chats share a single slot).
    #[default]
    PerGroup,
    /// One slot for the whole process.
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecallConfig {
    /// Seconds between re-sending a flagged message and retracting it.
    #[serde(default = "default_recall_time")]
    pub recall_time: u64,
    /// Groups where auto-recall is active. Empty = every group.
    #[serde(default)]
    pub group_whitelist: Vec<String>,
    /// Text segments longer than this many characters are recalled.
    #[serde(default = "default_max_plain_len")]
    pub max_plain_len: usize,
    /// Substrings that flag a text segment for recall.
    #[serde(default)]
    pub recall_words: Vec<String>,
    /// Reserved for matching upstream error replies; not consulted yet.
    #[serde(default = "default_error_keywords")]
    pub error_keywords: Vec<String>,
    #[serde(default)]
    pub duplicate_scope: DuplicateScope,
    /// Messages scanned by `recall @user` when no count is given.
    #[serde(default = "default_batch_count")]
    pub batch_default_count: usize,
    /// Maximum delete calls in flight during a batch recall.
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            recall_time: default_recall_time(),
            group_whitelist: Vec::new(),
            max_plain_len: default_max_plain_len(),
            recall_words: Vec::new(),
            error_keywords: default_error_keywords(),
            duplicate_scope: DuplicateScope::default(),
            batch_default_count: default_batch_count(),
            batch_concurrency: default_batch_concurrency(),
        }
    }
}

impl RecallConfig {
    /// Whether auto-recall applies to the given group.
    pub fn is_group_allowed(&self, group_id: Option<&str>) -> bool {
        if self.group_whitelist.is_empty() {
            return true;
        }
        group_id.is_some_and(|id| self.group_whitelist.iter().any(|allowed| allowed == id))
    }
}
