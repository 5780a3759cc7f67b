pub mod auto;
pub mod batch;
pub mod policy;
pub mod scheduler;

pub use auto::{AutoRecallOutcome, AutoRecallPipeline};
pub use batch::{
    BatchRecallEngine, BatchRecallReport, BatchRecallRequest, DEFAULT_RECALL_COUNT,
    MAX_CONCURRENT_DELETES, parse_count, resolve_targets,
};
pub use policy::{ContentPolicy, ImageVerdict, LastSeenTracker, RecallReason};
pub use scheduler::{PendingRetraction, RetractionScheduler, TaskId};

use crate::config::RecallConfig;
use crate::event::MessageEvent;
use crate::transport::RecallTransport;
use std::sync::Arc;
use std::time::Duration;

/// The recall add-on as registered with a bot host.
///
/// The host calls [`RecallPlugin::on_decorating_result`] for every reply the
/// bot is about to send, [`RecallPlugin::on_recall_command`] for the
/// `recall` command, and [`RecallPlugin::terminate`] once on unload.
pub struct RecallPlugin {
    config: Arc<RecallConfig>,
    policy: Arc<ContentPolicy>,
    scheduler: Arc<RetractionScheduler>,
    auto: AutoRecallPipeline,
    batch: BatchRecallEngine,
}

impl RecallPlugin {
    pub fn new(config: RecallConfig, transport: Arc<dyn RecallTransport>) -> Self {
        let config = Arc::new(config);
        let policy = Arc::new(ContentPolicy::new(&config));
        let scheduler = Arc::new(RetractionScheduler::new(Duration::from_secs(
            config.recall_time,
        )));
        let auto = AutoRecallPipeline::new(
            Arc::clone(&config),
            Arc::clone(&policy),
            Arc::clone(&scheduler),
            Arc::clone(&transport),
        );
        let batch = BatchRecallEngine::from_config(transport, &config);

        Self {
            config,
            policy,
            scheduler,
            auto,
            batch,
        }
    }

    pub fn config(&self) -> &RecallConfig {
        &self.config
    }

    pub fn policy(&self) -> &ContentPolicy {
        &self.policy
    }

    pub fn scheduler(&self) -> &RetractionScheduler {
        &self.scheduler
    }

    pub async fn on_decorating_result(&self, event: &mut MessageEvent) -> AutoRecallOutcome {
        self.auto.on_outgoing_message(event).await
    }

    pub async fn on_recall_command(&self, event: &mut MessageEvent, text: &str) -> Option<String> {
        self.batch.handle_command(event, text).await
    }

    /// Cancel every pending retraction and wait for them to settle.
    pub async fn terminate(&self) {
        let pending = self.scheduler.len();
        self.scheduler.cancel_all().await;
        tracing::info!(cancelled = pending, "Recall add-on unloaded");
    }
}
