use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use asteroniris_recall::config::RecallConfig;
use asteroniris_recall::recall::{BatchRecallEngine, BatchRecallRequest, MAX_CONCURRENT_DELETES};
use asteroniris_recall::{MessageEvent, MessageSegment, RecallPlugin};

use super::recall_harness::{RecordingTransport, history_newest_first};

fn command(group: &str, segments: Vec<MessageSegment>) -> MessageEvent {
    MessageEvent::new("admin", "bot")
        .in_group(group)
        .with_message(segments)
}

fn only(user: &str) -> BTreeSet<String> {
    BTreeSet::from([user.to_string()])
}

#[tokio::test]
async fn recalls_only_target_messages_and_reports_counts() {
    let senders = [
        "alice", "bob", "alice", "carol", "alice", "bob", "bob", "alice", "carol", "dave",
    ];
    let history = history_newest_first(&senders);
    let transport = Arc::new(RecordingTransport::new().with_history(history));
    let plugin = RecallPlugin::new(RecallConfig::default(), transport.clone());
    let mut event = command(
        "100",
        vec![
            MessageSegment::text("recall "),
            MessageSegment::mention("alice"),
        ],
    );

    let reply = plugin.on_recall_command(&mut event, "recall @alice").await;

    assert_eq!(reply.as_deref(), Some("recalled 4 of 10 messages"));
    assert_eq!(transport.deleted(), vec![1, 3, 5, 8]);
    assert_eq!(
        *transport.history_requests.lock().unwrap(),
        vec![("100".to_string(), 0, 10, true)]
    );
}

#[tokio::test]
async fn trailing_number_sets_history_count() {
    let history = history_newest_first(&["alice", "alice", "alice"]);
    let transport = Arc::new(RecordingTransport::new().with_history(history));
    let plugin = RecallPlugin::new(RecallConfig::default(), transport.clone());
    let mut event = command(
        "100",
        vec![
            MessageSegment::text("recall "),
            MessageSegment::mention("alice"),
            MessageSegment::text(" 3"),
        ],
    );

    let text = "recall @alice 3";
    let reply = plugin.on_recall_command(&mut event, text).await;

    assert_eq!(reply.as_deref(), Some("recalled 3 of 3 messages"));
    assert_eq!(transport.history_requests.lock().unwrap()[0].2, 3);
}

#[tokio::test]
async fn mentioning_only_the_bot_targets_the_bot() {
    let history = history_newest_first(&["bot", "alice", "bot"]);
    let transport = Arc::new(RecordingTransport::new().with_history(history));
    let plugin = RecallPlugin::new(RecallConfig::default(), transport.clone());
    let mut event = command(
        "100",
        vec![
            MessageSegment::mention("bot"),
            MessageSegment::text(" recall abc"),
        ],
    );

    let reply = plugin.on_recall_command(&mut event, "recall abc").await;

    assert_eq!(reply.as_deref(), Some("recalled 2 of 10 messages"));
    assert_eq!(transport.deleted(), vec![1, 3]);
}

#[tokio::test]
async fn bot_mentioned_alongside_others_stays_a_target() {
    let history = history_newest_first(&["bot", "alice", "carol", "bot", "alice"]);
    let transport = Arc::new(RecordingTransport::new().with_history(history));
    let plugin = RecallPlugin::new(RecallConfig::default(), transport.clone());
    let mut event = command(
        "100",
        vec![
            MessageSegment::text("recall "),
            MessageSegment::mention("bot"),
            MessageSegment::mention("alice"),
        ],
    );

    let text = "recall @bot @alice 5";
    let reply = plugin.on_recall_command(&mut event, text).await;

    assert_eq!(reply.as_deref(), Some("recalled 4 of 5 messages"));
    assert_eq!(transport.deleted(), vec![1, 2, 4, 5]);
}

#[tokio::test]
async fn failed_deletes_are_not_counted() {
    let history = history_newest_first(&["alice", "alice", "alice", "alice"]);
    let transport = Arc::new(
        RecordingTransport::new()
            .with_history(history)
            .with_failing_deletes([2, 4]),
    );
    let engine = BatchRecallEngine::new(transport.clone());
    let request = BatchRecallRequest::new("100", only("alice"), 4);

    let report = engine.execute(&request).await;

    assert_eq!(report.fetched, 4);
    assert_eq!(report.eligible, 4);
    assert_eq!(report.deleted, 2);
    assert_eq!(transport.deleted(), vec![1, 3]);
}

#[tokio::test(start_paused = true)]
async fn no_more_than_ten_deletes_in_flight() {
    let history = history_newest_first(&["alice"; 35]);
    let transport = Arc::new(
        RecordingTransport::new()
            .with_history(history)
            .with_delete_latency(Duration::from_millis(500)),
    );
    let engine = BatchRecallEngine::new(transport.clone());
    let request = BatchRecallRequest::new("100", only("alice"), 35);

    let report = engine.execute(&request).await;

    assert_eq!(report.deleted, 35);
    assert!(transport.max_in_flight() <= MAX_CONCURRENT_DELETES);
    assert_eq!(transport.max_in_flight(), MAX_CONCURRENT_DELETES);
}

#[tokio::test(start_paused = true)]
async fn configured_concurrency_is_respected() {
    let history = history_newest_first(&["alice"; 12]);
    let transport = Arc::new(
        RecordingTransport::new()
            .with_history(history)
            .with_delete_latency(Duration::from_millis(100)),
    );
    let config = RecallConfig {
        batch_concurrency: 3,
        ..RecallConfig::default()
    };
    let engine = BatchRecallEngine::from_config(transport.clone(), &config);
    let request = BatchRecallRequest::new("100", only("alice"), 12);

    let report = engine.execute(&request).await;

    assert_eq!(report.deleted, 12);
    assert_eq!(transport.max_in_flight(), 3);
}

#[tokio::test]
async fn history_failure_reports_nothing_deleted() {
    let transport = Arc::new(RecordingTransport::new().with_failing_history());
    let plugin = RecallPlugin::new(RecallConfig::default(), transport.clone());
    let mut event = command("100", vec![MessageSegment::mention("alice")]);

    let text = "recall @alice 3";
    let reply = plugin.on_recall_command(&mut event, text).await;

    assert_eq!(reply.as_deref(), Some("recalled 0 of 3 messages"));
    assert!(transport.deleted().is_empty());
}

#[tokio::test]
async fn quoted_reply_without_permission_tells_user_and_stops() {
    let transport = Arc::new(RecordingTransport::new().with_failing_deletes([55]));
    let plugin = RecallPlugin::new(RecallConfig::default(), transport.clone());
    let mut event = command(
        "100",
        vec![MessageSegment::reply(55), MessageSegment::text("recall")],
    );

    let reply = plugin.on_recall_command(&mut event, "recall").await;

    assert_eq!(
        reply.as_deref(),
        Some("no permission to recall this message")
    );
    assert!(event.is_stopped());
    assert!(transport.deleted().is_empty());
}

#[tokio::test]
async fn quoted_reply_success_is_silent_and_stops() {
    let transport = Arc::new(RecordingTransport::new());
    let plugin = RecallPlugin::new(RecallConfig::default(), transport.clone());
    let mut event = command(
        "100",
        vec![
            MessageSegment::reply(55),
            MessageSegment::mention("alice"),
            MessageSegment::text("recall"),
        ],
    );

    let reply = plugin.on_recall_command(&mut event, "recall").await;

    assert_eq!(reply, None);
    assert!(event.is_stopped());
    assert_eq!(transport.deleted(), vec![55]);
    assert!(transport.history_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn command_without_reply_or_mention_is_unhandled() {
    let transport = Arc::new(RecordingTransport::new());
    let plugin = RecallPlugin::new(RecallConfig::default(), transport.clone());
    let mut event = command("100", vec![MessageSegment::text("recall 5")]);

    let reply = plugin.on_recall_command(&mut event, "recall 5").await;

    assert_eq!(reply, None);
    assert!(!event.is_stopped());
    assert!(transport.history_requests.lock().unwrap().is_empty());
}
