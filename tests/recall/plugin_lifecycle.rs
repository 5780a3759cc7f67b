use std::sync::Arc;
use std::time::Duration;

use asteroniris_recall::config::RecallConfig;
use asteroniris_recall::{MessageEvent, MessageSegment, RecallPlugin};

use super::recall_harness::{RecordingTransport, settle};

fn long_reply(group: &str, fill: char) -> MessageEvent {
    MessageEvent::new("user-1", "bot")
        .in_group(group)
        .with_result(vec![MessageSegment::text(fill.to_string().repeat(64))])
}

#[tokio::test(start_paused = true)]
async fn terminate_cancels_pending_retractions() {
    let transport = Arc::new(RecordingTransport::new());
    let plugin = RecallPlugin::new(RecallConfig::default(), transport.clone());

    for (group, fill) in [("100", 'a'), ("200", 'b'), ("300", 'c')] {
        let mut event = long_reply(group, fill);
        plugin.on_decorating_result(&mut event).await;
    }
    assert_eq!(plugin.scheduler().len(), 3);

    plugin.terminate().await;
    assert!(plugin.scheduler().is_empty());

    tokio::time::advance(Duration::from_secs(600)).await;
    settle().await;
    assert!(transport.deleted().is_empty());
}

#[tokio::test]
async fn terminate_twice_is_harmless() {
    let transport = Arc::new(RecordingTransport::new());
    let plugin = RecallPlugin::new(RecallConfig::default(), transport);

    plugin.terminate().await;
    plugin.terminate().await;
    assert!(plugin.scheduler().is_empty());
}

#[tokio::test(start_paused = true)]
async fn pending_snapshot_reflects_scheduled_messages() {
    let transport = Arc::new(RecordingTransport::new());
    let plugin = RecallPlugin::new(
        RecallConfig {
            recall_time: 30,
            ..RecallConfig::default()
        },
        transport.clone(),
    );

    let mut event = long_reply("100", 'q');
    plugin.on_decorating_result(&mut event).await;

    let pending = plugin.scheduler().pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].message_id, 9001);
    assert_eq!(
        pending[0].due_at - pending[0].scheduled_at,
        chrono::Duration::seconds(30)
    );
    assert_eq!(plugin.scheduler().delay(), Duration::from_secs(30));

    tokio::time::advance(Duration::from_secs(31)).await;
    settle().await;
    assert!(plugin.scheduler().pending().is_empty());
    assert_eq!(transport.deleted(), vec![9001]);
}

#[tokio::test(start_paused = true)]
async fn pending_count_never_exceeds_scheduled_count() {
    let transport = Arc::new(RecordingTransport::new());
    let plugin = RecallPlugin::new(
        RecallConfig {
            recall_time: 10,
            ..RecallConfig::default()
        },
        transport.clone(),
    );

    for (n, fill) in ['a', 'b', 'c', 'd'].into_iter().enumerate() {
        let mut event = long_reply("100", fill);
        plugin.on_decorating_result(&mut event).await;
        assert!(plugin.scheduler().len() <= n + 1);
        tokio::time::advance(Duration::from_secs(4)).await;
        settle().await;
    }

    tokio::time::advance(Duration::from_secs(10)).await;
    settle().await;
    assert!(plugin.scheduler().is_empty());
    assert_eq!(transport.sent().len(), 4);
}
