//! OneBot v11 wire translation.
//!
//! Outgoing messages are sent in array form: a JSON list of
//! `{"type": ..., "data": {...}}` objects, one per segment.

use super::segment::MessageSegment;
use serde_json::{Value, json};

/// Translate a segment chain into the OneBot v11 array message format.
pub fn to_wire(chain: &[MessageSegment]) -> Value {
    Value::Array(chain.iter().map(segment_to_wire).collect())
}

fn segment_to_wire(segment: &MessageSegment) -> Value {
    match segment {
        MessageSegment::Text { text } => json!({ "type": "text", "data": { "text": text } }),
        MessageSegment::Image { file } => json!({ "type": "image", "data": { "file": file } }),
        MessageSegment::Video { file } => json!({ "type": "video", "data": { "file": file } }),
        MessageSegment::Face { id } => json!({ "type": "face", "data": { "id": id } }),
        MessageSegment::Mention { user_id } => json!({ "type": "at", "data": { "qq": user_id } }),
        MessageSegment::MentionAll => json!({ "type": "at", "data": { "qq": "all" } }),
        MessageSegment::ForwardedBundle { id } => {
            json!({ "type": "forward", "data": { "id": id } })
        }
        MessageSegment::QuotedReply { message_id } => {
            json!({ "type": "reply", "data": { "id": message_id.to_string() } })
        }
    }
}
