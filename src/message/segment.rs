use strum::Display;

/// One typed unit of a chat message.
///
/// Equality is structural: two chains are the same message only when every
/// segment matches in kind, payload and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSegment {
    Text { text: String },
    Image { file: String },
    Video { file: String },
    Face { id: String },
    Mention { user_id: String },
    MentionAll,
    ForwardedBundle { id: String },
    QuotedReply { message_id: i64 },
}

/// Payload-free tag of a [`MessageSegment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SegmentKind {
    Text,
    Image,
    Video,
    Face,
    Mention,
    MentionAll,
    ForwardedBundle,
    QuotedReply,
}

impl SegmentKind {
    /// Kinds the recall add-on acts on. Anything else in an outgoing chain
    /// (nothing today) is left alone.
    pub const RECOGNIZED: [SegmentKind; 8] = [
        SegmentKind::Text,
        SegmentKind::Image,
        SegmentKind::Video,
        SegmentKind::Face,
        SegmentKind::Mention,
        SegmentKind::MentionAll,
        SegmentKind::ForwardedBundle,
        SegmentKind::QuotedReply,
    ];

    pub fn is_recognized(self) -> bool {
        Self::RECOGNIZED.contains(&self)
    }
}

impl MessageSegment {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn image(file: impl Into<String>) -> Self {
        Self::Image { file: file.into() }
    }

    pub fn mention(user_id: impl Into<String>) -> Self {
        Self::Mention {
            user_id: user_id.into(),
        }
    }

    pub fn reply(message_id: i64) -> Self {
        Self::QuotedReply { message_id }
    }

    pub fn kind(&self) -> SegmentKind {
        match self {
            Self::Text { .. } => SegmentKind::Text,
            Self::Image { .. } => SegmentKind::Image,
            Self::Video { .. } => SegmentKind::Video,
            Self::Face { .. } => SegmentKind::Face,
            Self::Mention { .. } => SegmentKind::Mention,
            Self::MentionAll => SegmentKind::MentionAll,
            Self::ForwardedBundle { .. } => SegmentKind::ForwardedBundle,
            Self::QuotedReply { .. } => SegmentKind::QuotedReply,
        }
    }
}

/// Ordered sequence of segments making up one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageChain(Vec<MessageSegment>);

impl MessageChain {
    pub fn segments(&self) -> &[MessageSegment] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drops every segment in place.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn kinds(&self) -> impl Iterator<Item = SegmentKind> + '_ {
        self.0.iter().map(MessageSegment::kind)
    }
}

impl From<Vec<MessageSegment>> for MessageChain {
    fn from(segments: Vec<MessageSegment>) -> Self {
        Self(segments)
    }
}
