pub mod onebot;
pub mod segment;

pub use segment::{MessageChain, MessageSegment, SegmentKind};
