pub mod onebot;
pub mod traits;

pub use onebot::OneBotHttpTransport;
pub use traits::{HistoryMessage, HistorySender, RecallTransport, SendReceipt};
