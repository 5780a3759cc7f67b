mod core;
mod onebot;
mod recall;

pub use self::core::Config;
pub use onebot::OneBotConfig;
pub use recall::{DuplicateScope, RecallConfig};
