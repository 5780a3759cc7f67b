pub mod schema;

pub use schema::{Config, DuplicateScope, OneBotConfig, RecallConfig};
