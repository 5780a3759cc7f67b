#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en");

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod recall;
pub mod transport;

pub use config::Config;
pub use error::{ConfigError, TransportError};
pub use event::MessageEvent;
pub use message::{MessageChain, MessageSegment, SegmentKind};
pub use recall::RecallPlugin;
pub use transport::RecallTransport;
