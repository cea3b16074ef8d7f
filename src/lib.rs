//! Kotoba - Command-Prefixed Translation Adapter
//!
//! Turns user input such as `$p Good morning` into a chat-completion request for a
//! language model provider and renders the model's reply for display.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod i18n;
pub mod language;
pub mod messages;
pub mod parser;
pub mod strategy;
pub mod translator;

pub use config::Config;
pub use dispatch::{ReqwestTransport, Transport};
pub use error::{KotobaError, Result};
pub use translator::Translator;
