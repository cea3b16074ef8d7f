use serde::{Deserialize, Serialize};

use crate::strategy::StrategyTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One chat-completion message, serialized as `{"role": ..., "content": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Build the outbound messages for `strategy_key`.
///
/// Passthrough strategies yield a single user message; every other strategy yields
/// a system message followed by a user message.
pub fn build(
    table: &StrategyTable,
    strategy_key: &str,
    content: &str,
    from: &str,
    to: &str,
) -> Vec<Message> {
    let strategy = table.resolve(strategy_key);
    let user = Message::user(strategy.user_prompt(content, to));

    match strategy.system_prompt(from, to) {
        Some(system) => vec![Message::system(system), user],
        None => vec![user],
    }
}
