use tracing::{error, info};

use crate::config::{Config, ProviderConfig};
use crate::dispatch::{Dispatcher, Transport};
use crate::error::{KotobaError, Result};
use crate::format;
use crate::i18n::Localizer;
use crate::messages;
use crate::parser::{self, Command};
use crate::strategy::{ResponseShape, StrategyTable};

/// Entry point: one call per piece of user input.
///
/// Holds no per-call state, so a single instance can serve concurrent requests.
pub struct Translator<T: Transport> {
    config: Config,
    transport: T,
    localizer: Localizer,
    table: StrategyTable,
}

impl<T: Transport> Translator<T> {
    pub fn new(config: Config, transport: T) -> Self {
        let localizer = Localizer::new(config.lang);
        Self {
            config,
            transport,
            localizer,
            table: StrategyTable,
        }
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    /// Translate `text`, rendering any failure as a localized error message
    pub async fn translate(&self, text: &str, from: &str, to: &str) -> String {
        match self.try_translate(text, from, to).await {
            Ok(result) => result,
            Err(e) => {
                error!("Translation failed: {}", e);
                format!("{}\n{}", self.localizer.get("error_header", &[]), e)
            }
        }
    }

    pub async fn try_translate(&self, text: &str, from: &str, to: &str) -> Result<String> {
        // help short-circuits ahead of validation and never touches the network
        let parsed = match parser::parse_command(text, &self.table) {
            Command::Help => return Ok(self.localizer.get("help", &[])),
            Command::Translate(parsed) => parsed,
        };

        // a bare command prefix leaves nothing to send
        if text.trim().is_empty() || parsed.content.trim().is_empty() {
            return Err(self.invalid("empty_text", &[]));
        }
        if to.trim().is_empty() {
            return Err(self.invalid("empty_target", &[]));
        }

        let provider = ProviderConfig::lookup(&self.config.provider)
            .ok_or_else(|| self.invalid("unsupported_provider", &[self.config.provider.as_str()]))?
            .with_endpoint(self.config.endpoint.as_deref());
        if self.config.api_key.trim().is_empty() {
            return Err(self.invalid("api_key_missing", &[provider.display_name]));
        }

        let strategy = self.table.resolve(&parsed.strategy_key);
        info!(
            "Translating with strategy {} via {} ({} -> {})",
            strategy.key, provider.display_name, from, to
        );

        let messages = messages::build(&self.table, &parsed.strategy_key, &parsed.content, from, to);
        let model = self.config.model_or(provider.default_model);
        let wants_json = strategy.shape() == ResponseShape::Json;

        let payload = Dispatcher::new(&self.transport, self.localizer)
            .send(&provider, self.config.api_key.trim(), model, &messages, wants_json)
            .await?;

        format::format(&payload, &parsed.strategy_key, &self.table, &self.localizer)
    }

    fn invalid(&self, key: &str, args: &[&str]) -> KotobaError {
        KotobaError::Validation(self.localizer.get(key, args))
    }
}
