//! Outbound chat-completion requests.
//!
//! The network itself sits behind [`Transport`] so the host can supply its own client;
//! [`ReqwestTransport`] is the stock implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{KotobaError, Result};
use crate::i18n::Localizer;
use crate::messages::Message;

pub const TEMPERATURE: f64 = 0.1;
pub const TOP_P: f64 = 0.99;
pub const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    /// Decoded body; bodies that aren't JSON arrive as a JSON string
    pub data: Value,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// POSTs a JSON body and hands back the status and decoded reply
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse>;
}

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kotoba/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.json(&request.body).send().await?;
        let status = response.status().as_u16();
        let data = decode_body(response.text().await?);

        Ok(HttpResponse { status, data })
    }
}

/// Bodies that aren't JSON (gateway error pages, plain-text errors) are kept as a string
fn decode_body(text: String) -> Value {
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => Value::String(text),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f64,
    top_p: f64,
    frequency_penalty: f64,
    presence_penalty: f64,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

/// Sends one chat-completion request per call; no retries, no streaming
pub struct Dispatcher<'a, T: Transport + ?Sized> {
    transport: &'a T,
    localizer: Localizer,
}

impl<'a, T: Transport + ?Sized> Dispatcher<'a, T> {
    pub fn new(transport: &'a T, localizer: Localizer) -> Self {
        Self {
            transport,
            localizer,
        }
    }

    pub async fn send(
        &self,
        provider: &ProviderConfig,
        api_key: &str,
        model: &str,
        messages: &[Message],
        wants_json: bool,
    ) -> Result<Value> {
        let request = build_request(provider, api_key, model, messages, wants_json)?;

        debug!(
            "Sending {} request to: {} (model {}, json mode {})",
            provider.display_name,
            request.url,
            model,
            request.body.get("response_format").is_some()
        );

        let response = self.transport.post(request).await.map_err(|e| {
            let reason = e.to_string();
            KotobaError::ProviderRequest(
                self.localizer
                    .get("request_failed", &[provider.display_name, reason.as_str()]),
            )
        })?;

        if !response.ok() {
            let body = match &response.data {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            return Err(KotobaError::Http {
                status: response.status,
                body,
            });
        }

        debug!("Raw {} response: {}", provider.display_name, response.data);
        Ok(response.data)
    }
}

fn build_request(
    provider: &ProviderConfig,
    api_key: &str,
    model: &str,
    messages: &[Message],
    wants_json: bool,
) -> Result<HttpRequest> {
    let body = ChatRequest {
        model: model.trim(),
        messages,
        temperature: TEMPERATURE,
        top_p: TOP_P,
        frequency_penalty: 0.0,
        presence_penalty: 0.0,
        max_tokens: MAX_TOKENS,
        response_format: (wants_json && provider.json_mode)
            .then(|| json!({"type": "json_object"})),
    };

    Ok(HttpRequest {
        url: provider.url.clone(),
        headers: vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {}", api_key)),
        ],
        body: serde_json::to_value(&body)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;

    fn provider(name: &str) -> ProviderConfig {
        ProviderConfig::lookup(name).unwrap()
    }

    fn messages() -> Vec<Message> {
        vec![Message::system("be a translator"), Message::user("hello")]
    }

    #[test]
    fn test_request_body_shape() {
        let request =
            build_request(&provider("deepseek"), "sk-1", " deepseek-chat ", &messages(), false)
                .unwrap();
        assert_eq!(request.url, "https://api.deepseek.com/chat/completions");
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "Bearer sk-1".to_string())));

        let body = request.body;
        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["frequency_penalty"], 0.0);
        assert_eq!(body["presence_penalty"], 0.0);
        assert_eq!(body["temperature"], 0.1);
        assert_eq!(body["top_p"], 0.99);
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_response_format_needs_json_and_provider_support() {
        let json_capable = provider("siliconflow");
        let with_json = build_request(&json_capable, "k", "m", &messages(), true).unwrap();
        assert_eq!(with_json.body["response_format"], json!({"type": "json_object"}));

        let text_only = build_request(&json_capable, "k", "m", &messages(), false).unwrap();
        assert!(text_only.body.get("response_format").is_none());

        let unsupported = build_request(&provider("deepseek"), "k", "m", &messages(), true).unwrap();
        assert!(unsupported.body.get("response_format").is_none());
    }

    #[test]
    fn test_non_json_body_is_kept_as_text() {
        assert_eq!(
            decode_body(r#"{"choices": []}"#.to_string()),
            json!({"choices": []})
        );
        assert_eq!(
            decode_body("<html>502 Bad Gateway</html>".to_string()),
            Value::String("<html>502 Bad Gateway</html>".to_string())
        );
        assert_eq!(decode_body(String::new()), Value::String(String::new()));
    }

    #[tokio::test]
    async fn test_send_returns_payload_on_success() {
        let mut transport = MockTransport::new();
        transport.expect_post().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 200,
                data: json!({"choices": [{"message": {"content": "hi"}}]}),
            })
        });

        let dispatcher = Dispatcher::new(&transport, Localizer::new(Locale::En));
        let payload = dispatcher
            .send(&provider("deepseek"), "k", "deepseek-chat", &messages(), false)
            .await
            .unwrap();
        assert_eq!(payload["choices"][0]["message"]["content"], "hi");
    }

    #[tokio::test]
    async fn test_send_non_success_is_http_error() {
        let mut transport = MockTransport::new();
        transport.expect_post().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 401,
                data: json!({"error": {"message": "invalid key"}}),
            })
        });

        let dispatcher = Dispatcher::new(&transport, Localizer::new(Locale::En));
        let err = dispatcher
            .send(&provider("deepseek"), "k", "deepseek-chat", &messages(), false)
            .await
            .unwrap_err();
        match err {
            KotobaError::Http { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_wrapped_with_provider_name() {
        let mut transport = MockTransport::new();
        transport
            .expect_post()
            .times(1)
            .returning(|_| Err(KotobaError::Validation("connection reset".to_string())));

        let dispatcher = Dispatcher::new(&transport, Localizer::new(Locale::En));
        let err = dispatcher
            .send(&provider("siliconflow"), "k", "m", &messages(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, KotobaError::ProviderRequest(_)));
        assert_eq!(
            err.to_string(),
            "SiliconFlow API request failed: connection reset"
        );
    }
}
