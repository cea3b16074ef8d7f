use thiserror::Error;

#[derive(Error, Debug)]
pub enum KotobaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Rejected input, raised before any network call
    #[error("{0}")]
    Validation(String),

    /// Non-success status from the provider, with the raw body
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("{0}")]
    MalformedResponse(String),

    /// Transport-level failure wrapped with the provider's name
    #[error("{0}")]
    ProviderRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, KotobaError>;
