use std::collections::HashMap;
use std::net::SocketAddr;

use axum::http::StatusCode;
use pages::StatusMessages;

#[derive(Debug, thiserror::Error)]
pub enum ConfigBuildError {
    #[error("Failed to collect config items: {0}")]
    FailedToCollect(::config::ConfigError),
    #[error("Failed to deserialize config file: {0}")]
    FailedToDeserialize(::config::ConfigError),
    #[error("[messages] key is not a status code: {0:?}")]
    InvalidStatusCode(String),
}

#[derive(Debug, serde::Deserialize)]
pub struct AppConfig {
    /// Address the server listens on.
    #[serde(default = "AppConfig::default_bind_address")]
    pub bind_address: SocketAddr,

    /// Message text overrides keyed by status code, merged over the standard
    /// reason phrases. Keys are strings because TOML table keys are.
    #[serde(default)]
    pub messages: HashMap<String, String>,

    /// HTML body served for 404s instead of the plain-text page.
    #[serde(default)]
    pub not_found: Option<String>,
}

impl AppConfig {
    fn default_bind_address() -> SocketAddr {
        "127.0.0.1:8080".parse().expect("static address parses")
    }

    /// The message table this config describes.
    pub fn status_messages(&self) -> Result<StatusMessages, ConfigBuildError> {
        let mut messages = StatusMessages::standard();
        for (code, text) in &self.messages {
            let parsed = code
                .parse::<u16>()
                .ok()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .ok_or_else(|| ConfigBuildError::InvalidStatusCode(code.clone()))?;
            messages.insert(parsed, text.clone());
        }
        Ok(messages)
    }

    /// Creates a testing AppConfig.
    pub fn build_for_test() -> AppConfig {
        AppConfig {
            bind_address: Self::default_bind_address(),
            messages: HashMap::new(),
            not_found: None,
        }
    }

    pub fn build() -> Result<AppConfig, ConfigBuildError> {
        let config_unparsed = ::config::Config::builder()
            .add_source(
                ::config::File::new("status-pages.toml", ::config::FileFormat::Toml)
                    .required(false),
            )
            // e.g. STATUS_PAGES_BIND_ADDRESS
            .add_source(::config::Environment::with_prefix("STATUS_PAGES"))
            .build()
            .map_err(ConfigBuildError::FailedToCollect)?;

        config_unparsed
            .try_deserialize()
            .map_err(ConfigBuildError::FailedToDeserialize)
    }
}
