//! Client configuration
//!
//! Built once per client and read for every request. The zone defaults are
//! not part of it; they live on the client and change through its setters.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default gateway endpoint.
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.autodns.com/";
/// Default response language.
pub const DEFAULT_LANGUAGE: &str = "en";
/// Default authentication context.
pub const DEFAULT_CONTEXT: &str = "1";

/// Environment variable that switches the HTTP transport into fixture-recording mode.
pub const RECORD_MODE_ENV: &str = "AUTODNS_RECORD_MODE";

/// 默认连接超时（毫秒）
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// 默认请求超时（毫秒）
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Gateway credentials sent in every request's `auth` block.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayAuth {
    pub user: String,
    pub password: String,
    #[serde(default = "default_context")]
    pub context: String,
}

impl fmt::Debug for GatewayAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayAuth")
            .field("user", &self.user)
            .field("password", &"***")
            .field("context", &self.context)
            .finish()
    }
}

/// Connection and authentication settings for one gateway client.
///
/// # Default values
///
/// | Field | Default |
/// |-------|---------|
/// | `url` | `https://gateway.autodns.com/` |
/// | `language` | `en` |
/// | `auth.context` | `1` |
/// | `connect_timeout_ms` | 10000 |
/// | `request_timeout_ms` | 30000 |
/// | `record_mode` | `AUTODNS_RECORD_MODE=record` |
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub auth: GatewayAuth,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
    /// Send requests without `Accept-Encoding` so recorded fixtures stay readable.
    #[serde(default = "record_mode_from_env")]
    pub record_mode: bool,
}

fn default_url() -> String {
    DEFAULT_GATEWAY_URL.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

const fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

const fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Whole milliseconds of `duration`, saturating at `u64::MAX`.
fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Whether [`RECORD_MODE_ENV`] asks for fixture recording.
pub fn record_mode_from_env() -> bool {
    std::env::var(RECORD_MODE_ENV).is_ok_and(|mode| mode == "record")
}

impl ClientConfig {
    /// Creates a configuration with default settings for the given credentials.
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self::builder(user, password).build()
    }

    /// Returns a builder for customizing the configuration.
    pub fn builder(user: impl Into<String>, password: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(user.into(), password.into())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Builder for [`ClientConfig`].
pub struct ClientConfigBuilder {
    url: String,
    language: String,
    user: String,
    password: String,
    context: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    record_mode: Option<bool>,
}

impl ClientConfigBuilder {
    fn new(user: String, password: String) -> Self {
        Self {
            url: default_url(),
            language: default_language(),
            user,
            password,
            context: default_context(),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            record_mode: None,
        }
    }

    /// Set the gateway URL (default: `https://gateway.autodns.com/`).
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the response language (default: `en`).
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the authentication context (default: `1`).
    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Set the connect and request timeouts of the HTTP transport.
    #[must_use]
    pub fn timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }

    /// Override the recording flag instead of reading [`RECORD_MODE_ENV`].
    #[must_use]
    pub fn record_mode(mut self, enabled: bool) -> Self {
        self.record_mode = Some(enabled);
        self
    }

    /// Build the [`ClientConfig`] instance.
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            url: self.url,
            language: self.language,
            auth: GatewayAuth {
                user: self.user,
                password: self.password,
                context: self.context,
            },
            connect_timeout_ms: duration_millis(self.connect_timeout),
            request_timeout_ms: duration_millis(self.request_timeout),
            record_mode: self.record_mode.unwrap_or_else(record_mode_from_env),
        }
    }
}
