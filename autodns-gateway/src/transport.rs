//! HTTP transport for gateway requests
//!
//! The gateway takes every task as a single XML `POST` to one URL. The
//! [`GatewayTransport`] trait is the seam between the request pipeline and
//! the network; [`HttpTransport`] is the reqwest implementation.
//!
//! # design principles
//! - **One attempt per call** - failures are returned to the caller as-is, never retried
//! - **No body interpretation** - the transport only hands back response text

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::ClientConfig;
use crate::error::{GatewayError, Result};
use crate::utils::log_sanitizer::{sanitize_request, truncate_for_log};

/// Content type of gateway requests.
pub const XML_CONTENT_TYPE: &str = "application/xml";

/// Sends one XML request and returns the raw response body.
#[async_trait]
pub trait GatewayTransport: Send + Sync {
    async fn post_xml(&self, url: &str, body: String) -> Result<String>;
}

/// reqwest-backed [`GatewayTransport`].
pub struct HttpTransport {
    client: Client,
    record_mode: bool,
}

impl HttpTransport {
    /// Creates the HTTP client with the configured timeouts.
    ///
    /// In recording mode response compression is disabled, so requests go
    /// out without an `Accept-Encoding` header.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout());
        if config.record_mode {
            builder = builder.no_gzip();
        }

        let client = builder.build().map_err(|e| GatewayError::NetworkError {
            detail: format!("Failed to create HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            record_mode: config.record_mode,
        })
    }

    /// Whether requests are sent in fixture-recording mode.
    pub fn record_mode(&self) -> bool {
        self.record_mode
    }
}

#[async_trait]
impl GatewayTransport for HttpTransport {
    async fn post_xml(&self, url: &str, body: String) -> Result<String> {
        log::debug!("[autodns] POST {url}");
        log::debug!("[autodns] Request Body: {}", sanitize_request(&body));

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout {
                        detail: e.to_string(),
                    }
                } else {
                    GatewayError::NetworkError {
                        detail: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        log::debug!("[autodns] Response Status: {status}");

        let response_text = response
            .text()
            .await
            .map_err(|e| GatewayError::NetworkError {
                detail: format!("Failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            log::warn!("[autodns] HTTP {}", status.as_u16());
            return Err(GatewayError::HttpStatus {
                status: status.as_u16(),
                body: response_text,
            });
        }

        log::debug!(
            "[autodns] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok(response_text)
    }
}
