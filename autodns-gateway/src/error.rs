use thiserror::Error;

use crate::types::{GatewayResult, NsAction, ZoneSection};

/// A business-level error reported by the gateway (`status.type == "error"`).
///
/// Carries the gateway's message fields together with the full parsed result,
/// which is kept for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayFault {
    /// Gateway-assigned message code (e.g. `EF02020`).
    pub code: String,
    /// Human-readable message text.
    pub text: String,
    /// Identifier of the object the message refers to, if reported.
    pub object: Option<String>,
    /// The raw `result` node the fault was classified from.
    pub result: GatewayResult,
}

/// Unified error type for all gateway operations.
///
/// The variants fall into four groups:
/// - local validation before anything is sent ([`MissingZoneSection`](Self::MissingZoneSection))
/// - transport failures ([`NetworkError`](Self::NetworkError), [`Timeout`](Self::Timeout),
///   [`HttpStatus`](Self::HttpStatus))
/// - codec failures ([`ParseError`](Self::ParseError),
///   [`SerializationError`](Self::SerializationError))
/// - gateway-reported errors ([`Gateway`](Self::Gateway))
///
/// None of them is retried by this crate.
#[derive(Error, Debug, Clone)]
pub enum GatewayError {
    /// A section the gateway requires for this `ns_action` is missing from the zone.
    ///
    /// Raised before any request is sent.
    #[error("Missing {section} for \"{ns_action}\" ns_action")]
    MissingZoneSection {
        /// The section that is missing.
        section: ZoneSection,
        /// The `ns_action` that requires it.
        ns_action: NsAction,
    },

    /// A network-level error occurred (DNS resolution failure, connection refused, TLS, etc.).
    #[error("Network error: {detail}")]
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    #[error("Request timeout: {detail}")]
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The gateway answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body as received.
        body: String,
    },

    /// The response body is not a well-formed gateway response.
    #[error("Parse error: {detail}")]
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to render the request body.
    #[error("Serialization error: {detail}")]
    SerializationError {
        /// Details about the serialization failure.
        detail: String,
    },

    /// The gateway processed the request and reported an error.
    #[error("Gateway error {}: {}", .0.code, .0.text)]
    Gateway(Box<GatewayFault>),

    /// The operation is declared but not implemented by this client.
    #[error("Operation not supported: {operation}")]
    Unsupported {
        /// Name of the operation.
        operation: &'static str,
    },
}

impl GatewayError {
    /// Whether the failure happened before a request reached the gateway's business logic.
    ///
    /// Picks the log level of failed requests; nothing is retried.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::HttpStatus { .. }
        )
    }

    /// Returns the gateway fault if this error was reported by the gateway.
    #[must_use]
    pub fn as_fault(&self) -> Option<&GatewayFault> {
        match self {
            Self::Gateway(fault) => Some(fault),
            _ => None,
        }
    }

    /// Returns the raw gateway result attached to a gateway-reported error.
    #[must_use]
    pub fn raw_result(&self) -> Option<&GatewayResult> {
        self.as_fault().map(|fault| &fault.result)
    }
}

/// Convenience type alias for `Result<T, GatewayError>`.
pub type Result<T> = std::result::Result<T, GatewayError>;
