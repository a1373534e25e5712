//! # autodns-gateway
//!
//! Client for the AutoDNS XML gateway. It turns simplified zone input into
//! the gateway's XML request schema, sends the request and classifies the
//! response.
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use autodns_gateway::{
//!     AutoDnsClient, ClientConfig, GatewayError, NameserverInput, ResourceRecord, SoaInput,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Configure the client once
//!     let mut client = AutoDnsClient::new(ClientConfig::new("user", "password"))?;
//!
//!     // 2. Store zone defaults reused by every zone
//!     client.set_zone_soa(&SoaInput {
//!         ttl: Some(3600),
//!         email: Some("hostmaster@example.com".to_string()),
//!         ..Default::default()
//!     });
//!     client.set_zone_nameservers(&[
//!         NameserverInput::from("a.ns14.net"),
//!         NameserverInput::from("b.ns14.net"),
//!     ]);
//!
//!     // 3. Create a zone
//!     let records = [ResourceRecord::new("www", "A", "192.0.2.1")];
//!     match client.create_zone("example.com", Some(&records[..])).await {
//!         Ok(result) => println!("{:?}", result.status),
//!         Err(GatewayError::Gateway(fault)) => {
//!             println!("{} {} ({:?})", fault.code, fault.text, fault.object);
//!         }
//!         Err(e) => return Err(e.into()),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, GatewayError>`](GatewayError):
//!
//! - [`GatewayError::MissingZoneSection`] — the zone lacks SOA or nameservers; nothing was sent
//! - [`GatewayError::NetworkError`], [`GatewayError::Timeout`], [`GatewayError::HttpStatus`] — transport failures
//! - [`GatewayError::ParseError`] — the response is not a valid gateway response
//! - [`GatewayError::Gateway`] — the gateway reported an error; the raw result is attached
//!
//! Nothing is retried.

mod client;
mod config;
mod defaults;
mod error;
mod transport;
mod types;
mod utils;
mod zone;

pub mod xml;

pub use client::AutoDnsClient;
pub use config::{
    ClientConfig, ClientConfigBuilder, DEFAULT_CONTEXT, DEFAULT_GATEWAY_URL, DEFAULT_LANGUAGE,
    GatewayAuth, RECORD_MODE_ENV,
};
pub use defaults::{
    DEFAULT_MAIN_TTL, DEFAULT_SOA_EXPIRE, DEFAULT_SOA_REFRESH, DEFAULT_SOA_RETRY,
    DEFAULT_SOA_TTL, ZoneDefaults, build_main_record, build_nameservers, build_soa_policy,
};
pub use error::{GatewayError, GatewayFault, Result};
pub use transport::{GatewayTransport, HttpTransport, XML_CONTENT_TYPE};
pub use types::{
    CREATE_ZONE_TASK, GatewayMessage, GatewayResult, MainInput, MainRecord, Nameserver,
    NameserverInput, NsAction, RequestEnvelope, ResourceRecord, ResultStatus, Rr, SoaInput,
    SoaLevel, SoaPolicy, Task, Zone, ZoneSection,
};
pub use zone::{build_zone, validate_zone};
