//! AutoDNS gateway client

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::defaults::{ZoneDefaults, build_main_record, build_nameservers, build_soa_policy};
use crate::error::{GatewayError, GatewayFault, Result};
use crate::transport::{GatewayTransport, HttpTransport};
use crate::types::{
    GatewayResult, MainInput, NameserverInput, NsAction, RequestEnvelope, ResourceRecord,
    SoaInput,
};
use crate::xml::{self, XmlNode};
use crate::zone::build_zone;

/// Root element of gateway requests.
const REQUEST_ROOT: &str = "request";
/// Root element of gateway responses.
const RESPONSE_ROOT: &str = "response";

/// Client for one gateway account.
///
/// Zone defaults are set through `&mut self` setters before the client is
/// shared; zone creation only needs `&self`.
///
/// # Construction
///
/// ```rust,no_run
/// use autodns_gateway::{AutoDnsClient, ClientConfig, SoaInput};
///
/// # fn main() -> autodns_gateway::Result<()> {
/// let mut client = AutoDnsClient::new(ClientConfig::new("user", "password"))?;
/// client.set_zone_soa(&SoaInput::default());
/// client.set_zone_nameservers(&["a.ns14.net".into(), "b.ns14.net".into()]);
/// # Ok(())
/// # }
/// ```
pub struct AutoDnsClient {
    config: ClientConfig,
    transport: Arc<dyn GatewayTransport>,
    zone_defaults: Option<ZoneDefaults>,
}

impl AutoDnsClient {
    /// Creates a client that talks to the gateway over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client on top of a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn GatewayTransport>) -> Self {
        Self {
            config,
            transport,
            zone_defaults: None,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The zone defaults set so far, if any.
    pub fn zone_defaults(&self) -> Option<&ZoneDefaults> {
        self.zone_defaults.as_ref()
    }

    fn zone_defaults_mut(&mut self) -> &mut ZoneDefaults {
        self.zone_defaults.get_or_insert_with(ZoneDefaults::default)
    }

    // ==================== Zone defaults ====================

    /// Sets the SOA section used for every zone created afterwards.
    pub fn set_zone_soa(&mut self, soa: &SoaInput) {
        let policy = build_soa_policy(soa);
        log::debug!("[autodns] Zone SOA default: level {}", policy.level.wire_value());
        self.zone_defaults_mut().soa = Some(policy);
    }

    /// Replaces the nameserver list used for every zone created afterwards.
    pub fn set_zone_nameservers(&mut self, nameservers: &[NameserverInput]) {
        let servers = build_nameservers(nameservers);
        log::debug!("[autodns] Zone nameserver default: {} entries", servers.len());
        self.zone_defaults_mut().nserver = Some(servers);
    }

    /// Sets the main (apex) record used for every zone created afterwards.
    pub fn set_zone_main(&mut self, main: &MainInput) {
        self.zone_defaults_mut().main = Some(build_main_record(main));
    }

    /// Overrides the `ns_action` of every zone created afterwards (default: `complete`).
    pub fn set_zone_ns_action(&mut self, ns_action: NsAction) {
        self.zone_defaults_mut().ns_action = ns_action;
    }

    // ==================== Gateway pipeline ====================

    /// Sends one request and returns the `response` node.
    ///
    /// Transport and codec errors are returned unchanged.
    pub async fn request(&self, envelope: &RequestEnvelope) -> Result<XmlNode> {
        let payload = xml::to_string(REQUEST_ROOT, &envelope.to_xml().into())?;
        let response_text = self
            .transport
            .post_xml(&self.config.url, payload)
            .await
            .inspect_err(|e| {
                if e.is_transport() {
                    log::warn!("[autodns] Request failed: {e}");
                } else {
                    log::error!("[autodns] Request failed: {e}");
                }
            })?;

        let (root, response) = xml::parse(&response_text).inspect_err(|e| {
            log::error!("[autodns] XML parse failed: {e}");
        })?;

        if root != RESPONSE_ROOT {
            return Err(GatewayError::ParseError {
                detail: format!("expected <{RESPONSE_ROOT}> root element, got <{root}>"),
            });
        }

        match response.first() {
            Some(xml::XmlValue::Node(node)) => Ok(node.clone()),
            _ => Err(GatewayError::ParseError {
                detail: format!("<{RESPONSE_ROOT}> has no child elements"),
            }),
        }
    }

    // ==================== Zone tasks ====================

    /// Creates a zone with the given records and the stored zone defaults.
    ///
    /// Fails without sending anything when the zone lacks a section its
    /// `ns_action` requires. A result with status type `error` is returned as
    /// [`GatewayError::Gateway`], which keeps the raw result.
    pub async fn create_zone(
        &self,
        name: &str,
        records: Option<&[ResourceRecord]>,
    ) -> Result<GatewayResult> {
        let zone = build_zone(name, records, self.zone_defaults.as_ref())?;
        let envelope = RequestEnvelope::create_zone(&self.config, zone);

        let response = self.request(&envelope).await?;
        let result_node = response.node("result").ok_or_else(|| GatewayError::ParseError {
            detail: "response is missing <result>".to_string(),
        })?;

        classify(GatewayResult::from_xml(result_node)?)
    }

    /// Not implemented; no request is sent.
    pub async fn update_zone(
        &self,
        _name: &str,
        _records: Option<&[ResourceRecord]>,
    ) -> Result<GatewayResult> {
        Err(GatewayError::Unsupported {
            operation: "update_zone",
        })
    }

    /// Not implemented; no request is sent.
    pub async fn delete_zone(&self, _name: &str) -> Result<GatewayResult> {
        Err(GatewayError::Unsupported {
            operation: "delete_zone",
        })
    }
}

/// Turns an `error` status into a [`GatewayFault`].
///
/// Message fields come from the first `msg`, falling back to the status code
/// and text when the gateway sent none.
fn classify(result: GatewayResult) -> Result<GatewayResult> {
    if !result.is_error() {
        return Ok(result);
    }

    let (code, text, object) = match &result.msg {
        Some(msg) => (msg.code.clone(), msg.text.clone(), msg.object.clone()),
        None => (
            result.status.code.clone().unwrap_or_default(),
            result.status.text.clone().unwrap_or_default(),
            None,
        ),
    };
    log::warn!("[autodns] Gateway error {code}: {text}");

    Err(GatewayError::Gateway(Box::new(GatewayFault {
        code,
        text,
        object,
        result,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResultStatus, SoaLevel};

    fn client() -> AutoDnsClient {
        let config = ClientConfig::builder("user", "secret").record_mode(false).build();
        AutoDnsClient::new(config).unwrap()
    }

    fn result(status_type: &str) -> GatewayResult {
        GatewayResult {
            status: ResultStatus {
                status_type: status_type.to_string(),
                code: Some("E0201".to_string()),
                text: Some("Zone could not be created".to_string()),
            },
            msg: None,
            data: None,
            raw: XmlNode::new(),
        }
    }

    #[test]
    fn no_defaults_until_a_setter_runs() {
        assert!(client().zone_defaults().is_none());
    }

    #[test]
    fn nameserver_setter_creates_complete_defaults() {
        let mut client = client();
        client.set_zone_nameservers(&["a.ns14.net".into()]);
        let defaults = client.zone_defaults().unwrap();
        assert_eq!(defaults.ns_action, NsAction::Complete);
        assert!(defaults.soa.is_none());
        assert_eq!(defaults.nserver.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn setters_overwrite_only_their_field() {
        let mut client = client();
        client.set_zone_soa(&SoaInput::default());
        client.set_zone_nameservers(&["a.ns14.net".into(), "b.ns14.net".into()]);
        client.set_zone_ns_action(NsAction::Primary);
        client.set_zone_soa(&SoaInput {
            level: Some(5),
            ..Default::default()
        });
        client.set_zone_nameservers(&["c.ns14.net".into()]);

        let defaults = client.zone_defaults().unwrap();
        assert_eq!(defaults.ns_action, NsAction::Primary);
        assert_eq!(
            defaults.soa.as_ref().map(|soa| soa.level),
            Some(SoaLevel::Explicit(5))
        );
        let names: Vec<_> = defaults
            .nserver
            .iter()
            .flatten()
            .map(|ns| ns.name.as_str())
            .collect();
        assert_eq!(names, vec!["c.ns14.net"]);
    }

    #[test]
    fn main_setter_defaults_ttl() {
        let mut client = client();
        client.set_zone_main(&"192.0.2.1".into());
        let main = client.zone_defaults().unwrap().main.clone().unwrap();
        assert_eq!(main.ttl, 86_400);
    }

    #[test]
    fn classify_success_passes_through() {
        let ok = classify(result("success")).unwrap();
        assert_eq!(ok.status.status_type, "success");
    }

    #[test]
    fn classify_error_without_msg_uses_status() {
        let err = classify(result("error")).unwrap_err();
        let fault = err.as_fault().unwrap();
        assert_eq!(fault.code, "E0201");
        assert_eq!(fault.text, "Zone could not be created");
        assert_eq!(fault.object, None);
        assert_eq!(fault.result, result("error"));
    }

    #[tokio::test]
    async fn stubs_send_nothing() {
        let client = client();
        assert!(matches!(
            client.update_zone("example.com", None).await,
            Err(GatewayError::Unsupported {
                operation: "update_zone"
            })
        ));
        assert!(matches!(
            client.delete_zone("example.com").await,
            Err(GatewayError::Unsupported {
                operation: "delete_zone"
            })
        ));
    }
}
