use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::GatewayAuth;
use crate::error::{GatewayError, Result};
use crate::xml::{TEXT_KEY, XmlNode, XmlValue};

/// Gateway task code for "create zone".
pub const CREATE_ZONE_TASK: &str = "0201";

// ============ Zone provisioning ============

/// Zone provisioning mode, deciding which zone sections the gateway requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NsAction {
    /// The gateway provisions the zone on its own nameservers; SOA and nameservers required.
    #[default]
    Complete,
    /// Primary zone; SOA and nameservers required.
    Primary,
    /// Zone data only, no nameserver provisioning.
    None,
}

impl NsAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Primary => "primary",
            Self::None => "none",
        }
    }

    /// Whether zones with this action must carry SOA and nameserver sections.
    pub fn requires_soa_and_nameservers(self) -> bool {
        matches!(self, Self::Complete | Self::Primary)
    }
}

impl fmt::Display for NsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zone section checked before a zone is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneSection {
    Soa,
    Nameservers,
}

impl fmt::Display for ZoneSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soa => f.write_str("SOA"),
            Self::Nameservers => f.write_str("nameservers"),
        }
    }
}

// ============ SOA ============

/// Simplified SOA settings supplied by the caller.
///
/// A numeric field set to `0` counts as not supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoaInput {
    /// Explicit SOA level; when set, the gateway applies it as-is.
    pub level: Option<u32>,
    pub ttl: Option<u32>,
    pub refresh: Option<u32>,
    pub retry: Option<u32>,
    pub expire: Option<u32>,
    /// Copied whenever present, including `false`.
    pub ignore: Option<bool>,
    /// Hostmaster address; copied whenever present, including an empty string.
    pub email: Option<String>,
}

/// How the gateway determines the SOA timing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoaLevel {
    /// Level chosen by the caller.
    Explicit(u32),
    /// Timing values come from the request (`level = 0`).
    Custom,
    /// The gateway computes the SOA (`level = 1`).
    Auto,
}

impl SoaLevel {
    pub fn wire_value(self) -> String {
        match self {
            Self::Explicit(level) => level.to_string(),
            Self::Custom => "0".to_string(),
            Self::Auto => "1".to_string(),
        }
    }
}

/// SOA section of a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaPolicy {
    pub level: SoaLevel,
    pub ttl: Option<u32>,
    pub refresh: Option<u32>,
    pub retry: Option<u32>,
    pub expire: Option<u32>,
    pub ignore: Option<bool>,
    pub email: Option<String>,
}

impl SoaPolicy {
    pub fn to_xml(&self) -> XmlNode {
        XmlNode::new()
            .with("level", self.level.wire_value())
            .with_opt("ttl", self.ttl)
            .with_opt("refresh", self.refresh)
            .with_opt("retry", self.retry)
            .with_opt("expire", self.expire)
            .with_opt("ignore", self.ignore)
            .with_opt("email", self.email.clone())
    }
}

// ============ Nameservers ============

/// A nameserver as supplied by the caller: a bare host name or a name with TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NameserverInput {
    Name(String),
    Entry { name: String, ttl: Option<u32> },
}

impl From<&str> for NameserverInput {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for NameserverInput {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

/// Nameserver entry of a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nameserver {
    pub name: String,
    pub ttl: Option<u32>,
}

impl Nameserver {
    pub fn to_xml(&self) -> XmlNode {
        XmlNode::new()
            .with("name", self.name.as_str())
            .with_opt("ttl", self.ttl)
    }
}

// ============ Main record ============

/// Main (apex) address of a zone as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MainInput {
    Value(String),
    Entry { value: String, ttl: Option<u32> },
}

impl From<&str> for MainInput {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

/// Main section of a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainRecord {
    pub value: String,
    pub ttl: u32,
}

impl MainRecord {
    pub fn to_xml(&self) -> XmlNode {
        XmlNode::new()
            .with("value", self.value.as_str())
            .with("ttl", self.ttl)
    }
}

// ============ Resource records ============

/// A resource record as supplied by the caller.
///
/// Record values are passed through untouched; the gateway validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    /// MX/SRV preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl ResourceRecord {
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            priority: None,
            ttl: None,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }
}

/// Resource record in the gateway's wire form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rr {
    pub name: String,
    pub record_type: String,
    pub value: String,
    pub pref: Option<u32>,
    pub ttl: Option<u32>,
}

impl From<&ResourceRecord> for Rr {
    fn from(record: &ResourceRecord) -> Self {
        Self {
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            value: record.value.clone(),
            pref: record.priority,
            ttl: record.ttl,
        }
    }
}

impl Rr {
    pub fn to_xml(&self) -> XmlNode {
        XmlNode::new()
            .with("name", self.name.as_str())
            .with("type", self.record_type.as_str())
            .with("value", self.value.as_str())
            .with_opt("pref", self.pref)
            .with_opt("ttl", self.ttl)
    }
}

// ============ Zone & envelope ============

/// The `zone` node of a zone task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub name: String,
    pub ns_action: NsAction,
    pub rr: Option<Vec<Rr>>,
    pub main: Option<MainRecord>,
    pub soa: Option<SoaPolicy>,
    pub nserver: Option<Vec<Nameserver>>,
}

impl Zone {
    pub fn to_xml(&self) -> XmlNode {
        XmlNode::new()
            .with("name", self.name.as_str())
            .with("ns_action", self.ns_action.as_str())
            .with_opt(
                "rr",
                self.rr
                    .as_ref()
                    .map(|records| records.iter().map(Rr::to_xml).collect::<Vec<_>>()),
            )
            .with_opt("main", self.main.as_ref().map(MainRecord::to_xml))
            .with_opt("soa", self.soa.as_ref().map(SoaPolicy::to_xml))
            .with_opt(
                "nserver",
                self.nserver
                    .as_ref()
                    .map(|servers| servers.iter().map(Nameserver::to_xml).collect::<Vec<_>>()),
            )
    }
}

/// A gateway task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub code: &'static str,
    pub zone: Zone,
}

/// Content of the `request` root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestEnvelope {
    pub auth: GatewayAuth,
    pub language: String,
    pub task: Task,
}

impl RequestEnvelope {
    pub fn to_xml(&self) -> XmlNode {
        let auth = XmlNode::new()
            .with("user", self.auth.user.as_str())
            .with("password", self.auth.password.as_str())
            .with("context", self.auth.context.as_str());
        let task = XmlNode::new()
            .with("code", self.task.code)
            .with("zone", self.task.zone.to_xml());

        XmlNode::new()
            .with("auth", auth)
            .with("language", self.language.as_str())
            .with("task", task)
    }
}

// ============ Response ============

/// The `status` node of a gateway result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultStatus {
    /// `success`, `error`, `notify`, ...
    pub status_type: String,
    pub code: Option<String>,
    pub text: Option<String>,
}

/// The first `msg` node of a gateway result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayMessage {
    pub code: String,
    pub text: String,
    /// Identifier of the object the message refers to.
    pub object: Option<String>,
}

/// Parsed `result` node of a gateway response.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResult {
    pub status: ResultStatus,
    pub msg: Option<GatewayMessage>,
    /// Operation-specific payload.
    pub data: Option<XmlValue>,
    /// The complete `result` node as received.
    pub raw: XmlNode,
}

impl GatewayResult {
    /// Reads a `result` node.
    pub fn from_xml(node: &XmlNode) -> Result<Self> {
        let status = node
            .node("status")
            .ok_or_else(|| missing_element("result.status"))?;
        let status_type = status
            .text("type")
            .ok_or_else(|| missing_element("result.status.type"))?;

        let msg = node.node("msg").map(|msg| GatewayMessage {
            code: msg.text("code").unwrap_or_default().to_string(),
            text: msg.text("text").unwrap_or_default().to_string(),
            object: msg.get("object").and_then(object_identifier),
        });

        Ok(Self {
            status: ResultStatus {
                status_type: status_type.to_string(),
                code: status.text("code").map(str::to_string),
                text: status.text("text").map(str::to_string),
            },
            msg,
            data: node.get("data").cloned(),
            raw: node.clone(),
        })
    }

    pub fn is_error(&self) -> bool {
        self.status.status_type == "error"
    }
}

fn missing_element(path: &str) -> GatewayError {
    GatewayError::ParseError {
        detail: format!("response is missing <{path}>"),
    }
}

/// Accepts both `<object>name</object>` and `<object><type/><value>name</value></object>`.
fn object_identifier(object: &XmlValue) -> Option<String> {
    match object.first()? {
        XmlValue::Text(text) => Some(text.clone()),
        XmlValue::Node(node) => node
            .text("value")
            .or_else(|| node.text(TEXT_KEY))
            .map(str::to_string),
        XmlValue::List(_) => None,
    }
}
