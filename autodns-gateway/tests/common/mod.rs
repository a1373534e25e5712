//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::VecDeque;
use std::env;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use autodns_gateway::{
    AutoDnsClient, ClientConfig, GatewayError, GatewayTransport, NameserverInput, Result,
    SoaInput,
};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Gateway URL used by scripted clients.
pub const TEST_URL: &str = "https://gateway.test/";

pub const SUCCESS_RESPONSE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
<response><result><data><zone><name>example.com</name></zone></data>\
<status><code>S0201</code><text>Die Zone wurde erfolgreich angelegt.</text><type>success</type></status>\
</result><stid>20260101-app1-1</stid></response>";

pub const ERROR_RESPONSE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
<response><result><data/>\
<msg><text>bad zone</text><code>X1</code><type>error</type><object>example.com</object></msg>\
<status><code>E0201</code><type>error</type></status>\
</result><stid>20260101-app1-2</stid></response>";

/// In-memory transport: replays canned replies and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<String>>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(self: &Arc<Self>, body: &str) -> Arc<Self> {
        self.push(Ok(body.to_string()));
        Arc::clone(self)
    }

    pub fn fail(self: &Arc<Self>, error: GatewayError) -> Arc<Self> {
        self.push(Err(error));
        Arc::clone(self)
    }

    fn push(&self, reply: Result<String>) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// All requests sent so far as `(url, body)`.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GatewayTransport for ScriptedTransport {
    async fn post_xml(&self, url: &str, body: String) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((url.to_string(), body));
        }
        self.replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front())
            .unwrap_or_else(|| {
                Err(GatewayError::NetworkError {
                    detail: "no scripted reply left".to_string(),
                })
            })
    }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::builder("test-user", "test-password")
        .url(TEST_URL)
        .context("4")
        .record_mode(false)
        .build()
}

/// Client on a scripted transport, without zone defaults.
pub fn scripted_client(transport: &Arc<ScriptedTransport>) -> AutoDnsClient {
    let transport: Arc<dyn GatewayTransport> = transport.clone();
    AutoDnsClient::with_transport(test_config(), transport)
}

/// Client on a scripted transport with SOA and nameserver defaults.
pub fn configured_client(transport: &Arc<ScriptedTransport>) -> AutoDnsClient {
    let mut client = scripted_client(transport);
    client.set_zone_soa(&SoaInput::default());
    client.set_zone_nameservers(&[
        NameserverInput::from("a.ns14.net"),
        NameserverInput::Entry {
            name: "b.ns14.net".to_string(),
            ttl: Some(86_400),
        },
    ]);
    client
}

/// 生成唯一的测试 zone 名称
pub fn generate_test_zone_name(base: &str) -> String {
    let uuid = uuid::Uuid::new_v4();
    format!("test-{}.{base}", &uuid.to_string()[..8])
}

/// Live gateway context built from `AUTODNS_*` environment variables.
pub struct LiveContext {
    pub client: AutoDnsClient,
    pub base_zone: String,
}

impl LiveContext {
    pub fn from_env() -> Option<Self> {
        let user = env::var("AUTODNS_USER").ok()?;
        let password = env::var("AUTODNS_PASSWORD").ok()?;
        let base_zone = env::var("TEST_ZONE").ok()?;

        let mut builder = ClientConfig::builder(user, password);
        if let Ok(url) = env::var("AUTODNS_URL") {
            builder = builder.url(url);
        }
        if let Ok(context) = env::var("AUTODNS_CONTEXT") {
            builder = builder.context(context);
        }

        let client = AutoDnsClient::new(builder.build()).ok()?;
        Some(Self { client, base_zone })
    }
}
