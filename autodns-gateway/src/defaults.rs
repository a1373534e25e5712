//! Zone defaults
//!
//! Turns simplified SOA, nameserver and main-record input into the zone
//! sections the gateway expects, so they can be reused for every zone a
//! client creates.

use crate::types::{
    MainInput, MainRecord, Nameserver, NameserverInput, NsAction, SoaInput, SoaLevel, SoaPolicy,
};

// Recommended SOA values from the AutoDNS documentation
pub const DEFAULT_SOA_TTL: u32 = 86_400;
pub const DEFAULT_SOA_REFRESH: u32 = 43_200;
pub const DEFAULT_SOA_RETRY: u32 = 7_200;
pub const DEFAULT_SOA_EXPIRE: u32 = 1_209_600;

/// Default TTL of the zone main record.
pub const DEFAULT_MAIN_TTL: u32 = 86_400;

/// Zone sections shared by every zone a client creates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoneDefaults {
    pub ns_action: NsAction,
    pub main: Option<MainRecord>,
    pub soa: Option<SoaPolicy>,
    pub nserver: Option<Vec<Nameserver>>,
}

/// Zero is treated like an absent value.
fn truthy(value: Option<u32>) -> Option<u32> {
    value.filter(|v| *v != 0)
}

/// Builds the SOA section from caller input.
///
/// - An explicit `level` is passed through and nothing else is derived.
/// - Otherwise, if any timing value is given, `level` becomes `0` and the
///   remaining timing values get the recommended defaults.
/// - Otherwise `level` becomes `1` and the gateway fills in the SOA.
///
/// `ignore` and `email` are carried over whenever they are present.
pub fn build_soa_policy(input: &SoaInput) -> SoaPolicy {
    let ttl = truthy(input.ttl);
    let refresh = truthy(input.refresh);
    let retry = truthy(input.retry);
    let expire = truthy(input.expire);

    let mut soa = SoaPolicy {
        level: SoaLevel::Auto,
        ttl: None,
        refresh: None,
        retry: None,
        expire: None,
        ignore: input.ignore,
        email: input.email.clone(),
    };

    if let Some(level) = truthy(input.level) {
        soa.level = SoaLevel::Explicit(level);
    } else if ttl.is_some() || refresh.is_some() || retry.is_some() || expire.is_some() {
        soa.level = SoaLevel::Custom;
        soa.ttl = Some(ttl.unwrap_or(DEFAULT_SOA_TTL));
        soa.refresh = Some(refresh.unwrap_or(DEFAULT_SOA_REFRESH));
        soa.retry = Some(retry.unwrap_or(DEFAULT_SOA_RETRY));
        soa.expire = Some(expire.unwrap_or(DEFAULT_SOA_EXPIRE));
    }

    soa
}

/// Builds the nameserver list, one entry per input in the same order.
pub fn build_nameservers(inputs: &[NameserverInput]) -> Vec<Nameserver> {
    inputs
        .iter()
        .map(|input| match input {
            NameserverInput::Name(name) => Nameserver {
                name: name.clone(),
                ttl: None,
            },
            NameserverInput::Entry { name, ttl } => Nameserver {
                name: name.clone(),
                ttl: truthy(*ttl),
            },
        })
        .collect()
}

/// Builds the main record, defaulting its TTL to one day.
pub fn build_main_record(input: &MainInput) -> MainRecord {
    match input {
        MainInput::Value(value) => MainRecord {
            value: value.clone(),
            ttl: DEFAULT_MAIN_TTL,
        },
        MainInput::Entry { value, ttl } => MainRecord {
            value: value.clone(),
            ttl: truthy(*ttl).unwrap_or(DEFAULT_MAIN_TTL),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_auto_level() {
        let soa = build_soa_policy(&SoaInput::default());
        assert_eq!(soa.level, SoaLevel::Auto);
        assert_eq!(soa.ttl, None);
        assert_eq!(soa.refresh, None);
        assert_eq!(soa.retry, None);
        assert_eq!(soa.expire, None);
        assert_eq!(soa.ignore, None);
        assert_eq!(soa.email, None);
    }

    #[test]
    fn single_timing_value_fills_the_rest() {
        let soa = build_soa_policy(&SoaInput {
            ttl: Some(3600),
            ..Default::default()
        });
        assert_eq!(soa.level, SoaLevel::Custom);
        assert_eq!(soa.ttl, Some(3600));
        assert_eq!(soa.refresh, Some(43_200));
        assert_eq!(soa.retry, Some(7_200));
        assert_eq!(soa.expire, Some(1_209_600));
    }

    #[test]
    fn supplied_timing_values_are_kept() {
        let soa = build_soa_policy(&SoaInput {
            refresh: Some(1),
            expire: Some(999_999_999),
            ..Default::default()
        });
        assert_eq!(soa.level, SoaLevel::Custom);
        assert_eq!(soa.ttl, Some(DEFAULT_SOA_TTL));
        assert_eq!(soa.refresh, Some(1));
        assert_eq!(soa.retry, Some(DEFAULT_SOA_RETRY));
        assert_eq!(soa.expire, Some(999_999_999));
    }

    #[test]
    fn explicit_level_wins_over_timing_values() {
        let soa = build_soa_policy(&SoaInput {
            level: Some(3),
            ttl: Some(3600),
            retry: Some(60),
            ..Default::default()
        });
        assert_eq!(soa.level, SoaLevel::Explicit(3));
        assert_eq!(soa.ttl, None);
        assert_eq!(soa.retry, None);
    }

    #[test]
    fn zero_values_count_as_absent() {
        let soa = build_soa_policy(&SoaInput {
            level: Some(0),
            ttl: Some(0),
            ..Default::default()
        });
        assert_eq!(soa.level, SoaLevel::Auto);
        assert_eq!(soa.ttl, None);

        let soa = build_soa_policy(&SoaInput {
            level: Some(0),
            expire: Some(100),
            ..Default::default()
        });
        assert_eq!(soa.level, SoaLevel::Custom);
        assert_eq!(soa.expire, Some(100));
    }

    #[test]
    fn ignore_and_email_copied_when_present() {
        for input in [
            SoaInput {
                email: Some(String::new()),
                ignore: Some(false),
                ..Default::default()
            },
            SoaInput {
                level: Some(2),
                email: Some(String::new()),
                ignore: Some(false),
                ..Default::default()
            },
            SoaInput {
                ttl: Some(60),
                email: Some(String::new()),
                ignore: Some(false),
                ..Default::default()
            },
        ] {
            let soa = build_soa_policy(&input);
            assert_eq!(soa.email.as_deref(), Some(""));
            assert_eq!(soa.ignore, Some(false));
        }
    }

    #[test]
    fn nameservers_keep_order_and_truthy_ttl() {
        let servers = build_nameservers(&[
            NameserverInput::from("a.ns14.net"),
            NameserverInput::Entry {
                name: "b.ns14.net".to_string(),
                ttl: Some(3600),
            },
            NameserverInput::Entry {
                name: "c.ns14.net".to_string(),
                ttl: Some(0),
            },
            NameserverInput::Entry {
                name: "d.ns14.net".to_string(),
                ttl: None,
            },
        ]);
        let names: Vec<_> = servers.iter().map(|ns| ns.name.as_str()).collect();
        assert_eq!(names, vec!["a.ns14.net", "b.ns14.net", "c.ns14.net", "d.ns14.net"]);
        let ttls: Vec<_> = servers.iter().map(|ns| ns.ttl).collect();
        assert_eq!(ttls, vec![None, Some(3600), None, None]);
    }

    #[test]
    fn empty_nameserver_list() {
        assert!(build_nameservers(&[]).is_empty());
    }

    #[test]
    fn main_record_defaults_ttl() {
        assert_eq!(
            build_main_record(&MainInput::from("192.0.2.1")),
            MainRecord {
                value: "192.0.2.1".to_string(),
                ttl: 86_400
            }
        );
        assert_eq!(
            build_main_record(&MainInput::Entry {
                value: "192.0.2.1".to_string(),
                ttl: Some(300)
            })
            .ttl,
            300
        );
    }
}
