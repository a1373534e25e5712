//! Zone request assembly
//!
//! Builds the `zone` node of a create-zone task from the caller's records
//! and the client's stored defaults, and refuses zones the gateway would
//! reject for missing sections.

use crate::config::ClientConfig;
use crate::defaults::ZoneDefaults;
use crate::error::{GatewayError, Result};
use crate::types::{
    CREATE_ZONE_TASK, NsAction, RequestEnvelope, ResourceRecord, Rr, Task, Zone, ZoneSection,
};

/// Builds a zone for the create-zone task.
///
/// Stored defaults overwrite the provisional `ns_action` and supply `main`,
/// `soa` and `nserver`. Zones with a `complete` or `primary` action must end
/// up with both an SOA and nameservers.
pub fn build_zone(
    name: &str,
    records: Option<&[ResourceRecord]>,
    defaults: Option<&ZoneDefaults>,
) -> Result<Zone> {
    let mut zone = Zone {
        name: name.to_string(),
        ns_action: NsAction::Complete,
        rr: records.map(|records| records.iter().map(Rr::from).collect()),
        main: None,
        soa: None,
        nserver: None,
    };

    if let Some(defaults) = defaults {
        zone.ns_action = defaults.ns_action;
        if let Some(main) = &defaults.main {
            zone.main = Some(main.clone());
        }
        if let Some(soa) = &defaults.soa {
            zone.soa = Some(soa.clone());
        }
        if let Some(nserver) = &defaults.nserver {
            zone.nserver = Some(nserver.clone());
        }
    }

    validate_zone(&zone)?;
    Ok(zone)
}

/// Checks the sections required by the zone's `ns_action`.
pub fn validate_zone(zone: &Zone) -> Result<()> {
    if !zone.ns_action.requires_soa_and_nameservers() {
        return Ok(());
    }
    if zone.soa.is_none() {
        return Err(GatewayError::MissingZoneSection {
            section: ZoneSection::Soa,
            ns_action: zone.ns_action,
        });
    }
    if zone.nserver.is_none() {
        return Err(GatewayError::MissingZoneSection {
            section: ZoneSection::Nameservers,
            ns_action: zone.ns_action,
        });
    }
    Ok(())
}

impl RequestEnvelope {
    /// Wraps a zone into a create-zone request using the client's credentials.
    pub fn create_zone(config: &ClientConfig, zone: Zone) -> Self {
        Self {
            auth: config.auth.clone(),
            language: config.language.clone(),
            task: Task {
                code: CREATE_ZONE_TASK,
                zone,
            },
        }
    }
}
