//! Route patterns derived from a zone's domain

use serde::{Deserialize, Serialize};

/// The two canonical route patterns of a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patterns {
    /// Matches all traffic: maintenance is active
    pub enabled: String,
    /// Matches only the maintenance sub-path: maintenance is inactive
    pub disabled: String,
}

impl Patterns {
    pub fn for_domain(domain: &str) -> Self {
        Self {
            enabled: format!("*{}/*", domain),
            disabled: format!("*{}/maintenance*", domain),
        }
    }
}

/// Maintenance state as read from the zone's routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceState {
    Enabled,
    Disabled,
    /// Neither canonical pattern is bound
    Unknown,
}

impl std::fmt::Display for MaintenanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaintenanceState::Enabled => write!(f, "enabled"),
            MaintenanceState::Disabled => write!(f, "disabled"),
            MaintenanceState::Unknown => write!(f, "unknown"),
        }
    }
}

/// Default Worker script name for a zone
///
/// `maintenance-<domain with dots as dashes>-<first 8 chars of zone id>`,
/// so re-deploying to the same zone overwrites the same script.
pub fn derive_script_name(domain: &str, zone_id: &str) -> String {
    let domain_part: String = domain
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let zone_part: String = zone_id
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect();

    format!("maintenance-{}-{}", domain_part.trim_matches('-'), zone_part)
}
