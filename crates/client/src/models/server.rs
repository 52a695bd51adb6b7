//! Server info and health models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `/services/server/info` content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    #[serde(rename = "serverName", default)]
    pub server_name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub build: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::strings_from_one_or_many")]
    pub server_roles: Vec<String>,
    #[serde(default)]
    pub os_name: Option<String>,
    #[serde(rename = "guid", default)]
    pub guid: Option<String>,
    #[serde(rename = "licenseState", default)]
    pub license_state: Option<String>,
    #[serde(rename = "numberOfCores", default, deserialize_with = "crate::serde_helpers::opt_u64_from_string_or_number")]
    pub number_of_cores: Option<u64>,
}

/// One feature node of the splunkd health tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthFeature {
    #[serde(default)]
    pub health: String,
    #[serde(default)]
    pub features: BTreeMap<String, HealthFeature>,
}

/// `/services/server/health/splunkd` content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthInfo {
    #[serde(default)]
    pub health: String,
    #[serde(default)]
    pub features: BTreeMap<String, HealthFeature>,
}

impl HealthInfo {
    /// Leaf features whose health is not green, as `path/to/feature: color`.
    pub fn unhealthy_features(&self) -> Vec<String> {
        fn walk(prefix: &str, features: &BTreeMap<String, HealthFeature>, out: &mut Vec<String>) {
            for (name, feature) in features {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}/{name}")
                };
                if feature.features.is_empty() {
                    if !feature.health.eq_ignore_ascii_case("green") {
                        out.push(format!("{path}: {}", feature.health));
                    }
                } else {
                    walk(&path, &feature.features, out);
                }
            }
        }

        let mut out = Vec::new();
        walk("", &self.features, &mut out);
        out
    }
}
