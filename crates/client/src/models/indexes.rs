//! Index models for `/services/data/indexes`.

use serde::{Deserialize, Serialize};

/// Index information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "datatype", default)]
    pub data_type: Option<String>,
    #[serde(
        rename = "totalEventCount",
        default,
        deserialize_with = "crate::serde_helpers::u64_from_string_or_number"
    )]
    pub total_event_count: u64,
    #[serde(
        rename = "currentDBSizeMB",
        default,
        deserialize_with = "crate::serde_helpers::u64_from_string_or_number"
    )]
    pub current_db_size_mb: u64,
    #[serde(
        rename = "maxTotalDataSizeMB",
        default,
        deserialize_with = "crate::serde_helpers::opt_u64_from_string_or_number"
    )]
    pub max_total_data_size_mb: Option<u64>,
    #[serde(rename = "minTime", default)]
    pub min_time: Option<String>,
    #[serde(rename = "maxTime", default)]
    pub max_time: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    pub disabled: bool,
}

/// Metadata type queried with `| metadata type=...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Hosts,
    Sources,
    Sourcetypes,
}

impl MetadataKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hosts => "hosts",
            Self::Sources => "sources",
            Self::Sourcetypes => "sourcetypes",
        }
    }

    /// Result column holding the value for this kind.
    pub fn field(self) -> &'static str {
        match self {
            Self::Hosts => "host",
            Self::Sources => "source",
            Self::Sourcetypes => "sourcetype",
        }
    }
}
