//! App models for `/services/apps/local`.

use serde::{Deserialize, Serialize};

/// An installed app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct App {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_string_from_number_or_string")]
    pub version: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    pub visible: bool,
}
