//! Saved search models.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::common::Entry;

/// A saved search definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSearch {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cron_schedule: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    pub is_scheduled: bool,
    #[serde(default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    pub disabled: bool,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_string_from_number_or_string")]
    pub next_scheduled_time: Option<String>,
    #[serde(default)]
    pub actions: Option<String>,
    #[serde(default)]
    pub alert_type: Option<String>,
    #[serde(rename = "dispatch.earliest_time", default)]
    pub dispatch_earliest_time: Option<String>,
    #[serde(rename = "dispatch.latest_time", default)]
    pub dispatch_latest_time: Option<String>,
    #[serde(skip_deserializing)]
    pub app: Option<String>,
    #[serde(skip_deserializing)]
    pub owner: Option<String>,
}

impl SavedSearch {
    pub fn from_entry(entry: Entry, operation: &str) -> Result<Self> {
        let acl = entry.acl.clone();
        let mut saved: SavedSearch = entry.into_model(operation)?;
        if let Some(acl) = acl {
            saved.app = Some(acl.app);
            saved.owner = Some(acl.owner);
        }
        Ok(saved)
    }
}

/// Fields for creating or updating a saved search. Unset fields are not sent.
#[derive(Debug, Clone, Default)]
pub struct SavedSearchParams {
    pub search: Option<String>,
    pub description: Option<String>,
    pub earliest_time: Option<String>,
    pub latest_time: Option<String>,
    /// Setting a cron schedule also enables scheduling.
    pub cron_schedule: Option<String>,
    pub is_scheduled: Option<bool>,
    pub disabled: Option<bool>,
    pub alert_type: Option<String>,
    pub alert_threshold: Option<String>,
    pub actions: Option<String>,
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}

impl SavedSearchParams {
    pub fn is_empty(&self) -> bool {
        self.to_form().is_empty()
    }

    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form: Vec<(String, String)> = [
            ("search", &self.search),
            ("description", &self.description),
            ("dispatch.earliest_time", &self.earliest_time),
            ("dispatch.latest_time", &self.latest_time),
            ("cron_schedule", &self.cron_schedule),
            ("alert_type", &self.alert_type),
            ("alert_threshold", &self.alert_threshold),
            ("actions", &self.actions),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone())))
        .collect();

        let scheduled = self
            .is_scheduled
            .or(self.cron_schedule.as_ref().map(|_| true));
        if let Some(scheduled) = scheduled {
            form.push(("is_scheduled".to_string(), flag(scheduled)));
        }
        if let Some(disabled) = self.disabled {
            form.push(("disabled".to_string(), flag(disabled)));
        }
        form
    }
}
