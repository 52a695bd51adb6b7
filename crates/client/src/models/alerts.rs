//! Alert models: fired alert instances and alert definitions.

use serde::{Deserialize, Serialize};

use crate::models::common::Entry;

/// Splunk alert severity (1 = debug through 6 = fatal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AlertSeverity {
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Severe = 5,
    Fatal = 6,
}

impl TryFrom<u8> for AlertSeverity {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        match value {
            1 => Ok(Self::Debug),
            2 => Ok(Self::Info),
            3 => Ok(Self::Warn),
            4 => Ok(AlertSeverity::Error),
            5 => Ok(Self::Severe),
            6 => Ok(Self::Fatal),
            other => Err(format!("severity must be 1-6, got {other}")),
        }
    }
}

impl From<AlertSeverity> for u8 {
    fn from(value: AlertSeverity) -> Self {
        value as u8
    }
}

impl AlertSeverity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            AlertSeverity::Error => "error",
            Self::Severe => "severe",
            Self::Fatal => "fatal",
        }
    }
}

/// One fired alert group from `/services/alerts/fired_alerts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FiredAlert {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub savedsearch_name: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_u64_from_string_or_number")]
    pub severity: Option<u64>,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_string_from_number_or_string")]
    pub trigger_time: Option<String>,
    #[serde(default, deserialize_with = "crate::serde_helpers::u64_from_string_or_number")]
    pub triggered_alert_count: u64,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_string_from_number_or_string")]
    pub sid: Option<String>,
    #[serde(skip_deserializing)]
    pub app: Option<String>,
}

impl FiredAlert {
    pub fn from_entry(entry: Entry, operation: &str) -> crate::error::Result<Self> {
        let app = entry.acl.as_ref().map(|acl| acl.app.clone());
        let mut alert: FiredAlert = entry.into_model(operation)?;
        alert.app = app;
        Ok(alert)
    }
}

/// Client-side filter applied to fired alert listings.
#[derive(Debug, Clone, Default)]
pub struct FiredAlertFilter {
    pub severity: Option<AlertSeverity>,
    /// Case-insensitive substring of the saved search name.
    pub savedsearch: Option<String>,
    pub app: Option<String>,
}

impl FiredAlertFilter {
    pub fn matches(&self, alert: &FiredAlert) -> bool {
        if let Some(severity) = self.severity
            && alert.severity != Some(u64::from(u8::from(severity)))
        {
            return false;
        }
        if let Some(needle) = &self.savedsearch {
            let name = alert.savedsearch_name.as_deref().unwrap_or_default();
            if !name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(app) = &self.app
            && alert.app.as_deref() != Some(app.as_str())
        {
            return false;
        }
        true
    }
}

/// Parameters for creating an alert (a scheduled saved search with a trigger).
#[derive(Debug, Clone)]
pub struct CreateAlertParams {
    pub name: String,
    pub search: String,
    pub description: Option<String>,
    pub earliest_time: String,
    pub latest_time: String,
    /// Cron schedule; defaults to every five minutes.
    pub cron_schedule: Option<String>,
    /// `always`, `number of events`, `number of hosts`, `number of sources`, `custom`.
    pub alert_type: String,
    pub alert_comparator: Option<String>,
    pub alert_threshold: Option<String>,
    pub severity: AlertSeverity,
    /// Comma-separated action names (`email`, `webhook`, ...).
    pub actions: Option<String>,
    pub email_to: Option<String>,
    pub digest_mode: bool,
    /// Suppression period such as `60s` or `1h`.
    pub throttle: Option<String>,
}

/// Default schedule applied when an alert has none.
pub const DEFAULT_ALERT_CRON: &str = "*/5 * * * *";

impl CreateAlertParams {
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![
            ("name".to_string(), self.name.clone()),
            ("search".to_string(), self.search.clone()),
            ("dispatch.earliest_time".to_string(), self.earliest_time.clone()),
            ("dispatch.latest_time".to_string(), self.latest_time.clone()),
            ("is_scheduled".to_string(), "1".to_string()),
            ("alert_type".to_string(), self.alert_type.clone()),
            (
                "alert.severity".to_string(),
                u8::from(self.severity).to_string(),
            ),
            (
                "cron_schedule".to_string(),
                self.cron_schedule
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ALERT_CRON.to_string()),
            ),
        ];
        let optional = [
            ("description", &self.description),
            ("alert_comparator", &self.alert_comparator),
            ("alert_threshold", &self.alert_threshold),
            ("actions", &self.actions),
            ("action.email.to", &self.email_to),
        ];
        form.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.as_ref().map(|v| (key.to_string(), v.clone()))),
        );
        if self.digest_mode {
            form.push(("alert.digest_mode".to_string(), "1".to_string()));
        }
        if let Some(period) = &self.throttle {
            form.push(("alert.suppress".to_string(), "1".to_string()));
            form.push(("alert.suppress.period".to_string(), period.clone()));
        }
        form
    }
}
