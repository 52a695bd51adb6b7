//! Search job models.
//!
//! # What this module handles:
//! - The closed set of dispatch states and their terminal classification
//! - Progress snapshots rebuilt from one job-detail response
//! - Job list rows
//!
//! # What this module does NOT handle:
//! - Polling (see [`crate::poller`])
//! - HTTP transport (see [`crate::endpoints::jobs`])

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ClientError, Result};
use crate::models::common::{Entry, SplunkMessage};

/// Server-reported lifecycle stage of a search job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DispatchState {
    Queued,
    Parsing,
    Running,
    Paused,
    Finalizing,
    Done,
    Failed,
}

impl DispatchState {
    pub const ALL: [DispatchState; 7] = [
        Self::Queued,
        Self::Parsing,
        Self::Running,
        Self::Paused,
        Self::Finalizing,
        Self::Done,
        Self::Failed,
    ];

    /// `DONE` and `FAILED` end polling.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Parsing => "PARSING",
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Finalizing => "FINALIZING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DispatchState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == upper)
            .ok_or_else(|| format!("unknown dispatch state '{s}'"))
    }
}

/// Raw job-detail content as Splunk returns it.
#[derive(Debug, Deserialize, Default)]
struct JobContent {
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_string_from_number_or_string")]
    sid: Option<String>,
    #[serde(rename = "dispatchState", default)]
    dispatch_state: Option<String>,
    #[serde(
        rename = "doneProgress",
        default,
        deserialize_with = "crate::serde_helpers::opt_f64_from_string_or_number"
    )]
    done_progress: Option<f64>,
    #[serde(
        rename = "eventCount",
        default,
        deserialize_with = "crate::serde_helpers::u64_from_string_or_number"
    )]
    event_count: u64,
    #[serde(
        rename = "resultCount",
        default,
        deserialize_with = "crate::serde_helpers::u64_from_string_or_number"
    )]
    result_count: u64,
    #[serde(
        rename = "scanCount",
        default,
        deserialize_with = "crate::serde_helpers::u64_from_string_or_number"
    )]
    scan_count: u64,
    #[serde(
        rename = "runDuration",
        default,
        deserialize_with = "crate::serde_helpers::f64_from_string_or_number"
    )]
    run_duration: f64,
    #[serde(rename = "isDone", default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    is_done: bool,
    #[serde(rename = "isFailed", default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    is_failed: bool,
    #[serde(rename = "isPaused", default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    is_paused: bool,
    #[serde(default)]
    messages: JobMessages,
}

/// Job messages arrive either as a list of `{type, text}` objects or as a
/// map of type to list of texts, depending on the Splunk version.
#[derive(Debug, Deserialize, Default)]
#[serde(untagged)]
enum JobMessages {
    List(Vec<SplunkMessage>),
    ByType(std::collections::BTreeMap<String, Vec<String>>),
    #[default]
    None,
}

impl JobMessages {
    fn flatten(self) -> Vec<String> {
        match self {
            Self::List(list) => list
                .into_iter()
                .map(|m| format!("{}: {}", m.message_type, m.text))
                .collect(),
            Self::ByType(map) => map
                .into_iter()
                .flat_map(|(kind, texts)| {
                    texts
                        .into_iter()
                        .map(move |text| format!("{}: {text}", kind.to_ascii_uppercase()))
                })
                .collect(),
            Self::None => Vec::new(),
        }
    }
}

/// Point-in-time view of a search job, rebuilt on every poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobProgress {
    pub sid: String,
    pub state: DispatchState,
    /// Completion fraction in `[0, 1]`.
    pub progress_percent: f64,
    pub event_count: u64,
    pub result_count: u64,
    pub scan_count: u64,
    /// Seconds the job has been running.
    pub run_duration: f64,
    /// Job messages flattened as `TYPE: text`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

impl JobProgress {
    /// Build a snapshot from a job-detail entry.
    ///
    /// When `dispatchState` is missing or unrecognised, the `isFailed`,
    /// `isDone` and `isPaused` flags decide the state; with none of them set
    /// the response is rejected.
    pub fn from_entry(entry: Entry, requested_sid: &str, operation: &str) -> Result<Self> {
        let name = entry.name.clone();
        let content: JobContent =
            serde_json::from_value(serde_json::Value::Object(entry.content)).map_err(|e| {
                ClientError::invalid_response(operation, format!("malformed job content: {e}"))
            })?;

        let parsed_state = content
            .dispatch_state
            .as_deref()
            .and_then(|raw| raw.parse::<DispatchState>().ok());
        let state = match parsed_state {
            Some(state) => state,
            None if content.is_failed => DispatchState::Failed,
            None if content.is_done => DispatchState::Done,
            None if content.is_paused => DispatchState::Paused,
            None => {
                return Err(ClientError::invalid_response(
                    operation,
                    format!(
                        "job {requested_sid} has no recognisable dispatch state ({})",
                        content.dispatch_state.as_deref().unwrap_or("missing")
                    ),
                ));
            }
        };

        let progress_percent = match content.done_progress {
            Some(p) if p.is_finite() => p.clamp(0.0, 1.0),
            _ if state == DispatchState::Done => 1.0,
            _ => 0.0,
        };

        let sid = content
            .sid
            .filter(|s| !s.is_empty())
            .or_else(|| (!name.is_empty()).then_some(name))
            .unwrap_or_else(|| requested_sid.to_string());

        Ok(Self {
            sid,
            state,
            progress_percent,
            event_count: content.event_count,
            result_count: content.result_count,
            scan_count: content.scan_count,
            run_duration: content.run_duration.max(0.0),
            messages: content.messages.flatten(),
        })
    }

    pub fn is_done(&self) -> bool {
        self.state == DispatchState::Done
    }

    pub fn is_failed(&self) -> bool {
        self.state == DispatchState::Failed
    }

    pub fn is_paused(&self) -> bool {
        self.state == DispatchState::Paused
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

/// One row of a job listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_string_from_number_or_string")]
    pub sid: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "dispatchState", default)]
    pub dispatch_state: Option<String>,
    #[serde(
        rename = "doneProgress",
        default,
        deserialize_with = "crate::serde_helpers::f64_from_string_or_number"
    )]
    pub done_progress: f64,
    #[serde(
        rename = "resultCount",
        default,
        deserialize_with = "crate::serde_helpers::u64_from_string_or_number"
    )]
    pub result_count: u64,
    #[serde(
        rename = "eventCount",
        default,
        deserialize_with = "crate::serde_helpers::u64_from_string_or_number"
    )]
    pub event_count: u64,
    #[serde(
        rename = "runDuration",
        default,
        deserialize_with = "crate::serde_helpers::f64_from_string_or_number"
    )]
    pub run_duration: f64,
    #[serde(default, deserialize_with = "crate::serde_helpers::opt_u64_from_string_or_number")]
    pub ttl: Option<u64>,
    #[serde(rename = "isDone", default, deserialize_with = "crate::serde_helpers::bool_from_flag")]
    pub is_done: bool,
    #[serde(default)]
    pub name: String,
}

impl JobSummary {
    /// Build from a list entry; the sid falls back to the entry name.
    pub fn from_entry(entry: Entry, operation: &str) -> Result<Self> {
        let mut summary: JobSummary = entry.into_model(operation)?;
        if summary.sid.as_deref().is_none_or(str::is_empty) {
            summary.sid = Some(summary.name.clone());
        }
        Ok(summary)
    }

    pub fn sid(&self) -> &str {
        self.sid.as_deref().unwrap_or(&self.name)
    }
}

/// Action accepted by the job control endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobControlAction {
    Cancel,
    Pause,
    Unpause,
    Finalize,
    /// Reset the job TTL to the given number of seconds.
    SetTtl(u64),
    /// Extend the TTL by the job's default amount.
    Touch,
}

impl JobControlAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancel => "cancel",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::Finalize => "finalize",
            Self::SetTtl(_) => "setttl",
            Self::Touch => "touch",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(content: serde_json::Value) -> Entry {
        serde_json::from_value(json!({"name": "1703779200.12345", "content": content})).unwrap()
    }

    #[test]
    fn test_dispatch_state_parsing_and_terminal_set() {
        for state in DispatchState::ALL {
            assert_eq!(state.as_str().parse::<DispatchState>().unwrap(), state);
        }
        assert_eq!("done".parse::<DispatchState>().unwrap(), DispatchState::Done);
        assert!("EXPLODED".parse::<DispatchState>().is_err());

        let terminal: Vec<_> = DispatchState::ALL
            .into_iter()
            .filter(|s| s.is_terminal())
            .collect();
        assert_eq!(terminal, vec![DispatchState::Done, DispatchState::Failed]);
    }

    #[test]
    fn test_progress_from_running_entry() {
        let progress = JobProgress::from_entry(
            entry(json!({
                "sid": "1703779200.12345",
                "dispatchState": "RUNNING",
                "doneProgress": 0.4,
                "eventCount": "1500",
                "resultCount": 10,
                "scanCount": "20000",
                "runDuration": "3.25",
                "isDone": "0"
            })),
            "1703779200.12345",
            "get job status",
        )
        .unwrap();

        assert_eq!(progress.state, DispatchState::Running);
        assert_eq!(progress.progress_percent, 0.4);
        assert_eq!(progress.event_count, 1500);
        assert_eq!(progress.result_count, 10);
        assert_eq!(progress.scan_count, 20000);
        assert_eq!(progress.run_duration, 3.25);
        assert!(!progress.is_done() && !progress.is_failed() && !progress.is_terminal());
    }

    #[test]
    fn test_progress_is_clamped_and_defaults_to_complete_when_done() {
        let over = JobProgress::from_entry(
            entry(json!({"dispatchState": "RUNNING", "doneProgress": 1.7})),
            "s",
            "op",
        )
        .unwrap();
        assert_eq!(over.progress_percent, 1.0);

        let done = JobProgress::from_entry(entry(json!({"dispatchState": "DONE"})), "s", "op")
            .unwrap();
        assert_eq!(done.progress_percent, 1.0);
        assert!(done.is_done());
        assert_eq!(done.sid, "1703779200.12345");
    }

    #[test]
    fn test_unknown_state_falls_back_to_flags() {
        let failed = JobProgress::from_entry(
            entry(json!({"dispatchState": "INTERNAL_CANCEL", "isFailed": true})),
            "s",
            "op",
        )
        .unwrap();
        assert!(failed.is_failed());

        let paused =
            JobProgress::from_entry(entry(json!({"isPaused": "1"})), "s", "op").unwrap();
        assert!(paused.is_paused());

        let err = JobProgress::from_entry(entry(json!({"dispatchState": "???"})), "s", "op")
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse { .. }));
    }

    #[test]
    fn test_failed_job_messages_are_flattened() {
        let progress = JobProgress::from_entry(
            entry(json!({
                "dispatchState": "FAILED",
                "messages": [{"type": "FATAL", "text": "Unknown search command 'foo'."}]
            })),
            "s",
            "op",
        )
        .unwrap();
        assert_eq!(progress.messages, vec!["FATAL: Unknown search command 'foo'."]);

        let progress = JobProgress::from_entry(
            entry(json!({
                "dispatchState": "FAILED",
                "messages": {"error": ["disk full"]}
            })),
            "s",
            "op",
        )
        .unwrap();
        assert_eq!(progress.messages, vec!["ERROR: disk full"]);
    }

    #[test]
    fn test_job_summary_sid_falls_back_to_name() {
        let summary = JobSummary::from_entry(
            entry(json!({"dispatchState": "DONE", "resultCount": "5"})),
            "list jobs",
        )
        .unwrap();
        assert_eq!(summary.sid(), "1703779200.12345");
        assert_eq!(summary.result_count, 5);
    }

    #[test]
    fn test_control_action_names() {
        assert_eq!(JobControlAction::Cancel.as_str(), "cancel");
        assert_eq!(JobControlAction::SetTtl(60).as_str(), "setttl");
    }
}
