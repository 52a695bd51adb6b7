//! Data models for Splunk API responses.
//!
//! This module provides types for deserializing Splunk REST API responses.
//! Types are organized by resource in submodules and re-exported here
//! for convenient access.

pub mod alerts;
pub mod apps;
pub mod common;
pub mod indexes;
pub mod jobs;
pub mod kvstore;
pub mod lookups;
pub mod response;
pub mod saved_searches;
pub mod server;
pub mod tags;
pub mod users;

pub use alerts::{AlertSeverity, CreateAlertParams, FiredAlert, FiredAlertFilter};
pub use apps::App;
pub use common::{Acl, Entry, MessageType, Perms, SplunkMessage, SplunkMessages};
pub use indexes::{Index, MetadataKind};
pub use jobs::{DispatchState, JobControlAction, JobProgress, JobSummary};
pub use kvstore::{CollectionSummary, CreateCollectionParams, KvQuery};
pub use lookups::LookupFile;
pub use response::{EntryCollection, Paging, ResponseBody, ResultField, ResultsResponse};
pub use saved_searches::{SavedSearch, SavedSearchParams};
pub use server::{HealthFeature, HealthInfo, ServerInfo};
pub use tags::TagAssignment;
pub use users::{
    CapabilityCheck, CapabilityReport, CreateTokenParams, CurrentUser, Role, TokenClaims, TokenInfo,
    User,
};
