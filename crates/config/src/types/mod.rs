//! Configuration type definitions.
//!
//! Responsibilities:
//! - Define the runtime `Config` (connection, auth, search defaults).
//! - Define the on-disk profile file shape (`ConfigFile`, `ProfileConfig`).
//!
//! Does NOT handle:
//! - Loading or merging configuration sources (see `loader` module).
//! - Network connections or request signing (see client crate).
//!
//! Invariants:
//! - All secret values use `secrecy::SecretString` to prevent accidental logging.
//! - A built `Config` carries exactly one authentication strategy.

mod auth;
mod connection;
mod profile;

pub use auth::{AuthConfig, AuthMethod, AuthStrategy};
pub use connection::{Config, ConnectionConfig};
pub use profile::{ApiSettings, ConfigFile, ProfileConfig, SearchDefaultsFile};
