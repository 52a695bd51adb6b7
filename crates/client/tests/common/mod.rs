//! Common test utilities for integration tests.
//!
//! # Invariants
//! - Fixtures are loaded from the `fixtures/` directory relative to the crate root
//! - Every client built here uses a [`ManualClock`], so backoff and poll
//!   sleeps complete instantly and are recorded instead of waited on
//!
//! # What this does NOT handle
//! - Mock server setup (use wiremock directly in tests)

use secrecy::SecretString;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[allow(unused_imports)]
pub use splunk_as_client::endpoints;
#[allow(unused_imports)]
pub use splunk_as_client::{AuthStrategy, ClientError, ManualClock, RetryPolicy, SplunkClient};
#[allow(unused_imports)]
pub use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

/// Load a JSON fixture file from the fixtures directory.
///
/// # Panics
/// - If the fixture file cannot be read
/// - If the file content is not valid JSON
#[allow(dead_code)]
pub fn load_fixture(fixture_path: &str) -> serde_json::Value {
    let full_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("Invalid JSON in fixture")
}

#[allow(dead_code)]
pub fn token_auth() -> AuthStrategy {
    AuthStrategy::ApiToken {
        token: SecretString::new(TEST_TOKEN.to_string().into()),
    }
}

/// Client pointed at `server` with token auth, 3 retries and a manual clock.
#[allow(dead_code)]
pub fn test_client(server: &MockServer) -> (SplunkClient, ManualClock) {
    test_client_with(server, token_auth(), 3)
}

#[allow(dead_code)]
pub fn test_client_with(
    server: &MockServer,
    auth: AuthStrategy,
    max_retries: usize,
) -> (SplunkClient, ManualClock) {
    let clock = ManualClock::new();
    let client = SplunkClient::builder()
        .base_url(server.uri())
        .auth_strategy(auth)
        .timeout(Duration::from_secs(5))
        .max_retries(max_retries)
        .clock(Arc::new(clock.clone()))
        .build()
        .expect("test client builds");
    (client, clock)
}

/// Splunk-style error envelope.
#[allow(dead_code)]
pub fn splunk_error(text: &str) -> serde_json::Value {
    serde_json::json!({"messages": [{"type": "ERROR", "text": text}]})
}
