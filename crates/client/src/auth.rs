//! Request signing for the configured authentication strategy.
//!
//! A session holds exactly one [`AuthStrategy`]; each request receives either
//! a bearer `Authorization` header or HTTP basic credentials, never both.

use reqwest::RequestBuilder;
use secrecy::ExposeSecret;

pub use splunk_as_config::AuthStrategy;

/// Extension trait that signs a request with an [`AuthStrategy`].
pub trait ApplyAuth {
    fn apply_auth(self, strategy: &AuthStrategy) -> Self;
}

impl ApplyAuth for RequestBuilder {
    fn apply_auth(self, strategy: &AuthStrategy) -> Self {
        match strategy {
            AuthStrategy::ApiToken { token } => self.bearer_auth(token.expose_secret()),
            AuthStrategy::Basic { username, password } => {
                self.basic_auth(username, Some(password.expose_secret()))
            }
        }
    }
}
