//! REST API endpoint helpers.
//!
//! Every helper takes a [`crate::SplunkClient`] and is written in terms of
//! its generic `get`/`post`/`delete`/`stream_results` calls. Resource names
//! interpolated into paths are always percent-encoded.

pub mod alerts;
pub mod apps;
pub mod jobs;
pub mod kvstore;
pub mod lookups;
pub mod metadata;
pub mod metrics;
pub mod saved_searches;
pub mod search;
pub mod security;
pub mod server;
pub mod tags;
pub mod url_encoding;

pub use url_encoding::encode_path_segment;

/// Owner used for app-namespaced (`/servicesNS`) paths.
pub const NAMESPACE_OWNER: &str = "nobody";

/// `/servicesNS/nobody/{app}/{rest}` with the app name encoded.
pub(crate) fn namespaced(app: &str, rest: &str) -> String {
    format!(
        "/servicesNS/{NAMESPACE_OWNER}/{}/{rest}",
        encode_path_segment(app)
    )
}

/// Path under the app namespace when one is given, else under `/services`.
pub(crate) fn scoped(app: Option<&str>, rest: &str) -> String {
    match app {
        Some(app) => namespaced(app, rest),
        None => format!("/services/{rest}"),
    }
}

/// Splunk's `0`/`1` form flag.
pub(crate) fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_encodes_app() {
        assert_eq!(
            namespaced("my app", "storage/collections/config"),
            "/servicesNS/nobody/my%20app/storage/collections/config"
        );
    }

    #[test]
    fn test_scoped_defaults_to_services() {
        assert_eq!(scoped(None, "saved/searches"), "/services/saved/searches");
        assert_eq!(
            scoped(Some("search"), "saved/searches"),
            "/servicesNS/nobody/search/saved/searches"
        );
    }
}
