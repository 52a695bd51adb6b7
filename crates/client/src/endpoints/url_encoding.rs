//! Percent-encoding for resource names placed in URL paths.
//!
//! Saved search names, collection keys, lookup file names and sids can all
//! contain characters that would otherwise split the path, start a query
//! string or be decoded twice.
//!
//! ```
//! use splunk_as_client::endpoints::encode_path_segment;
//!
//! assert_eq!(encode_path_segment("Errors Last Hour"), "Errors%20Last%20Hour");
//! assert_eq!(encode_path_segment("a/b"), "a%2Fb");
//! ```

use percent_encoding::{AsciiSet, CONTROLS, percent_encode};

/// Bytes encoded in a path segment, on top of control characters.
pub const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'+')
    .add(b',')
    .add(b'/')
    .add(b';')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}')
    .add(b'~');

/// Percent-encode one path segment. `/`, `%`, `?` and `#` are always encoded.
pub fn encode_path_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), PATH_SEGMENT_ENCODE_SET).to_string()
}
