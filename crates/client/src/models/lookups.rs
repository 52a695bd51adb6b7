//! Lookup table file models.

use serde::Serialize;

use crate::models::common::Entry;

/// A lookup table file known to Splunk.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LookupFile {
    pub name: String,
    pub app: Option<String>,
    pub owner: Option<String>,
    /// Server-side path of the file.
    pub path: Option<String>,
}

impl LookupFile {
    /// Build from a list entry; ownership comes from `acl`, else `content.eai:acl`.
    pub fn from_entry(entry: &Entry) -> Self {
        let (app, owner) = match &entry.acl {
            Some(acl) => (Some(acl.app.clone()), Some(acl.owner.clone())),
            None => {
                let eai = entry.content.get("eai:acl");
                let field = |key: &str| {
                    eai.and_then(|acl| acl.get(key))
                        .and_then(|v| v.as_str())
                        .map(str::to_string)
                };
                (field("app"), field("owner"))
            }
        };
        Self {
            name: entry.name.clone(),
            app,
            owner,
            path: entry.content_str("eai:data"),
        }
    }
}
