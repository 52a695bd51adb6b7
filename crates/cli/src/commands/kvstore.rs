//! KV Store command implementation.
//!
//! Responsibilities:
//! - List, create and delete collections.
//! - Query, read, insert (single or batch), update and delete records.
//!
//! Record bodies and queries are passed as JSON strings on the command line.

use anyhow::{Result, bail};
use clap::Subcommand;
use serde_json::{Value, json};
use splunk_as_client::endpoints::kvstore;
use splunk_as_client::models::{CreateCollectionParams, KvQuery};
use splunk_as_config::constants::DEFAULT_APP;
use std::collections::BTreeMap;

use crate::commands::{Session, parse_json_arg};

#[derive(Subcommand)]
pub enum KvstoreCommand {
    /// List collections in an app
    List {
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
    },
    /// Create a collection
    Create {
        name: String,
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
        /// Field types as a JSON object, e.g. '{"hostname":"string","port":"number"}'
        #[arg(long)]
        fields: Option<String>,
        /// Accelerated field definitions as a JSON object, e.g. '{"by_host":{"hostname":1}}'
        #[arg(long)]
        accelerated_fields: Option<String>,
    },
    /// Delete a collection and all its records
    Delete {
        name: String,
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
    },
    /// Query records with an optional JSON filter
    Query {
        collection: String,
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
        /// Mongo-style filter, e.g. '{"env":"prod"}'
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        limit: Option<u64>,
        #[arg(long)]
        skip: Option<u64>,
        /// Sort spec, e.g. 'hostname:1'
        #[arg(long)]
        sort: Option<String>,
        /// Comma-separated fields to return
        #[arg(long)]
        fields: Option<String>,
    },
    /// Read one record by key
    Get {
        collection: String,
        key: String,
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
    },
    /// Insert a JSON object, or a JSON array of objects as one batch
    Insert {
        collection: String,
        record: String,
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
    },
    /// Replace a record by key
    Update {
        collection: String,
        key: String,
        record: String,
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
    },
    /// Delete a record by key
    DeleteRecord {
        collection: String,
        key: String,
        #[arg(short, long, default_value = DEFAULT_APP)]
        app: String,
    },
}

pub(crate) async fn run(session: &Session, command: KvstoreCommand) -> Result<()> {
    let client = &session.client;

    match command {
        KvstoreCommand::List { app } => {
            let collections = session
                .cancel
                .run(kvstore::list_collections(client, &app))
                .await?;
            session
                .output
                .rows(&collections, &["name", "app", "owner", "disabled"])
        }
        KvstoreCommand::Create {
            name,
            app,
            fields,
            accelerated_fields,
        } => {
            let params = CreateCollectionParams {
                name: name.clone(),
                fields: match fields {
                    Some(raw) => field_types(&raw)?,
                    None => BTreeMap::new(),
                },
                accelerated_fields: match accelerated_fields {
                    Some(raw) => json_object("--accelerated-fields", &raw)?,
                    None => BTreeMap::new(),
                },
            };
            session
                .cancel
                .run(kvstore::create_collection(client, &app, &params))
                .await?;
            session.output.status(
                &format!("Collection created: {app}/{name}"),
                json!({ "app": app, "collection": name, "status": "created" }),
            )
        }
        KvstoreCommand::Delete { name, app } => {
            session
                .cancel
                .run(kvstore::delete_collection(client, &app, &name))
                .await?;
            session.output.status(
                &format!("Collection deleted: {app}/{name}"),
                json!({ "app": app, "collection": name, "status": "deleted" }),
            )
        }
        KvstoreCommand::Query {
            collection,
            app,
            query,
            limit,
            skip,
            sort,
            fields,
        } => {
            let query = KvQuery {
                query: query
                    .map(|raw| parse_json_arg("--query", &raw))
                    .transpose()?,
                limit,
                skip,
                sort,
                fields,
            };
            let records = session
                .cancel
                .run(kvstore::query_records(client, &app, &collection, &query))
                .await?;
            session.output.values(&records, &[])
        }
        KvstoreCommand::Get {
            collection,
            key,
            app,
        } => {
            let record = session
                .cancel
                .run(kvstore::get_record(client, &app, &collection, &key))
                .await?;
            session.output.record(&record)
        }
        KvstoreCommand::Insert {
            collection,
            record,
            app,
        } => match parse_json_arg("record", &record)? {
            Value::Array(records) => {
                let keys = session
                    .cancel
                    .run(kvstore::batch_save(client, &app, &collection, records))
                    .await?;
                session.output.status(
                    &format!("Saved {} records to {collection}", keys.len()),
                    json!({ "collection": collection, "keys": keys }),
                )
            }
            record => {
                let key = session
                    .cancel
                    .run(kvstore::insert_record(client, &app, &collection, record))
                    .await?;
                session.output.status(
                    &format!("Record inserted: {key}"),
                    json!({ "collection": collection, "_key": key }),
                )
            }
        },
        KvstoreCommand::Update {
            collection,
            key,
            record,
            app,
        } => {
            let record = parse_json_arg("record", &record)?;
            session
                .cancel
                .run(kvstore::update_record(client, &app, &collection, &key, record))
                .await?;
            session.output.status(
                &format!("Record updated: {key}"),
                json!({ "collection": collection, "_key": key, "status": "updated" }),
            )
        }
        KvstoreCommand::DeleteRecord {
            collection,
            key,
            app,
        } => {
            session
                .cancel
                .run(kvstore::delete_record(client, &app, &collection, &key))
                .await?;
            session.output.status(
                &format!("Record deleted: {key}"),
                json!({ "collection": collection, "_key": key, "status": "deleted" }),
            )
        }
    }
}

fn json_object(flag: &str, raw: &str) -> Result<BTreeMap<String, Value>> {
    match parse_json_arg(flag, raw)? {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => bail!("{flag} must be a JSON object, got {other}"),
    }
}

/// Field definitions map each field to a KV Store type name.
fn field_types(raw: &str) -> Result<BTreeMap<String, String>> {
    json_object("--fields", raw)?
        .into_iter()
        .map(|(field, kind)| match kind {
            Value::String(kind) => Ok((field, kind)),
            other => bail!("--fields: type of '{field}' must be a string, got {other}"),
        })
        .collect()
}
