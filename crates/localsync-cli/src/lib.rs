//! localsync command-line front end
//!
//! Every record command goes through the same [`SyncRouter`] a host
//! application would use, so the CLI exercises the real dispatch and
//! delivery path against a SQLite file.

use std::cell::RefCell;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use localsync_core::sync::{remote_fn, Method, SyncOptions, SyncOutcome, SyncRouter};
use localsync_core::{
    Collection, Model, Record, SharedStore, StoreError, SyncConfig, Syncable,
};
use localsync_sqlite::SqliteError;
use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "localsync")]
#[command(about = "Inspect and edit localsync stores kept in a SQLite file")]
#[command(version)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "LOCALSYNC_DB", default_value = "localsync.db")]
    pub db: PathBuf,

    /// Store (namespace) name
    #[arg(short, long)]
    pub store: String,

    /// Attribute holding record ids
    #[arg(long, default_value = "id")]
    pub id_attribute: String,

    /// JSON sync config file (callback_style, promises)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a record from a JSON object; an id is generated if missing
    Create { json: String },
    /// Print one record
    Get { id: String },
    /// Replace a record from a JSON object carrying its id
    Update { json: String },
    /// Delete a record
    Delete { id: String },
    /// Print every record in index order
    List,
    /// Remove the store's index and all of its records
    Clear,
    /// Print backend entry count and store record count
    Size,
}

/// Errors surfaced to the command line
#[derive(Debug, Error)]
pub enum CliError {
    /// Sync failure, carrying the delivered error message
    #[error("{0}")]
    Sync(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sqlite(#[from] SqliteError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read config: {0}")]
    Config(#[from] std::io::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(Value),

    /// The sync call settled neither success nor error
    #[error("sync produced no result")]
    NoResult,
}

/// Load the sync config from `--config`, or defaults.
pub fn load_config(cli: &Cli) -> Result<SyncConfig, CliError> {
    match &cli.config {
        Some(path) => Ok(SyncConfig::from_json(&std::fs::read_to_string(path)?)?),
        None => Ok(SyncConfig::default()),
    }
}

/// Run one command against `store` and return the JSON to print.
pub fn execute(
    command: &Command,
    store: &SharedStore,
    id_attribute: &str,
    config: &SyncConfig,
) -> Result<Value, CliError> {
    let style = config.callback_style;
    let router = SyncRouter::new(
        config.clone(),
        remote_fn(move |method, model, options| {
            let message = format!("no remote sync configured for '{}'", method);
            options.deliver(
                style,
                &model.to_json(),
                &SyncOutcome::failure(message),
                None,
            );
            None
        }),
    );
    let model = |attributes: Value| {
        Model::new(attributes)
            .with_id_attribute(id_attribute)
            .with_store(store.clone())
    };

    match command {
        Command::Create { json } => {
            run(&router, Method::Create, &mut model(parse_object(json)?))
        }
        Command::Update { json } => {
            run(&router, Method::Update, &mut model(parse_object(json)?))
        }
        Command::Get { id } => run(&router, Method::Read, &mut model(id_only(id_attribute, id))),
        Command::Delete { id } => {
            run(&router, Method::Delete, &mut model(id_only(id_attribute, id)))
        }
        Command::List => run(&router, Method::Read, &mut Collection::new(store.clone())),
        Command::Clear => {
            let mut store = store.lock();
            store.clear()?;
            Ok(json!({ "cleared": store.name() }))
        }
        Command::Size => {
            let store = store.lock();
            let entries = store.size()?;
            Ok(json!({ "entries": entries, "records": store.len() }))
        }
    }
}

/// Sync one model through the router and collect the delivered result.
fn run<R>(
    router: &SyncRouter<R>,
    method: Method,
    model: &mut dyn Syncable,
) -> Result<Value, CliError>
where
    R: localsync_core::SyncStrategy,
{
    let result = RefCell::new(None);
    router.sync(
        method,
        model,
        SyncOptions::new()
            .on_success(|inv| *result.borrow_mut() = Some(Ok(inv.payload().clone())))
            .on_error(|inv| {
                *result.borrow_mut() = Some(Err(CliError::Sync(inv.payload().to_string())))
            }),
    );
    result.into_inner().unwrap_or(Err(CliError::NoResult))
}

fn parse_object(input: &str) -> Result<Value, CliError> {
    match serde_json::from_str(input)? {
        value @ Value::Object(_) => Ok(value),
        other => Err(CliError::NotAnObject(other)),
    }
}

fn id_only(id_attribute: &str, id: &str) -> Value {
    let mut map = Map::new();
    map.insert(id_attribute.to_string(), Value::String(id.to_string()));
    Value::Object(map)
}
