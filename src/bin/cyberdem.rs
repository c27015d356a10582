//! CyberDEM Store CLI
//!
//! Query, read and write records in a directory-backed store. All output is
//! JSON on stdout; logs go to stderr and are controlled by `RUST_LOG`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use cyberdem::{CyberDemConfig, Entity, KindRegistry, Store};
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cyberdem")]
#[command(about = "Store and query CyberDEM simulation entities")]
struct Cli {
    /// Config file layered over the default locations
    #[arg(short, long)]
    config: Option<String>,

    /// Store root (overrides the configured path)
    #[arg(short, long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a SELECT/FROM/WHERE query
    Query {
        /// Query text, e.g. "SELECT name,version FROM Application"
        sql: String,
    },

    /// Fetch records by id
    Get {
        /// Ids to fetch
        #[arg(required = true)]
        ids: Vec<String>,
        /// Only look in this kind's namespace
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Save records from JSON files (one record or an array of records per file)
    Save {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Replace records that already exist
        #[arg(long)]
        overwrite: bool,
    },

    /// List kinds, or the declared attributes of one kind
    Kinds {
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write a default config file to this path instead
        #[arg(long)]
        init: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = CyberDemConfig::load_from(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(path) = cli.store {
        config.store.path = path;
    }

    match cli.command {
        Commands::Config { init } => {
            if let Some(path) = init {
                let target = path.to_string_lossy();
                CyberDemConfig::default()
                    .save(&target)
                    .with_context(|| format!("Failed to write {}", target))?;
                info!(path = %target, "Wrote default config");
                return Ok(());
            }
            emit(&serde_json::to_value(&config)?)
        }

        Commands::Kinds { kind } => {
            let registry = KindRegistry::global();
            match kind {
                Some(name) => {
                    let descriptor = registry.resolve(&name)?;
                    let attributes: Vec<Value> = descriptor
                        .attributes()
                        .iter()
                        .map(|spec| {
                            json!({
                                "name": spec.name,
                                "type": spec.ty.describe(),
                                "required": spec.required,
                            })
                        })
                        .collect();
                    emit(&json!({
                        "kind": descriptor.kind().as_str(),
                        "branch": descriptor.branch(),
                        "parent": descriptor.kind().parent().map(|p| p.as_str()),
                        "id_prefix": descriptor.kind().id_prefix(),
                        "attributes": attributes,
                    }))
                }
                None => {
                    let kinds: Vec<Value> = registry
                        .descriptors()
                        .map(|descriptor| {
                            json!({
                                "kind": descriptor.kind().as_str(),
                                "branch": descriptor.branch(),
                                "parent": descriptor.kind().parent().map(|p| p.as_str()),
                            })
                        })
                        .collect();
                    emit(&Value::Array(kinds))
                }
            }
        }

        Commands::Query { sql } => {
            let store = open_store(&config)?;
            let result = store.query(&sql)?;
            info!(rows = result.len(), "Query complete");
            emit(&json!({
                "headers": result.headers,
                "rows": result.to_json(),
            }))
        }

        Commands::Get { ids, kind } => {
            let store = open_store(&config)?;
            let kind = match kind {
                Some(name) => Some(store.registry().resolve(&name)?.kind()),
                None => None,
            };
            let lookup = store.get_many(&ids, kind)?;
            let records: Vec<Value> = lookup
                .found
                .iter()
                .map(|entity| Value::Object(entity.to_record()))
                .collect();
            emit(&Value::Array(records))?;

            if !lookup.is_complete() {
                bail!("No record found for id(s): {}", lookup.missing.join(", "));
            }
            Ok(())
        }

        Commands::Save { files, overwrite } => {
            let store = open_store(&config)?;
            let mut entities = Vec::new();
            for file in &files {
                entities.extend(read_entities(file)?);
            }

            let diagnostics: usize = entities.iter().map(|e| e.case_diagnostics().len()).sum();
            if diagnostics > 0 {
                warn!(count = diagnostics, "Records contain non-canonical enum casing");
            }

            store.save_all(&entities, overwrite)?;
            let saved: Vec<Value> = entities
                .iter()
                .map(|e| json!({ "id": e.id(), "kind": e.kind().as_str() }))
                .collect();
            emit(&Value::Array(saved))
        }
    }
}

fn open_store(config: &CyberDemConfig) -> Result<Store> {
    let path = config.store_path();
    Store::open_with(&path, config.store_options())
        .with_context(|| format!("Failed to open store at {}", path.display()))
}

fn read_entities(path: &Path) -> Result<Vec<Entity>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let records: Vec<Map<String, Value>> = match value {
        Value::Object(record) => vec![record],
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => bail!("Expected a record object in {}, got {}", path.display(), other),
            })
            .collect::<Result<_>>()?,
        other => bail!("Expected a record or array of records in {}, got {}", path.display(), other),
    };

    records
        .iter()
        .map(|record| {
            Entity::from_record(record)
                .with_context(|| format!("Invalid record in {}", path.display()))
        })
        .collect()
}

fn emit(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
