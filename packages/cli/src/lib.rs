//! # coordstore-cli
//!
//! `coordctl` reads and writes a coordstore tree kept in a local directory.
//!
//! ## Usage
//!
//! ```bash
//! coordctl set /clients/:id/hostname db1 -p :id=23
//! coordctl ls /clients
//! coordctl tree /clients
//! coordctl import /services services.json --json-leaves
//! coordctl rm /clients/:id -p :id=23
//! ```
//!
//! Every path argument is a template; `-p KEY=VALUE` binds a placeholder.
//! The store root comes from `--root`, then `COORDCTL_ROOT`, then
//! `<local data dir>/coordstore`.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coordstore_core::{NodePath, Params, Session, Storage};
use coordstore_node_store::LocalDiskClient;
use coordstore_serde::{LeafEncoding, SerdeError, TypedSession};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// coordctl - read and write a coordination store tree
#[derive(Parser, Debug)]
#[command(name = "coordctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the store
    #[arg(long, env = "COORDCTL_ROOT", global = true)]
    pub root: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the children of a node, sorted
    Ls(Target),
    /// Print a node's value
    Get(Target),
    /// Print whether a node exists
    Exists(Target),
    /// Set a node's value, creating missing ancestors
    Set {
        #[command(flatten)]
        target: Target,
        /// The value to store
        value: String,
    },
    /// Delete a node and everything below it
    Rm(Target),
    /// Print everything below a node as JSON
    Tree {
        #[command(flatten)]
        target: Target,
        /// Leaves hold JSON scalars instead of plain text
        #[arg(long)]
        json_leaves: bool,
    },
    /// Write a JSON file below a node
    Import {
        #[command(flatten)]
        target: Target,
        /// JSON file to import
        file: PathBuf,
        /// Store leaves as JSON scalars instead of plain text
        #[arg(long)]
        json_leaves: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct Target {
    /// Path template, e.g. /clients/:id
    pub path: String,

    /// Placeholder binding, KEY=VALUE (repeatable)
    #[arg(short = 'p', long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

impl Target {
    fn params(&self) -> Params {
        self.params.iter().map(|(k, v)| (k.as_str(), v)).collect()
    }

    fn resolve(&self) -> NodePath {
        NodePath::resolve(&self.path, &self.params())
    }
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

fn encoding(json_leaves: bool) -> LeafEncoding {
    if json_leaves {
        LeafEncoding::Json
    } else {
        LeafEncoding::Text
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] coordstore_core::Error),

    #[error(transparent)]
    Serde(#[from] SerdeError),

    #[error("no node at {path}")]
    NotFound { path: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("invalid JSON in {file}: {source}")]
    Json {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// The store root: `--root`/`COORDCTL_ROOT`, or the per-user default.
///
/// The default directory is created on first use; an explicit root must
/// already exist.
pub fn store_root(cli_root: Option<PathBuf>) -> Result<PathBuf, CliError> {
    if let Some(root) = cli_root {
        return Ok(root);
    }
    let root = dirs::data_local_dir()
        .map(|p| p.join("coordstore"))
        .ok_or_else(|| CliError::Config {
            message: "no local data directory; pass --root".to_string(),
        })?;
    fs::create_dir_all(&root)?;
    Ok(root)
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `level`.
pub fn init_logging(level: tracing::Level) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_filter(env_filter);

    // A second call (as in tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry().with(stderr_layer).try_init();
}

/// Run one command, writing its output to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<(), CliError> {
    let root = store_root(cli.root)?;
    let session = Session::connect(root.display(), || LocalDiskClient::open(&root))?;
    let mut storage = Storage::new(session);
    tracing::debug!(root = %root.display(), command = ?cli.command, "running");

    match cli.command {
        Command::Ls(target) => {
            for name in storage.get_list(&target.path, &target.params())? {
                writeln!(out, "{}", name)?;
            }
        }
        Command::Get(target) => {
            let value = storage
                .get(&target.path, &target.params())?
                .ok_or_else(|| CliError::NotFound {
                    path: target.resolve().to_string(),
                })?;
            out.write_all(&value)?;
            writeln!(out)?;
        }
        Command::Exists(target) => {
            writeln!(out, "{}", storage.exists(&target.path, &target.params())?)?;
        }
        Command::Set { target, value } => {
            storage.set(&target.path, value.into_bytes(), &target.params())?;
        }
        Command::Rm(target) => {
            storage.delete(&target.path, &target.params())?;
        }
        Command::Tree {
            target,
            json_leaves,
        } => {
            let json = storage
                .session_mut()
                .read_json(&target.resolve(), encoding(json_leaves))?;
            writeln!(out, "{}", pretty(&json))?;
        }
        Command::Import {
            target,
            file,
            json_leaves,
        } => {
            let text = fs::read_to_string(&file)?;
            let value: serde_json::Value =
                serde_json::from_str(&text).map_err(|source| CliError::Json {
                    file: file.clone(),
                    source,
                })?;
            storage
                .session_mut()
                .write_json(&target.resolve(), &value, encoding(json_leaves))?;
            tracing::info!(file = %file.display(), "imported");
        }
    }
    Ok(())
}

fn pretty(json: &serde_json::Value) -> String {
    serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string())
}
