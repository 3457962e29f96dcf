//! Subcommand implementations and the wiring they share.

pub mod delete;
pub mod init;
pub mod list;
pub mod pull;
pub mod refresh;
pub mod request;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use datalink_core::{IdSet, Identifier};
use datalink_store::{config, FileBackend, LocalTable, OutboundTable, SourceTable};
use datalink_sync::Repositories;

pub type FileLink = Repositories<
    SourceTable<FileBackend>,
    OutboundTable<FileBackend>,
    LocalTable<FileBackend>,
>;

pub fn resolve_home(home: Option<PathBuf>) -> Result<PathBuf> {
    match home {
        Some(home) => Ok(home),
        None => config::home().context("could not determine home directory"),
    }
}

/// Load the config under `home` and open its three repositories.
pub fn open_link(home: &Path) -> Result<FileLink> {
    let cfg = config::load_at(home).context("failed to load link config")?;
    let repos = datalink_store::open_at(home, &cfg).context("failed to open repositories")?;
    Ok(Repositories::new(repos.source, repos.outbound, repos.local))
}

pub fn id_set(ids: Vec<String>) -> IdSet {
    ids.into_iter().map(Identifier::from).collect()
}

pub fn join_ids(ids: &IdSet) -> String {
    ids.iter()
        .map(Identifier::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to encode JSON")?
    );
    Ok(())
}

/// Advisory output on stderr; never changes the exit status.
pub fn warn(message: impl std::fmt::Display) {
    eprintln!("{} {message}", "warning:".yellow().bold());
}

pub fn print_ids(marker: &str, ids: &IdSet) {
    for id in ids {
        println!("  {marker}  {id}");
    }
}
