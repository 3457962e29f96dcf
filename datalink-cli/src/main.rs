//! datalink: mirror a source table into a local copy with source-controlled
//! deletion.
//!
//! # Usage
//!
//! ```text
//! datalink init --source-host <h> --source-schema <s> --table <t> --local-host <h> --local-schema <s>
//! datalink pull [ID...] [--json]
//! datalink delete <ID>... [--json]
//! datalink refresh [--json]
//! datalink list source|outbound|local [--json]
//! datalink request-deletion <ID>...
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    delete::DeleteArgs, init::InitArgs, list::ListArgs, pull::PullArgs, refresh::RefreshArgs,
    request::RequestDeletionArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "datalink",
    version,
    about = "Mirror source rows locally while the source owner controls deletion",
    long_about = None,
)]
struct Cli {
    /// Directory holding `.datalink/` (defaults to the user's home).
    #[arg(long, global = true, value_name = "DIR")]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write the link configuration.
    Init(InitArgs),

    /// Mirror source rows into the outbound and local repositories.
    Pull(PullArgs),

    /// Remove rows from the local repository.
    Delete(DeleteArgs),

    /// Carry source-side deletion requests down to the local repository.
    Refresh(RefreshArgs),

    /// List the entities of one repository.
    List(ListArgs),

    /// Source-side: request deletion of mirrored rows.
    RequestDeletion(RequestDeletionArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let home = commands::resolve_home(cli.home)?;
    match cli.command {
        Commands::Init(args) => args.run(&home),
        Commands::Pull(args) => args.run(&home),
        Commands::Delete(args) => args.run(&home),
        Commands::Refresh(args) => args.run(&home),
        Commands::List(args) => args.run(&home),
        Commands::RequestDeletion(args) => args.run(&home),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
