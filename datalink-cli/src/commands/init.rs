//! `datalink init --source-host <h> --source-schema <s> --table <t> --local-host <h> --local-schema <s>`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use datalink_store::{
    config::{self, Connection, LinkConfig, LocalConfig, SourceConfig},
    naming,
};

/// Write `~/.datalink/config.yaml`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Host serving the source table and the outbound control table.
    #[arg(long)]
    pub source_host: String,

    /// Schema of the source table.
    #[arg(long)]
    pub source_schema: String,

    /// Name of the source table (the local table uses the same name).
    #[arg(long)]
    pub table: String,

    /// Host receiving the local copy.
    #[arg(long)]
    pub local_host: String,

    /// Schema receiving the local copy.
    #[arg(long)]
    pub local_schema: String,

    /// Schema for the outbound control table. Defaults to `<source schema>_outbound`.
    #[arg(long)]
    pub outbound_schema: Option<String>,

    /// Root directory for repository files. Defaults to `~/.datalink/data`.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[arg(long)]
    pub source_user: Option<String>,

    /// Environment variable holding the source password.
    #[arg(long, value_name = "VAR")]
    pub source_password_env: Option<String>,

    #[arg(long)]
    pub local_user: Option<String>,

    /// Environment variable holding the local password.
    #[arg(long, value_name = "VAR")]
    pub local_password_env: Option<String>,
}

impl InitArgs {
    pub fn run(self, home: &Path) -> Result<()> {
        let existed = config::config_path_at(home).exists();
        let cfg = LinkConfig {
            source: SourceConfig {
                connection: Connection {
                    user: self.source_user,
                    password_env: self.source_password_env,
                    ..Connection::new(self.source_host)
                },
                schema: self.source_schema,
                table: self.table,
            },
            local: LocalConfig {
                connection: Connection {
                    user: self.local_user,
                    password_env: self.local_password_env,
                    ..Connection::new(self.local_host)
                },
                schema: self.local_schema,
            },
            outbound_schema: self.outbound_schema,
            data_dir: self.data_dir,
        };

        let cfg = config::init_at(home, cfg).context("failed to write link config")?;
        if existed {
            println!("✓ Config already present; left unchanged");
        } else {
            println!(
                "✓ Linked {}.{} → {}.{}",
                cfg.source.schema, cfg.source.table, cfg.local.schema, cfg.source.table
            );
        }
        println!("  Config:   {}", config::config_path_at(home).display());
        println!(
            "  Outbound: {}.{}",
            cfg.outbound_schema(),
            naming::outbound_table_name(&cfg)
        );
        Ok(())
    }
}
