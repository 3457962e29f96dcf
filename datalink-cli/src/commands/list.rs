//! `datalink list source|outbound|local [--json]`

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use datalink_core::{Entity, Flag, Role};

use super::{open_link, print_json};

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Repository to list.
    #[arg(value_enum)]
    pub repository: Repository,

    /// Print entities as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repository {
    Source,
    Outbound,
    Local,
}

impl From<Repository> for Role {
    fn from(repo: Repository) -> Self {
        match repo {
            Repository::Source => Role::Source,
            Repository::Outbound => Role::Outbound,
            Repository::Local => Role::Local,
        }
    }
}

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "identifier")]
    identifier: String,
    #[tabled(rename = "deletion requested")]
    requested: String,
    #[tabled(rename = "deletion approved")]
    approved: String,
}

impl ListArgs {
    pub fn run(self, home: &Path) -> Result<()> {
        let link = open_link(home)?;
        let role = Role::from(self.repository);
        let entities = link
            .entities(role)
            .with_context(|| format!("failed to list {role} repository"))?;

        if self.json {
            return print_json(&entities);
        }
        if entities.is_empty() {
            println!("{} repository is empty", role);
            return Ok(());
        }

        let rows: Vec<EntityRow> = entities.iter().map(entity_row).collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

fn entity_row(entity: &Entity) -> EntityRow {
    EntityRow {
        identifier: entity.identifier().to_string(),
        requested: flag_cell(entity.flag(Flag::DeletionRequested)),
        approved: flag_cell(entity.flag(Flag::DeletionApproved)),
    }
}

fn flag_cell(value: Option<bool>) -> String {
    match value {
        None => "-".dimmed().to_string(),
        Some(true) => "yes".yellow().bold().to_string(),
        Some(false) => "no".to_string(),
    }
}
