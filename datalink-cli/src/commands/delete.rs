//! `datalink delete <ID>... [--json]`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use datalink_sync::{pipeline, DeleteReport, Operation, Outcome};

use super::{id_set, open_link, print_ids, print_json};

/// Remove rows from the local repository.
///
/// Rows the source asked to delete are approved on the outbound table;
/// any other row is dropped from the outbound table as well.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Identifiers to remove.
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl DeleteArgs {
    pub fn run(self, home: &Path) -> Result<()> {
        let mut link = open_link(home)?;
        let outcome =
            pipeline::run(&mut link, Operation::Delete(id_set(self.ids))).context("delete failed")?;

        if self.json {
            return print_json(&outcome);
        }
        if let Outcome::Delete(report) = outcome {
            print_report(&report);
        }
        Ok(())
    }
}

fn print_report(report: &DeleteReport) {
    if !report.approved.is_empty() {
        println!("✓ Approved {} source deletion request(s)", report.approved.len());
        print_ids(&"✓".green().to_string(), &report.approved);
    }
    if !report.removed.is_empty() {
        println!("✓ Removed {} row(s)", report.removed.len());
        print_ids(&"-".red().to_string(), &report.removed);
    }
}
