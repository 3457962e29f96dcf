//! `datalink refresh [--json]`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use datalink_sync::{pipeline, Operation, Outcome};

use super::{open_link, print_ids, print_json};

/// Mark local rows whose deletion the source has requested.
#[derive(Args, Debug)]
pub struct RefreshArgs {
    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl RefreshArgs {
    pub fn run(self, home: &Path) -> Result<()> {
        let mut link = open_link(home)?;
        let outcome = pipeline::run(&mut link, Operation::Refresh).context("refresh failed")?;

        if self.json {
            return print_json(&outcome);
        }
        if let Outcome::Refresh(report) = outcome {
            if report.flagged.is_empty() {
                println!("✓ No new deletion requests");
            } else {
                println!(
                    "✓ {} row(s) now marked for deletion",
                    report.flagged.len()
                );
                print_ids(&"!".yellow().bold().to_string(), &report.flagged);
            }
        }
        Ok(())
    }
}
