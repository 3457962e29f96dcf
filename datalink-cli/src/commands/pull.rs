//! `datalink pull [ID...] [--json]`

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use datalink_sync::{pipeline, Operation, Outcome, PullReport};

use super::{id_set, join_ids, open_link, print_ids, print_json, warn};

/// Copy source rows into the outbound and local repositories.
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Restrict the pull to these identifiers (all source rows when empty).
    pub ids: Vec<String>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PullArgs {
    pub fn run(self, home: &Path) -> Result<()> {
        let mut link = open_link(home)?;
        let restriction = (!self.ids.is_empty()).then(|| id_set(self.ids));
        let outcome =
            pipeline::run(&mut link, Operation::Pull(restriction)).context("pull failed")?;

        if self.json {
            return print_json(&outcome);
        }
        if let Outcome::Pull(report) = outcome {
            print_report(&report);
        }
        Ok(())
    }
}

fn print_report(report: &PullReport) {
    if !report.unknown.is_empty() {
        warn(format!("not in source: {}", join_ids(&report.unknown)));
    }
    if !report.skipped.is_empty() {
        warn(format!(
            "skipped, deletion requested by source: {}",
            join_ids(&report.skipped)
        ));
    }
    if report.pulled.is_empty() {
        println!("✓ Nothing to pull");
        return;
    }
    println!("✓ Pulled {} row(s)", report.pulled.len());
    print_ids(&"+".green().to_string(), &report.pulled);
}
