//! `datalink request-deletion <ID>...`
//!
//! Source-owner side of the protocol: raise `deletion_requested` on the
//! outbound table. The local side sees it on its next refresh.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use datalink_core::{error::ensure_present, OutboundFlag, ReadGateway, WriteGateway};

use super::{id_set, open_link, print_ids};

#[derive(Args, Debug)]
pub struct RequestDeletionArgs {
    /// Identifiers the source owner wants removed downstream.
    #[arg(required = true)]
    pub ids: Vec<String>,
}

impl RequestDeletionArgs {
    pub fn run(self, home: &Path) -> Result<()> {
        let mut link = open_link(home)?;
        let ids = id_set(self.ids);
        let outbound = &mut link.outbound;

        ensure_present(outbound.role(), &outbound.identifiers()?, &ids)?;
        for id in &ids {
            outbound
                .set_flag(id, OutboundFlag::DeletionRequested, true)
                .with_context(|| format!("failed to request deletion of {id}"))?;
        }
        tracing::info!(count = ids.len(), "deletion requested");

        println!("✓ Requested deletion of {} row(s)", ids.len());
        print_ids("?", &ids);
        Ok(())
    }
}
