//! Delete: remove rows from the local view.
//!
//! Per identifier, Outbound is mutated before Local:
//! - deletion requested on Outbound → set `deletion_approved`, keep the row;
//! - no request → delete the Outbound row.
//!
//! The Local row is deleted in both cases.
//!
//! Every id is checked against Local and Outbound before anything is
//! mutated, so an unknown id aborts the call with nothing changed. A storage
//! failure after that point stops the loop; ids handled before it stay
//! handled.

use serde::Serialize;

use datalink_core::{
    error::ensure_present, GatewayError, IdSet, LocalGateway, OutboundFlag, OutboundGateway,
};

/// Outcome of one delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    /// Source-requested deletions now approved on Outbound.
    pub approved: IdSet,
    /// Locally initiated removals, gone from Outbound as well.
    pub removed: IdSet,
}

pub fn delete<O, L>(outbound: &mut O, local: &mut L, ids: &IdSet) -> Result<DeleteReport, GatewayError>
where
    O: OutboundGateway + ?Sized,
    L: LocalGateway + ?Sized,
{
    let mut report = DeleteReport::default();
    if ids.is_empty() {
        return Ok(report);
    }

    ensure_present(local.role(), &local.identifiers()?, ids)?;
    ensure_present(outbound.role(), &outbound.identifiers()?, ids)?;
    let requested = outbound.flagged(OutboundFlag::DeletionRequested)?;

    for id in ids {
        if requested.contains(id) {
            outbound.set_flag(id, OutboundFlag::DeletionApproved, true)?;
            report.approved.insert(id.clone());
        } else {
            outbound.delete(id)?;
            report.removed.insert(id.clone());
        }
        local.delete(id)?;
        tracing::debug!(%id, "deleted from local");
    }

    tracing::info!(
        approved = report.approved.len(),
        removed = report.removed.len(),
        "delete finished"
    );
    Ok(report)
}
