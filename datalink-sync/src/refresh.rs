//! Refresh: copy source-side deletion requests from Outbound down to Local.
//!
//! Flags are only raised, never lowered, so running it again is a no-op.

use serde::Serialize;

use datalink_core::{GatewayError, IdSet, LocalFlag, LocalGateway, OutboundFlag, OutboundGateway};

/// Outcome of one refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// Local ids whose `deletion_requested` flag this call raised.
    pub flagged: IdSet,
}

pub fn refresh<O, L>(outbound: &O, local: &mut L) -> Result<RefreshReport, GatewayError>
where
    O: OutboundGateway + ?Sized,
    L: LocalGateway + ?Sized,
{
    let requested = outbound.flagged(OutboundFlag::DeletionRequested)?;
    let present = local.identifiers()?;
    let already = local.flagged(LocalFlag::DeletionRequested)?;

    let pending: IdSet = requested
        .intersection(&present)
        .filter(|id| !already.contains(*id))
        .cloned()
        .collect();
    for id in &pending {
        local.set_flag(id, LocalFlag::DeletionRequested, true)?;
    }

    if !pending.is_empty() {
        tracing::info!(count = pending.len(), "deletion requests refreshed");
    }
    Ok(RefreshReport { flagged: pending })
}
