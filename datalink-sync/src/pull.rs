//! Pull: mirror Source rows into Outbound and Local.
//!
//! ## Steps
//!
//! 1. `candidates = Source ∩ restriction` (all of Source without one).
//! 2. Candidates with a pending deletion request on Outbound are skipped and
//!    reported; this is advisory, never an error.
//! 3. Candidates already in Local are left alone, so pulling twice changes
//!    nothing the second time.
//! 4. Payloads for the rest are fetched from Source into a fresh cache.
//! 5. Outbound is inserted first; Local only after Outbound succeeded.

use serde::Serialize;

use datalink_core::{
    DataCache, GatewayError, IdSet, LocalGateway, OutboundFlag, OutboundGateway, Payloads,
    ReadGateway,
};

/// Outcome of one pull.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullReport {
    /// Ids inserted into Outbound and Local by this call.
    pub pulled: IdSet,
    /// Ids left out because Outbound has a pending deletion request.
    pub skipped: IdSet,
    /// Restriction ids that Source does not hold.
    pub unknown: IdSet,
}

/// Pull `restriction` (or every Source row) into Outbound and Local.
pub fn pull<S, O, L>(
    source: &S,
    outbound: &mut O,
    local: &mut L,
    restriction: Option<&IdSet>,
) -> Result<PullReport, GatewayError>
where
    S: ReadGateway + ?Sized,
    O: OutboundGateway + ?Sized,
    L: LocalGateway + ?Sized,
{
    let available = source.identifiers()?;
    let (candidates, unknown) = match restriction {
        Some(wanted) => (
            wanted.intersection(&available).cloned().collect::<IdSet>(),
            wanted.difference(&available).cloned().collect::<IdSet>(),
        ),
        None => (available, IdSet::new()),
    };
    if !unknown.is_empty() {
        tracing::warn!(count = unknown.len(), ids = ?unknown, "not present in source; ignored");
    }

    let requested = outbound.flagged(OutboundFlag::DeletionRequested)?;
    let skipped: IdSet = candidates.intersection(&requested).cloned().collect();
    if !skipped.is_empty() {
        tracing::info!(
            count = skipped.len(),
            ids = ?skipped,
            "skipped: deletion requested by source"
        );
    }

    let already_local = local.identifiers()?;
    let new: IdSet = candidates
        .difference(&skipped)
        .filter(|id| !already_local.contains(*id))
        .cloned()
        .collect();
    if new.is_empty() {
        tracing::debug!("nothing to pull");
        return Ok(PullReport {
            pulled: IdSet::new(),
            skipped,
            unknown,
        });
    }

    let mut cache = DataCache::new();
    let to_fetch = cache.missing(&new);
    cache.extend(source.fetch(&to_fetch)?);
    let payloads = cache.select(&new);

    // Rows already in Outbound without a local copy were authorized by an
    // earlier pull that stopped before its Local insert.
    let in_outbound = outbound.identifiers()?;
    let outbound_payloads: Payloads = payloads
        .iter()
        .filter(|(id, _)| !in_outbound.contains(*id))
        .map(|(id, p)| (id.clone(), p.clone()))
        .collect();
    outbound.insert(&outbound_payloads)?;
    local.insert(&payloads)?;

    tracing::info!(count = new.len(), "pulled");
    Ok(PullReport {
        pulled: new,
        skipped,
        unknown,
    })
}

#[cfg(test)]
mod tests {
    use datalink_core::{id_set, Identifier, LocalFlag, Payload, WriteGateway};
    use datalink_store::{LocalTable, OutboundTable, SourceTable};
    use serde_json::json;

    use super::*;

    fn source_with(ids: &[&str]) -> SourceTable<datalink_store::MemoryBackend> {
        let mut source = SourceTable::in_memory();
        let payloads: Payloads = ids
            .iter()
            .map(|id| {
                let mut p = Payload::new();
                p.insert("id".to_string(), json!(id));
                (Identifier::from(*id), p)
            })
            .collect();
        source.upsert(payloads).unwrap();
        source
    }

    #[test]
    fn pulls_everything_without_restriction() {
        let source = source_with(&["a", "b"]);
        let mut outbound = OutboundTable::in_memory();
        let mut local = LocalTable::in_memory();

        let report = pull(&source, &mut outbound, &mut local, None).unwrap();
        assert_eq!(report.pulled, id_set(["a", "b"]));
        assert!(report.skipped.is_empty());
        assert_eq!(outbound.identifiers().unwrap(), id_set(["a", "b"]));
        assert_eq!(local.identifiers().unwrap(), id_set(["a", "b"]));
        assert!(local.flagged(LocalFlag::DeletionRequested).unwrap().is_empty());
    }

    #[test]
    fn payloads_are_copied_verbatim() {
        let source = source_with(&["a"]);
        let mut outbound = OutboundTable::in_memory();
        let mut local = LocalTable::in_memory();
        pull(&source, &mut outbound, &mut local, None).unwrap();

        let ids = id_set(["a"]);
        assert_eq!(local.fetch(&ids).unwrap(), source.fetch(&ids).unwrap());
        assert_eq!(outbound.fetch(&ids).unwrap(), source.fetch(&ids).unwrap());
    }

    #[test]
    fn restriction_limits_and_reports_unknown_ids() {
        let source = source_with(&["a", "b"]);
        let mut outbound = OutboundTable::in_memory();
        let mut local = LocalTable::in_memory();

        let restriction = id_set(["b", "zz"]);
        let report = pull(&source, &mut outbound, &mut local, Some(&restriction)).unwrap();
        assert_eq!(report.pulled, id_set(["b"]));
        assert_eq!(report.unknown, id_set(["zz"]));
        assert_eq!(local.identifiers().unwrap(), id_set(["b"]));
    }

    #[test]
    fn resumes_after_outbound_only_insert() {
        let source = source_with(&["a"]);
        let mut outbound = OutboundTable::in_memory();
        let mut local = LocalTable::in_memory();
        outbound.insert(&source.fetch(&id_set(["a"])).unwrap()).unwrap();

        let report = pull(&source, &mut outbound, &mut local, None).unwrap();
        assert_eq!(report.pulled, id_set(["a"]));
        assert_eq!(local.identifiers().unwrap(), id_set(["a"]));
    }
}
