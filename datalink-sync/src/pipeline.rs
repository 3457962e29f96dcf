//! Shared use-case entrypoint used by the CLI.

use serde::Serialize;

use datalink_core::{
    Entity, EntityCreator, GatewayError, IdSet, LocalGateway, OutboundGateway, ReadGateway, Role,
};

use crate::{delete, pull, refresh, DeleteReport, PullReport, RefreshReport};

/// One gateway per repository role.
#[derive(Debug)]
pub struct Repositories<S, O, L> {
    pub source: S,
    pub outbound: O,
    pub local: L,
}

impl<S, O, L> Repositories<S, O, L>
where
    S: ReadGateway,
    O: OutboundGateway,
    L: LocalGateway,
{
    pub fn new(source: S, outbound: O, local: L) -> Self {
        Self {
            source,
            outbound,
            local,
        }
    }

    /// Entities of the repository playing `role`.
    pub fn entities(&self, role: Role) -> Result<Vec<Entity>, GatewayError> {
        EntityCreator::new(&self.source, &self.outbound, &self.local).create(role)
    }
}

/// A single use-case invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Pull the given ids, or every eligible Source id when `None`.
    Pull(Option<IdSet>),
    Delete(IdSet),
    Refresh,
}

/// Result of [`run`], one variant per operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum Outcome {
    Pull(PullReport),
    Delete(DeleteReport),
    Refresh(RefreshReport),
}

/// Run one operation against `repos`.
///
/// Gateway errors are returned unchanged; steps already applied in this
/// invocation are not rolled back.
pub fn run<S, O, L>(
    repos: &mut Repositories<S, O, L>,
    operation: Operation,
) -> Result<Outcome, GatewayError>
where
    S: ReadGateway,
    O: OutboundGateway,
    L: LocalGateway,
{
    tracing::debug!(?operation, "running");
    match operation {
        Operation::Pull(restriction) => pull(
            &repos.source,
            &mut repos.outbound,
            &mut repos.local,
            restriction.as_ref(),
        )
        .map(Outcome::Pull),
        Operation::Delete(ids) => {
            delete(&mut repos.outbound, &mut repos.local, &ids).map(Outcome::Delete)
        }
        Operation::Refresh => refresh(&repos.outbound, &mut repos.local).map(Outcome::Refresh),
    }
}
