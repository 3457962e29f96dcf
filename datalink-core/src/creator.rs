//! Entity creation from gateway state.
//!
//! Entities are built from one repository's identifiers plus that same
//! repository's flags. Flags are never borrowed across repositories here;
//! moving a flag from Outbound to Local is the Refresh use case's job.

use crate::error::GatewayError;
use crate::gateway::{LocalGateway, OutboundGateway, ReadGateway};
use crate::types::{
    Entity, LocalEntity, LocalFlag, OutboundEntity, OutboundFlag, Role, SourceEntity,
};

/// One [`SourceEntity`] per Source identifier, sorted by identifier.
pub fn source_entities<G>(gateway: &G) -> Result<Vec<SourceEntity>, GatewayError>
where
    G: ReadGateway + ?Sized,
{
    Ok(gateway
        .identifiers()?
        .into_iter()
        .map(|identifier| SourceEntity { identifier })
        .collect())
}

/// One [`LocalEntity`] per Local identifier, sorted by identifier.
pub fn local_entities<G>(gateway: &G) -> Result<Vec<LocalEntity>, GatewayError>
where
    G: LocalGateway + ?Sized,
{
    let requested = gateway.flagged(LocalFlag::DeletionRequested)?;
    Ok(gateway
        .identifiers()?
        .into_iter()
        .map(|identifier| LocalEntity {
            deletion_requested: requested.contains(&identifier),
            identifier,
        })
        .collect())
}

/// One [`OutboundEntity`] per Outbound identifier, sorted by identifier.
pub fn outbound_entities<G>(gateway: &G) -> Result<Vec<OutboundEntity>, GatewayError>
where
    G: OutboundGateway + ?Sized,
{
    let requested = gateway.flagged(OutboundFlag::DeletionRequested)?;
    let approved = gateway.flagged(OutboundFlag::DeletionApproved)?;
    Ok(gateway
        .identifiers()?
        .into_iter()
        .map(|identifier| OutboundEntity {
            deletion_requested: requested.contains(&identifier),
            deletion_approved: approved.contains(&identifier),
            identifier,
        })
        .collect())
}

/// Role-dispatching creator over one gateway per repository.
pub struct EntityCreator<'a, S: ?Sized, O: ?Sized, L: ?Sized> {
    pub source: &'a S,
    pub outbound: &'a O,
    pub local: &'a L,
}

impl<'a, S, O, L> EntityCreator<'a, S, O, L>
where
    S: ReadGateway + ?Sized,
    O: OutboundGateway + ?Sized,
    L: LocalGateway + ?Sized,
{
    pub fn new(source: &'a S, outbound: &'a O, local: &'a L) -> Self {
        Self {
            source,
            outbound,
            local,
        }
    }

    /// Entities of the repository playing `role`.
    pub fn create(&self, role: Role) -> Result<Vec<Entity>, GatewayError> {
        let entities = match role {
            Role::Source => source_entities(self.source)?
                .into_iter()
                .map(Entity::from)
                .collect(),
            Role::Outbound => outbound_entities(self.outbound)?
                .into_iter()
                .map(Entity::from)
                .collect(),
            Role::Local => local_entities(self.local)?
                .into_iter()
                .map(Entity::from)
                .collect(),
        };
        Ok(entities)
    }
}
