//! Gateway contract: the only way use cases touch repository state.
//!
//! Every repository implements [`ReadGateway`]. Outbound and Local also
//! implement [`WriteGateway`], whose `Flag` type pins the flags each role may
//! carry. Source has no flags and is never written through a gateway.
//!
//! Batch operations are all-or-nothing: an implementation validates the whole
//! batch before committing any part of it.

use crate::error::GatewayError;
use crate::types::{IdSet, Identifier, LocalFlag, OutboundFlag, Payloads, Role, RoleFlag};

/// Read access shared by all three repository roles.
pub trait ReadGateway {
    /// Role of the repository behind this gateway.
    fn role(&self) -> Role;

    /// Current membership. No ordering guarantee beyond the set type.
    fn identifiers(&self) -> Result<IdSet, GatewayError>;

    /// Raw payloads for `ids`.
    ///
    /// Fails with [`GatewayError::MissingIdentifier`] if any id is absent.
    fn fetch(&self, ids: &IdSet) -> Result<Payloads, GatewayError>;
}

/// Mutating access for the Outbound and Local repositories.
pub trait WriteGateway: ReadGateway {
    type Flag: RoleFlag;

    /// Identifiers whose `flag` is currently true.
    fn flagged(&self, flag: Self::Flag) -> Result<IdSet, GatewayError>;

    /// Add new rows, every flag false.
    ///
    /// Fails with [`GatewayError::DuplicateIdentifier`] if any id exists.
    fn insert(&mut self, payloads: &Payloads) -> Result<(), GatewayError>;

    /// Remove a row and all of its flags.
    fn delete(&mut self, id: &Identifier) -> Result<(), GatewayError>;

    /// Set one flag on one row.
    fn set_flag(
        &mut self,
        id: &Identifier,
        flag: Self::Flag,
        value: bool,
    ) -> Result<(), GatewayError>;
}

/// Gateway for the Outbound control repository.
pub trait OutboundGateway: WriteGateway<Flag = OutboundFlag> {}
impl<T: WriteGateway<Flag = OutboundFlag>> OutboundGateway for T {}

/// Gateway for the Local mirror repository.
pub trait LocalGateway: WriteGateway<Flag = LocalFlag> {}
impl<T: WriteGateway<Flag = LocalFlag>> LocalGateway for T {}
