//! Gateway implementations over a [`Backend`].
//!
//! Each call loads the table, applies the operation, and saves the result as
//! a whole, so a batch either lands completely or not at all.

use std::marker::PhantomData;

use datalink_core::{
    GatewayError, IdSet, Identifier, LocalFlag, OutboundFlag, Payloads, ReadGateway, Role,
    RoleFlag, WriteGateway,
};

use crate::backend::{Backend, MemoryBackend};
use crate::error::StoreError;
use crate::table::Table;

fn unavailable(role: Role) -> impl Fn(StoreError) -> GatewayError {
    move |err| GatewayError::unavailable(role, err)
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Read-only gateway to the Source repository.
#[derive(Debug, Clone)]
pub struct SourceTable<B> {
    backend: B,
}

impl<B: Backend> SourceTable<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Source-owner tooling: insert or replace rows outside the gateway
    /// contract.
    pub fn upsert(&mut self, payloads: Payloads) -> Result<(), StoreError> {
        let mut table = self.backend.load()?;
        table.upsert(payloads);
        self.backend.save(&table)
    }

    /// Source-owner tooling: drop a row outside the gateway contract.
    pub fn remove(&mut self, id: &Identifier) -> Result<(), StoreError> {
        let mut table = self.backend.load()?;
        table.delete(id)?;
        self.backend.save(&table)
    }
}

impl SourceTable<MemoryBackend> {
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new(Role::Source))
    }
}

impl<B: Backend> ReadGateway for SourceTable<B> {
    fn role(&self) -> Role {
        Role::Source
    }

    fn identifiers(&self) -> Result<IdSet, GatewayError> {
        let table = self.backend.load().map_err(unavailable(Role::Source))?;
        Ok(table.identifiers())
    }

    fn fetch(&self, ids: &IdSet) -> Result<Payloads, GatewayError> {
        let table = self.backend.load().map_err(unavailable(Role::Source))?;
        table.fetch(ids)
    }
}

// ---------------------------------------------------------------------------
// Outbound / Local
// ---------------------------------------------------------------------------

/// Writable gateway whose flags are typed by `F`.
#[derive(Debug, Clone)]
pub struct ControlTable<B, F> {
    backend: B,
    _flag: PhantomData<F>,
}

/// Gateway to the Outbound control repository.
pub type OutboundTable<B> = ControlTable<B, OutboundFlag>;

/// Gateway to the Local mirror repository.
pub type LocalTable<B> = ControlTable<B, LocalFlag>;

impl<B: Backend, F: RoleFlag> ControlTable<B, F> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            _flag: PhantomData,
        }
    }

    fn load(&self) -> Result<Table, GatewayError> {
        self.backend.load().map_err(unavailable(F::ROLE))
    }

    fn update<T>(
        &mut self,
        op: impl FnOnce(&mut Table) -> Result<T, GatewayError>,
    ) -> Result<T, GatewayError> {
        let mut table = self.load()?;
        let out = op(&mut table)?;
        self.backend.save(&table).map_err(unavailable(F::ROLE))?;
        Ok(out)
    }
}

impl<F: RoleFlag> ControlTable<MemoryBackend, F> {
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new(F::ROLE))
    }
}

impl<B: Backend, F: RoleFlag> ReadGateway for ControlTable<B, F> {
    fn role(&self) -> Role {
        F::ROLE
    }

    fn identifiers(&self) -> Result<IdSet, GatewayError> {
        Ok(self.load()?.identifiers())
    }

    fn fetch(&self, ids: &IdSet) -> Result<Payloads, GatewayError> {
        self.load()?.fetch(ids)
    }
}

impl<B: Backend, F: RoleFlag> WriteGateway for ControlTable<B, F> {
    type Flag = F;

    fn flagged(&self, flag: F) -> Result<IdSet, GatewayError> {
        Ok(self.load()?.flagged(flag.into()))
    }

    fn insert(&mut self, payloads: &Payloads) -> Result<(), GatewayError> {
        if payloads.is_empty() {
            return Ok(());
        }
        self.update(|table| table.insert(payloads))
    }

    fn delete(&mut self, id: &Identifier) -> Result<(), GatewayError> {
        self.update(|table| table.delete(id))
    }

    fn set_flag(&mut self, id: &Identifier, flag: F, value: bool) -> Result<(), GatewayError> {
        self.update(|table| table.set_flag(id, flag.into(), value))
    }
}
