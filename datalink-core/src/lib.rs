//! datalink core library: entity model, gateway contract, entity creator,
//! and the per-pull data cache.
//!
//! - [`types`]: identifiers, roles, typed flags, entities
//! - [`error`]: [`GatewayError`]
//! - [`gateway`]: [`ReadGateway`] / [`WriteGateway`]
//! - [`creator`]: entities from gateway state
//! - [`cache`]: [`DataCache`]

pub mod cache;
pub mod creator;
pub mod error;
pub mod gateway;
pub mod types;

pub use cache::DataCache;
pub use creator::EntityCreator;
pub use error::GatewayError;
pub use gateway::{LocalGateway, OutboundGateway, ReadGateway, WriteGateway};
pub use types::{
    id_set, Entity, Flag, IdSet, Identifier, LocalEntity, LocalFlag, OutboundEntity, OutboundFlag,
    Payload, Payloads, Role, RoleFlag, SourceEntity,
};
