//! # datalink-store
//!
//! Reference storage adapter for the datalink gateways: a [`Table`] document
//! per repository, persisted by a [`Backend`] (in memory, or as an atomically
//! replaced JSON file), plus link configuration and outbound table naming.

pub mod backend;
pub mod config;
pub mod error;
pub mod gateway;
pub mod naming;
pub mod table;

pub use backend::{Backend, Credentials, FileBackend, MemoryBackend};
pub use config::{open_at, FileRepositories, LinkConfig};
pub use error::StoreError;
pub use gateway::{ControlTable, LocalTable, OutboundTable, SourceTable};
pub use table::{Row, Table};
