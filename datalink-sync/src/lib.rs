//! # datalink-sync
//!
//! The three orchestration use cases over the datalink gateways.
//!
//! Call [`pull`] to mirror Source rows, [`delete`] to drop rows from the
//! local view, and [`refresh`] to carry source-side deletion requests down to
//! Local. [`pipeline::run`] dispatches one [`pipeline::Operation`] against a
//! bundle of gateways. Use cases hold no state of their own and never call
//! each other.

pub mod delete;
pub mod pipeline;
pub mod pull;
pub mod refresh;

pub use delete::{delete, DeleteReport};
pub use pipeline::{Operation, Outcome, Repositories};
pub use pull::{pull, PullReport};
pub use refresh::{refresh, RefreshReport};
