//! Error types for datalink-core.

use std::fmt;

use thiserror::Error;

use crate::types::{IdSet, Identifier, Role};

/// All errors a gateway can surface to a use case.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The operation named identifiers absent from the target repository.
    #[error("{role} repository has no entry for {}", DisplayIds(.identifiers))]
    MissingIdentifier {
        role: Role,
        identifiers: Vec<Identifier>,
    },

    /// An insert collided with identifiers already present.
    #[error("{role} repository already contains {}", DisplayIds(.identifiers))]
    DuplicateIdentifier {
        role: Role,
        identifiers: Vec<Identifier>,
    },

    /// The storage collaborator behind the gateway could not be reached.
    #[error("{role} repository unavailable: {source}")]
    StorageUnavailable {
        role: Role,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl GatewayError {
    pub fn missing(role: Role, identifiers: impl IntoIterator<Item = Identifier>) -> Self {
        GatewayError::MissingIdentifier {
            role,
            identifiers: identifiers.into_iter().collect(),
        }
    }

    pub fn duplicate(role: Role, identifiers: impl IntoIterator<Item = Identifier>) -> Self {
        GatewayError::DuplicateIdentifier {
            role,
            identifiers: identifiers.into_iter().collect(),
        }
    }

    pub fn unavailable(
        role: Role,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        GatewayError::StorageUnavailable {
            role,
            source: source.into(),
        }
    }

    /// Repository the failing call was addressed to.
    pub fn role(&self) -> Role {
        match self {
            GatewayError::MissingIdentifier { role, .. }
            | GatewayError::DuplicateIdentifier { role, .. }
            | GatewayError::StorageUnavailable { role, .. } => *role,
        }
    }
}

/// Fails with [`GatewayError::MissingIdentifier`] unless every id in
/// `wanted` is in `present`.
pub fn ensure_present(role: Role, present: &IdSet, wanted: &IdSet) -> Result<(), GatewayError> {
    let missing: Vec<Identifier> = wanted.difference(present).cloned().collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(GatewayError::missing(role, missing))
    }
}

struct DisplayIds<'a>(&'a [Identifier]);

impl fmt::Display for DisplayIds<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(Identifier::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "[{joined}]")
    }
}
