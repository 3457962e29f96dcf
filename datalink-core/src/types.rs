//! Domain types for the datalink repositories.
//!
//! One identifier names the same logical row in Source, Outbound, and Local.
//! Entities grow in capability per role: Source rows carry no flags, Local
//! rows carry `deletion_requested`, Outbound rows carry both deletion flags.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed identifier for one logical row across all repositories.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Identifier {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Identifier {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Raw record contents as handed over by the storage collaborator.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Identifier set; ordered so reports and logs are deterministic.
pub type IdSet = BTreeSet<Identifier>;

/// Payloads keyed by identifier.
pub type Payloads = BTreeMap<Identifier, Payload>;

/// Build an [`IdSet`] from anything string-like.
pub fn id_set<I, S>(ids: I) -> IdSet
where
    I: IntoIterator<Item = S>,
    S: Into<Identifier>,
{
    ids.into_iter().map(Into::into).collect()
}

// ---------------------------------------------------------------------------
// Roles and flags
// ---------------------------------------------------------------------------

/// Which of the three repositories a gateway or entity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Source,
    Outbound,
    Local,
}

impl Role {
    /// Flags a repository of this role is allowed to carry.
    pub fn permitted_flags(self) -> &'static [Flag] {
        match self {
            Role::Source => &[],
            Role::Local => &[Flag::DeletionRequested],
            Role::Outbound => &[Flag::DeletionRequested, Flag::DeletionApproved],
        }
    }

    pub fn permits(self, flag: Flag) -> bool {
        self.permitted_flags().contains(&flag)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Source => write!(f, "source"),
            Role::Outbound => write!(f, "outbound"),
            Role::Local => write!(f, "local"),
        }
    }
}

/// Storage-level flag names. This is the closed set of every flag any
/// repository may hold; per-role typing lives in [`LocalFlag`] and
/// [`OutboundFlag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    DeletionRequested,
    DeletionApproved,
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::DeletionRequested => write!(f, "deletion_requested"),
            Flag::DeletionApproved => write!(f, "deletion_approved"),
        }
    }
}

/// A flag type bound to exactly one writable repository role.
///
/// A gateway's flag parameter is its `RoleFlag`, so pairing a flag with a
/// role that does not define it is a type error.
pub trait RoleFlag: Copy + fmt::Debug + Into<Flag> {
    const ROLE: Role;
}

/// Flags defined for the Local repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalFlag {
    DeletionRequested,
}

impl From<LocalFlag> for Flag {
    fn from(flag: LocalFlag) -> Self {
        match flag {
            LocalFlag::DeletionRequested => Flag::DeletionRequested,
        }
    }
}

impl RoleFlag for LocalFlag {
    const ROLE: Role = Role::Local;
}

/// Flags defined for the Outbound repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutboundFlag {
    DeletionRequested,
    DeletionApproved,
}

impl From<OutboundFlag> for Flag {
    fn from(flag: OutboundFlag) -> Self {
        match flag {
            OutboundFlag::DeletionRequested => Flag::DeletionRequested,
            OutboundFlag::DeletionApproved => Flag::DeletionApproved,
        }
    }
}

impl RoleFlag for OutboundFlag {
    const ROLE: Role = Role::Outbound;
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A row as seen in the Source repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntity {
    pub identifier: Identifier,
}

/// A row as seen in the Local repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalEntity {
    pub identifier: Identifier,
    pub deletion_requested: bool,
}

/// A row as seen in the Outbound control repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEntity {
    pub identifier: Identifier,
    pub deletion_requested: bool,
    pub deletion_approved: bool,
}

impl OutboundEntity {
    /// Approval without a prior request never comes out of a use case.
    pub fn is_consistent(&self) -> bool {
        !self.deletion_approved || self.deletion_requested
    }
}

/// Role-tagged entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Entity {
    Source(SourceEntity),
    Outbound(OutboundEntity),
    Local(LocalEntity),
}

impl Entity {
    pub fn identifier(&self) -> &Identifier {
        match self {
            Entity::Source(e) => &e.identifier,
            Entity::Outbound(e) => &e.identifier,
            Entity::Local(e) => &e.identifier,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Entity::Source(_) => Role::Source,
            Entity::Outbound(_) => Role::Outbound,
            Entity::Local(_) => Role::Local,
        }
    }

    /// Value of `flag` on this entity; `None` when the role has no such flag.
    pub fn flag(&self, flag: Flag) -> Option<bool> {
        match (self, flag) {
            (Entity::Source(_), _) => None,
            (Entity::Local(e), Flag::DeletionRequested) => Some(e.deletion_requested),
            (Entity::Local(_), Flag::DeletionApproved) => None,
            (Entity::Outbound(e), Flag::DeletionRequested) => Some(e.deletion_requested),
            (Entity::Outbound(e), Flag::DeletionApproved) => Some(e.deletion_approved),
        }
    }
}

impl From<SourceEntity> for Entity {
    fn from(e: SourceEntity) -> Self {
        Entity::Source(e)
    }
}

impl From<LocalEntity> for Entity {
    fn from(e: LocalEntity) -> Self {
        Entity::Local(e)
    }
}

impl From<OutboundEntity> for Entity {
    fn from(e: OutboundEntity) -> Self {
        Entity::Outbound(e)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
