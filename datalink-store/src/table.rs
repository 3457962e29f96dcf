//! In-memory table document shared by every backend.
//!
//! A table is the full state of one repository: its role plus one row per
//! identifier. Every mutating method validates the whole request before it
//! touches `rows`, so a failed batch leaves the table unchanged.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use datalink_core::{
    error::ensure_present, Flag, GatewayError, IdSet, Identifier, Payload, Payloads, Role,
};

use crate::error::StoreError;

/// One stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub payload: Payload,
    /// Raised flags; an absent flag is false.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub flags: BTreeSet<Flag>,
}

impl Row {
    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            flags: BTreeSet::new(),
        }
    }
}

/// On-disk / in-memory repository document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub role: Role,
    #[serde(default)]
    pub rows: BTreeMap<Identifier, Row>,
}

impl Table {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            rows: BTreeMap::new(),
        }
    }

    /// Reject rows carrying flags their role does not define.
    pub fn validate(&self) -> Result<(), StoreError> {
        for (identifier, row) in &self.rows {
            if let Some(flag) = row.flags.iter().find(|f| !self.role.permits(**f)) {
                return Err(StoreError::ForbiddenFlag {
                    role: self.role,
                    identifier: identifier.clone(),
                    flag: *flag,
                });
            }
        }
        Ok(())
    }

    pub fn identifiers(&self) -> IdSet {
        self.rows.keys().cloned().collect()
    }

    pub fn flagged(&self, flag: Flag) -> IdSet {
        self.rows
            .iter()
            .filter(|(_, row)| row.flags.contains(&flag))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn fetch(&self, ids: &IdSet) -> Result<Payloads, GatewayError> {
        ensure_present(self.role, &self.identifiers(), ids)?;
        Ok(ids
            .iter()
            .filter_map(|id| self.rows.get(id).map(|row| (id.clone(), row.payload.clone())))
            .collect())
    }

    pub fn insert(&mut self, payloads: &Payloads) -> Result<(), GatewayError> {
        let duplicates: Vec<Identifier> = payloads
            .keys()
            .filter(|id| self.rows.contains_key(*id))
            .cloned()
            .collect();
        if !duplicates.is_empty() {
            return Err(GatewayError::duplicate(self.role, duplicates));
        }
        for (id, payload) in payloads {
            self.rows.insert(id.clone(), Row::new(payload.clone()));
        }
        Ok(())
    }

    /// Insert or replace rows, keeping flags of replaced rows.
    pub fn upsert(&mut self, payloads: Payloads) {
        for (id, payload) in payloads {
            match self.rows.get_mut(&id) {
                Some(row) => row.payload = payload,
                None => {
                    self.rows.insert(id, Row::new(payload));
                }
            }
        }
    }

    pub fn delete(&mut self, id: &Identifier) -> Result<(), GatewayError> {
        match self.rows.remove(id) {
            Some(_) => Ok(()),
            None => Err(GatewayError::missing(self.role, [id.clone()])),
        }
    }

    /// Set one flag. Callers pass only flags their role's typed enum allows.
    pub fn set_flag(&mut self, id: &Identifier, flag: Flag, value: bool) -> Result<(), GatewayError> {
        let Some(row) = self.rows.get_mut(id) else {
            return Err(GatewayError::missing(self.role, [id.clone()]));
        };
        if value {
            row.flags.insert(flag);
        } else {
            row.flags.remove(&flag);
        }
        Ok(())
    }
}
