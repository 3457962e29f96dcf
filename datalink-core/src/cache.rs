//! Per-pull payload cache.
//!
//! Holds payloads between the fetch from Source and the inserts into
//! Outbound and Local. Entries are only ever added or overwritten whole; a
//! cache lives for one Pull and is never persisted.

use crate::types::{IdSet, Identifier, Payloads};

#[derive(Debug, Default, Clone)]
pub struct DataCache {
    entries: Payloads,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk insert; an existing entry for the same id is replaced.
    pub fn extend(&mut self, payloads: Payloads) {
        self.entries.extend(payloads);
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.entries.contains_key(id)
    }

    /// Ids from `wanted` that still have to be fetched.
    pub fn missing(&self, wanted: &IdSet) -> IdSet {
        wanted
            .iter()
            .filter(|id| !self.contains(id))
            .cloned()
            .collect()
    }

    /// Cached payloads for `ids`; ids not in the cache are left out.
    pub fn select(&self, ids: &IdSet) -> Payloads {
        ids.iter()
            .filter_map(|id| self.entries.get(id).map(|p| (id.clone(), p.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{id_set, Payload};

    fn payload(value: i64) -> Payload {
        let mut p = Payload::new();
        p.insert("value".to_string(), json!(value));
        p
    }

    #[test]
    fn missing_excludes_cached_ids() {
        let mut cache = DataCache::new();
        cache.extend(Payloads::from([("a".into(), payload(1))]));
        assert_eq!(cache.missing(&id_set(["a", "b"])), id_set(["b"]));
    }

    #[test]
    fn extend_overwrites_whole_entries() {
        let mut cache = DataCache::new();
        cache.extend(Payloads::from([("a".into(), payload(1))]));
        cache.extend(Payloads::from([("a".into(), payload(2))]));
        let selected = cache.select(&id_set(["a"]));
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.get(&Identifier::from("a")), Some(&payload(2)));
    }

    #[test]
    fn select_skips_uncached_ids() {
        let mut cache = DataCache::new();
        cache.extend(Payloads::from([("a".into(), payload(1))]));
        let selected = cache.select(&id_set(["a", "z"]));
        assert_eq!(selected.keys().cloned().collect::<IdSet>(), id_set(["a"]));
    }
}
