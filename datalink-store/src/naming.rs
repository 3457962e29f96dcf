//! Deterministic naming of the outbound control table.
//!
//! The name is `outbound_` followed by the first 32 hex characters of a
//! SHA-256 over the link's identity, so repeated runs against the same
//! source table, hosts, and schemas address the same control table.

use sha2::{Digest, Sha256};

use crate::config::LinkConfig;

const PREFIX: &str = "outbound_";
const DIGEST_CHARS: usize = 32;

/// Name of the outbound control table for `config`.
pub fn outbound_table_name(config: &LinkConfig) -> String {
    let parts = [
        config.source.connection.host.as_str(),
        config.source.schema.as_str(),
        config.source.table.as_str(),
        config.local.connection.host.as_str(),
        config.local.schema.as_str(),
        &config.outbound_schema(),
    ];
    let mut h = Sha256::new();
    for part in parts {
        h.update(part.as_bytes());
        h.update([0u8]);
    }
    let digest = hex::encode(h.finalize());
    format!("{PREFIX}{}", &digest[..DIGEST_CHARS])
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::config::{Connection, LocalConfig, SourceConfig};

    fn config() -> LinkConfig {
        LinkConfig {
            source: SourceConfig {
                connection: Connection::new("db.lab"),
                schema: "lab_ephys".to_string(),
                table: "recording".to_string(),
            },
            local: LocalConfig {
                connection: Connection::new("localhost"),
                schema: "mirror".to_string(),
            },
            outbound_schema: None,
            data_dir: None,
        }
    }

    #[test]
    fn name_is_stable_and_prefixed() {
        let a = outbound_table_name(&config());
        let b = outbound_table_name(&config());
        assert_eq!(a, b);
        assert!(a.starts_with("outbound_"));
        assert_eq!(a.len(), PREFIX.len() + DIGEST_CHARS);
        assert!(a[PREFIX.len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn credentials_do_not_affect_name() {
        let mut other = config();
        other.source.connection.user = Some("someone".into());
        other.local.connection.password = Some("pw".into());
        assert_eq!(outbound_table_name(&config()), outbound_table_name(&other));
    }

    #[rstest]
    #[case::source_host(|c: &mut LinkConfig| c.source.connection.host = "db2".into())]
    #[case::source_schema(|c: &mut LinkConfig| c.source.schema = "other".into())]
    #[case::source_table(|c: &mut LinkConfig| c.source.table = "session".into())]
    #[case::local_host(|c: &mut LinkConfig| c.local.connection.host = "laptop".into())]
    #[case::local_schema(|c: &mut LinkConfig| c.local.schema = "copy".into())]
    #[case::outbound_schema(|c: &mut LinkConfig| c.outbound_schema = Some("ctl".into()))]
    fn every_identity_field_changes_name(#[case] mutate: fn(&mut LinkConfig)) {
        let mut other = config();
        mutate(&mut other);
        assert_ne!(outbound_table_name(&config()), outbound_table_name(&other));
    }

    #[test]
    fn field_boundaries_are_separated() {
        let mut a = config();
        a.source.schema = "ab".into();
        a.source.table = "c".into();
        let mut b = config();
        b.source.schema = "a".into();
        b.source.table = "bc".into();
        // Keep the derived outbound schema equal so only the boundary differs.
        a.outbound_schema = Some("ctl".into());
        b.outbound_schema = Some("ctl".into());
        assert_ne!(outbound_table_name(&a), outbound_table_name(&b));
    }
}
