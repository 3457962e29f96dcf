//! File-backed repositories opened from a config, rooted at a temp home.

use std::fs;

use datalink_core::{
    id_set, GatewayError, Identifier, LocalFlag, OutboundFlag, Payload, Payloads, ReadGateway,
    Role, WriteGateway,
};
use datalink_store::{
    config::{self, Connection, LocalConfig, SourceConfig},
    naming, open_at, LinkConfig, StoreError,
};
use serde_json::json;
use tempfile::TempDir;

fn link_config() -> LinkConfig {
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

fn payloads(ids: &[&str]) -> Payloads {
    ids.iter()
        .map(|id| {
            let mut p = Payload::new();
            p.insert("duration_s".to_string(), json!(12.5));
            (Identifier::from(*id), p)
        })
        .collect()
}

#[test]
fn state_persists_across_opens() {
    let home = TempDir::new().expect("home");
    let cfg = link_config();

    {
        let mut repos = open_at(home.path(), &cfg).expect("open");
        repos.source.upsert(payloads(&["r1", "r2"])).expect("seed");
        repos.outbound.insert(&payloads(&["r1"])).expect("outbound insert");
        repos.local.insert(&payloads(&["r1"])).expect("local insert");
        repos
            .outbound
            .set_flag(&"r1".into(), OutboundFlag::DeletionRequested, true)
            .expect("flag");
    }

    let repos = open_at(home.path(), &cfg).expect("reopen");
    assert_eq!(repos.source.identifiers().unwrap(), id_set(["r1", "r2"]));
    assert_eq!(
        repos.outbound.flagged(OutboundFlag::DeletionRequested).unwrap(),
        id_set(["r1"])
    );
    assert!(repos
        .local
        .flagged(LocalFlag::DeletionRequested)
        .unwrap()
        .is_empty());
}

#[test]
fn outbound_file_is_named_by_link_hash() {
    let home = TempDir::new().expect("home");
    let cfg = link_config();
    let mut repos = open_at(home.path(), &cfg).expect("open");
    repos.outbound.insert(&payloads(&["r1"])).expect("insert");

    let expected = home
        .path()
        .join(".datalink/data/db.lab/lab_ephys_outbound")
        .join(format!("{}.json", naming::outbound_table_name(&cfg)));
    assert!(expected.exists(), "missing {}", expected.display());
}

#[test]
fn data_dir_override_is_honoured() {
    let home = TempDir::new().expect("home");
    let data = TempDir::new().expect("data");
    let mut cfg = link_config();
    cfg.data_dir = Some(data.path().to_path_buf());

    let mut repos = open_at(home.path(), &cfg).expect("open");
    repos.source.upsert(payloads(&["r1"])).expect("seed");
    assert!(data.path().join("db.lab/lab_ephys/recording.json").exists());
    assert!(!home.path().join(".datalink").exists());
}

#[test]
fn missing_password_env_fails_open() {
    let home = TempDir::new().expect("home");
    let mut cfg = link_config();
    cfg.local.connection.password_env = Some("DATALINK_TEST_UNSET_LOCAL_PW_91C2".to_string());
    let err = open_at(home.path(), &cfg).unwrap_err();
    assert!(matches!(err, StoreError::MissingSecret { .. }), "got: {err}");
}

#[test]
fn corrupt_local_file_surfaces_as_storage_unavailable() {
    let home = TempDir::new().expect("home");
    let cfg = link_config();
    let path = cfg.repository_path_at(home.path(), Role::Local);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"[1, 2").unwrap();

    let repos = open_at(home.path(), &cfg).expect("open");
    let err = repos.local.identifiers().unwrap_err();
    assert!(matches!(
        err,
        GatewayError::StorageUnavailable { role: Role::Local, .. }
    ));
    assert!(err.to_string().contains("local repository unavailable"));
}

#[test]
fn config_written_by_init_is_loadable() {
    let home = TempDir::new().expect("home");
    config::init_at(home.path(), link_config()).expect("init");
    let loaded = config::load_at(home.path()).expect("load");
    assert_eq!(loaded, link_config());

    let yaml = fs::read_to_string(config::config_path_at(home.path())).unwrap();
    assert!(yaml.contains("host: db.lab"), "flattened connection fields: {yaml}");
}
