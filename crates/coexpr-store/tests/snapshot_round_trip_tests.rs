mod common;

use coexpr_core::ExErrorKind;
use coexpr_store::import::{apply_update, load_update_description};
use coexpr_store::snapshot::{load_snapshot, save_snapshot, SnapshotEnvelope};
use tempfile::TempDir;

use common::fixture;

fn populated() -> coexpr_core::Database {
    let update = load_update_description(&fixture("update.yaml")).unwrap();
    let mut db = coexpr_core::Database::new();
    apply_update(&mut db, &update).unwrap();
    db
}

#[test]
fn test_load_save_load_is_identity() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    let db = populated();

    save_snapshot(&first, &db).unwrap();
    let (loaded, info1) = load_snapshot(&first).unwrap();
    save_snapshot(&second, &loaded).unwrap();
    let (reloaded, info2) = load_snapshot(&second).unwrap();

    assert_eq!(loaded, db);
    assert_eq!(reloaded, loaded);
    assert_eq!(info1.content_digest, info2.content_digest);
}

#[test]
fn test_loaded_database_resolves_names() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db.json");
    save_snapshot(&path, &populated()).unwrap();

    let (mut db, _) = load_snapshot(&path).unwrap();

    assert!(db.find_gene("AT1G01010").is_some());
    assert!(db.gene_expression_matrix("leaf").is_ok());
    // collection patterns work again after reload
    assert!(db.get_gene("AT2G12345").is_ok());
}

#[test]
fn test_tampered_snapshot_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db.json");
    save_snapshot(&path, &populated()).unwrap();

    let mut envelope: SnapshotEnvelope =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    envelope.database["next_singleton"] = serde_json::json!(999);
    std::fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

    let err = load_snapshot(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
    assert!(err.message().contains("digest mismatch"));
}

#[test]
fn test_wrong_version_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db.json");
    save_snapshot(&path, &populated()).unwrap();

    let mut envelope: SnapshotEnvelope =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    envelope.schema_version = 99;
    std::fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

    let err = load_snapshot(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Persistence);
}

#[test]
fn test_garbage_file_is_serialization_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db.json");
    std::fs::write(&path, b"not json").unwrap();

    let err = load_snapshot(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Serialization);
}
