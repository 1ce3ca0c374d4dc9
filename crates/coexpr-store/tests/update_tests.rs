mod common;

use coexpr_core::rules::validation;
use coexpr_core::ExErrorKind;
use coexpr_store::import::{apply_update, load_update_description};
use tempfile::TempDir;

use common::{fixture, write_file};

#[test]
fn test_update_paths_resolve_against_yaml_dir() {
    let update = load_update_description(&fixture("update.yaml")).unwrap();

    assert_eq!(update.gene_mappings, vec![fixture("mapping.tsv")]);
    assert_eq!(update.orthologs[0].source, "plaza");
    assert_eq!(update.orthologs[0].path, fixture("orthologs.tsv"));
    assert_eq!(
        update.clusterings[0].expression_matrix.as_deref(),
        Some("leaf")
    );
}

#[test]
fn test_apply_update_builds_consistent_database() {
    // GIVEN the fixture update description
    let update = load_update_description(&fixture("update.yaml")).unwrap();
    let mut db = coexpr_core::Database::new();

    // WHEN applying it to an empty database
    let summary = apply_update(&mut db, &update).unwrap();

    // THEN every listed file was imported
    assert_eq!(summary.gene_collections, 1);
    assert_eq!(summary.ortholog_files, 1);
    assert_eq!(summary.expression_matrices, 1);
    assert_eq!(summary.clusterings, 1);
    assert!(db.gene_expression_matrix("leaf").is_ok());
    assert!(db.clustering("leaf_clusters").is_ok());

    // AND the database satisfies every invariant
    assert!(validation::validate_database(&db).is_ok());
}

#[test]
fn test_reapplying_collections_is_tolerated() {
    let dir = TempDir::new().unwrap();
    let yaml = "gene_collections:\n  - name: c\n    gene_pattern: 'g\\d+'\n";
    let path = write_file(&dir, "update.yaml", yaml);
    let update = load_update_description(&path).unwrap();
    let mut db = coexpr_core::Database::new();

    apply_update(&mut db, &update).unwrap();
    let again = apply_update(&mut db, &update).unwrap();

    assert_eq!(again.gene_collections, 0);
}

#[test]
fn test_unknown_key_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "update.yaml", "matrices: []\n");

    let err = load_update_description(&path).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}
