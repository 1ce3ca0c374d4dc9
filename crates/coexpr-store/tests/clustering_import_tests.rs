mod common;

use coexpr_core::ExErrorKind;
use coexpr_store::import::{import_clustering, import_expression_matrix};
use tempfile::TempDir;

use common::{arabidopsis_db, fixture, write_file};

#[test]
fn test_import_clustering_sorted_by_cluster_name() {
    let mut db = arabidopsis_db();

    import_clustering(&mut db, "k", &fixture("clustering.tsv"), None).unwrap();

    let clustering = db.clustering("k").unwrap();
    let names: Vec<&str> = clustering.clusters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["c1", "c2"]);
    assert_eq!(clustering.clusters[0].genes.len(), 2);
    assert!(clustering.expression_matrix.is_none());
}

#[test]
fn test_multiply_clustered_genes_all_listed() {
    // GIVEN AT1G01010 in c1 and c2, AT1G01020 in c1 and c3
    let mut db = arabidopsis_db();

    // WHEN importing
    let err = import_clustering(&mut db, "k", &fixture("clustering_overlap.tsv"), None)
        .unwrap_err();

    // THEN both genes are named, in name order
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(
        err.candidates(),
        Some(&["AT1G01010".to_string(), "AT1G01020".to_string()][..])
    );
    assert!(db.clustering("k").is_err());
}

#[test]
fn test_associated_matrix_must_exist() {
    let mut db = arabidopsis_db();

    let err = import_clustering(&mut db, "k", &fixture("clustering.tsv"), Some("leaf"))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_associated_matrix_linked() {
    let mut db = arabidopsis_db();
    let matrix = import_expression_matrix(&mut db, "leaf", &fixture("matrix.tsv")).unwrap();

    import_clustering(&mut db, "k", &fixture("clustering.tsv"), Some("leaf")).unwrap();

    assert_eq!(db.clustering("k").unwrap().expression_matrix, Some(matrix));
}

#[test]
fn test_associated_matrix_of_other_collection_rejected() {
    let dir = TempDir::new().unwrap();
    let matrix_path = write_file(&dir, "m.tsv", "gene\ta\ng1\t1\n");
    let mut db = arabidopsis_db();
    db.add_gene_collection(coexpr_core::GeneCollection::new("other", "", r"g\d+", None).unwrap())
        .unwrap();
    import_expression_matrix(&mut db, "m", &matrix_path).unwrap();

    let err =
        import_clustering(&mut db, "k", &fixture("clustering.tsv"), Some("m")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
}
