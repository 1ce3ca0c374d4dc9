mod common;

use coexpr_core::ExErrorKind;
use coexpr_store::import::import_expression_matrix;
use tempfile::TempDir;

use common::{arabidopsis_db, fixture, write_file};

#[test]
fn test_import_matrix() {
    // GIVEN a matrix with one unknown gene and one splice variant row
    let mut db = arabidopsis_db();

    // WHEN importing it
    let id = import_expression_matrix(&mut db, "leaf", &fixture("matrix.tsv")).unwrap();

    // THEN the unknown row is dropped and the splice variant maps to its gene
    let matrix = db.gene_expression_matrix_by_id(id);
    assert_eq!(matrix.n_rows(), 4);
    assert_eq!(matrix.n_cols(), 4);
    assert_eq!(matrix.samples(), &["s1", "s2", "s3", "s4"]);
    assert_eq!(matrix.values().len(), 16);

    let g3 = db.find_gene("AT1G01030").unwrap();
    let row = matrix.row_of(g3).unwrap();
    assert_eq!(matrix.row(row), &[2.0, 4.0, 6.0, 8.0]);
    assert!(db.find_gene("FOO1").is_none());
    assert!(db.gene_expression_matrix("leaf").is_ok());
}

#[test]
fn test_ragged_row_names_line() {
    let mut db = arabidopsis_db();

    let err = import_expression_matrix(&mut db, "m", &fixture("ragged_matrix.tsv")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.line(), Some(3));
    assert!(err.message().contains("expected 5 columns, got 4"));
    assert!(db.gene_expression_matrix("m").is_err());
}

#[test]
fn test_ragged_row_of_unknown_gene_still_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "m.tsv", "gene\ta\tb\nFOO1\t1\nAT1G01010\t1\t2\n");
    let mut db = arabidopsis_db();

    let err = import_expression_matrix(&mut db, "m", &path).unwrap_err();

    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_gene_listed_twice_rejected() {
    let mut db = arabidopsis_db();

    let err =
        import_expression_matrix(&mut db, "m", &fixture("duplicate_matrix.tsv")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert!(err.message().contains("Duplicate gene: AT1G01010.2"));
}

#[test]
fn test_non_numeric_value_names_line_and_column() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "m.tsv", "gene\ta\tb\nAT1G01010\t1\tnope\n");
    let mut db = arabidopsis_db();

    let err = import_expression_matrix(&mut db, "m", &path).unwrap_err();

    assert_eq!(err.line(), Some(2));
    assert!(err.message().contains("column 3"));
}

#[test]
fn test_mixed_collections_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "m.tsv", "gene\ta\nAT1G01010\t1\ng1\t2\n");
    let mut db = arabidopsis_db();
    db.add_gene_collection(coexpr_core::GeneCollection::new("other", "", r"g\d+", None).unwrap())
        .unwrap();

    let err = import_expression_matrix(&mut db, "m", &path).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert!(err.message().contains("Conflicting gene: g1"));
}

#[test]
fn test_header_without_samples_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "m.tsv", "gene\nAT1G01010\n");
    let mut db = arabidopsis_db();

    let err = import_expression_matrix(&mut db, "m", &path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_matrix_of_only_unknown_genes_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "m.tsv", "gene\ta\nFOO1\t1\n");
    let mut db = arabidopsis_db();

    let id = import_expression_matrix(&mut db, "m", &path).unwrap();
    assert_eq!(db.gene_expression_matrix_by_id(id).n_rows(), 0);
}

#[test]
fn test_duplicate_matrix_name_rejected() {
    let mut db = arabidopsis_db();
    import_expression_matrix(&mut db, "leaf", &fixture("matrix.tsv")).unwrap();

    let err = import_expression_matrix(&mut db, "leaf", &fixture("matrix.tsv")).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
}
