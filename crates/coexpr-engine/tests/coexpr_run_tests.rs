// Integration tests for the neighbour run.
// Covers grouping by ortholog family, bait exclusion, job-local orthologs,
// cluster rankings, correlation table output and the read-only treatment of
// the snapshot.

mod common;

use coexpr_core::ExErrorKind;
use coexpr_engine::commands::coexpr::{coexpr_run, CORRELATION_FILE_SUFFIX};
use coexpr_engine::report::{JsonReportSink, NeighborReport};
use coexpr_store::snapshot::load_snapshot;
use tempfile::TempDir;

use common::{fixture, read, setup_db, write_job};

#[test]
fn test_neighbors_grouped_by_family() {
    // GIVEN baits {A}, families {B, C} and singletons {A}, {D}
    // AND corr(A,B) = corr(A,C) = 0.9, corr(A,D) = 0.1
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let job = write_job(&dir, &["abcd_matrix.tsv"], &[], (-0.8, 0.8));
    let mut reports: Vec<NeighborReport> = Vec::new();

    // WHEN running with thresholds +-0.8
    let outcome = coexpr_run(&db_path, &job, &mut reports).unwrap();

    // THEN exactly the {B, C} group is a neighbour, with two correlations
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert_eq!(report.baits, vec!["A".to_string()]);
    assert_eq!(report.neighbors.len(), 1);
    let group = &report.neighbors[0];
    assert_eq!(group.name, "test:F1");
    assert_eq!(group.genes, vec!["B".to_string(), "C".to_string()]);
    assert_eq!(group.correlations.len(), 2);
    for entry in &group.correlations {
        assert_eq!(entry.bait, "A");
        assert!((entry.correlation - 0.9).abs() < 1e-9);
    }
    assert_eq!(outcome.neighbors.len(), 1);
    assert_eq!(report.run_id, outcome.run_id.as_str());
}

#[test]
fn test_loose_thresholds_exclude_baits() {
    // GIVEN thresholds that let every finite correlation through
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let job = write_job(&dir, &["abcd_matrix.tsv"], &[], (0.0, 0.0));
    let mut reports: Vec<NeighborReport> = Vec::new();

    // WHEN running
    coexpr_run(&db_path, &job, &mut reports).unwrap();

    // THEN D's singleton joins, but the bait's own group never does
    let report = &reports[0];
    let names: Vec<&str> = report.neighbors.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"test:F1"));
    assert!(report
        .neighbors
        .iter()
        .all(|g| g.correlations.iter().all(|c| c.gene != "A")));
}

#[test]
fn test_job_orthologs_replace_families() {
    // GIVEN a job regrouping A and D and dissolving {B, C}
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let job = write_job(&dir, &["abcd_matrix.tsv"], &["alt_orthologs.tsv"], (-0.8, 0.8));
    let mut reports: Vec<NeighborReport> = Vec::new();

    // WHEN running
    coexpr_run(&db_path, &job, &mut reports).unwrap();

    // THEN B and C are reported in separate singleton groups
    let report = &reports[0];
    assert_eq!(report.neighbors.len(), 2);
    for group in &report.neighbors {
        assert_eq!(group.genes.len(), 1);
        assert!(group.name.starts_with("singleton:"));
    }
}

/// Append a job clustering to the job file at `job`
fn add_clustering(job: &std::path::Path, name: &str, file: &str) {
    let mut yaml = read(job);
    yaml.push_str(&format!(
        "clusterings:\n  - name: {}\n    path: {}\n",
        name,
        fixture(file).display()
    ));
    std::fs::write(job, yaml).unwrap();
}

#[test]
fn test_cluster_candidates_ranked_by_bait_correlation() {
    // GIVEN clusters k1 = {A, B, D} and k2 = {C}, bait A
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let job = write_job(&dir, &["abcd_matrix.tsv"], &[], (-0.8, 0.8));
    add_clustering(&job, "clusters", "abcd_clusters.tsv");
    let mut reports: Vec<NeighborReport> = Vec::new();

    // WHEN running
    let outcome = coexpr_run(&db_path, &job, &mut reports).unwrap();

    // THEN k1's candidates are ranked B before D, and baitless k2 is absent
    assert_eq!(outcome.rankings.len(), 1);
    let ranking = &reports[0].rankings[0];
    assert_eq!(ranking.clustering, "clusters");
    let genes: Vec<(&str, &str)> = ranking
        .genes
        .iter()
        .map(|r| (r.gene.as_str(), r.cluster.as_str()))
        .collect();
    assert_eq!(genes, vec![("B", "k1"), ("D", "k1")]);
    assert!((ranking.genes[0].score - 0.9).abs() < 1e-9);
    assert!((ranking.genes[1].score - 0.1).abs() < 1e-9);
    assert_eq!(ranking.genes[0].baits, 1);
}

#[test]
fn test_job_clustering_not_saved() {
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let job = write_job(&dir, &["abcd_matrix.tsv"], &[], (-0.8, 0.8));
    add_clustering(&job, "clusters", "abcd_clusters.tsv");

    coexpr_run(&db_path, &job, &mut Vec::<NeighborReport>::new()).unwrap();

    let (db, _) = load_snapshot(&db_path).unwrap();
    assert!(db.clustering("clusters").is_err());
}

#[test]
fn test_snapshot_left_untouched() {
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let (_, before) = load_snapshot(&db_path).unwrap();
    let job = write_job(&dir, &["abcd_matrix.tsv"], &["alt_orthologs.tsv"], (-0.8, 0.8));

    coexpr_run(&db_path, &job, &mut Vec::<NeighborReport>::new()).unwrap();

    let (db, after) = load_snapshot(&db_path).unwrap();
    assert_eq!(before, after);
    assert!(db.gene_expression_matrices().next().is_none());
}

#[test]
fn test_correlation_table_written() {
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let job = write_job(&dir, &["abcd_matrix.tsv"], &[], (-0.8, 0.8));

    let outcome = coexpr_run(&db_path, &job, &mut Vec::<NeighborReport>::new()).unwrap();

    let expected = dir
        .path()
        .join(format!("abcd_matrix.tsv{}", CORRELATION_FILE_SUFFIX));
    assert_eq!(outcome.correlation_files, vec![expected.clone()]);
    let table = read(&expected);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines[0], "gene\tA");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("A\t"));
}

#[test]
fn test_gene_in_two_matrices_rejected() {
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let job = write_job(
        &dir,
        &["abcd_matrix.tsv", "overlap_matrix.tsv"],
        &[],
        (-0.8, 0.8),
    );

    let err = coexpr_run(&db_path, &job, &mut Vec::<NeighborReport>::new()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.entity_id(), Some("A"));
    assert!(err.run_id().is_some());
}

#[test]
fn test_threshold_out_of_range_rejected() {
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let job = write_job(&dir, &["abcd_matrix.tsv"], &[], (-1.5, 0.8));

    let err = coexpr_run(&db_path, &job, &mut Vec::<NeighborReport>::new()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert!(err.message().contains("negative_threshold"));
}

#[test]
fn test_json_report_written() {
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let job = write_job(&dir, &["abcd_matrix.tsv"], &[], (-0.8, 0.8));
    let report_path = dir.path().join("report.json");
    let mut sink = JsonReportSink::new(&report_path);

    coexpr_run(&db_path, &job, &mut sink).unwrap();

    let json: serde_json::Value = serde_json::from_str(&read(&report_path)).unwrap();
    assert_eq!(json["baits"], serde_json::json!(["A"]));
    assert_eq!(json["neighbors"][0]["external_ids"], serde_json::json!(["test:F1"]));
    assert_eq!(json["thresholds"]["positive"], serde_json::json!(0.8));
    assert_eq!(json["rankings"], serde_json::json!([]));
}

#[test]
fn test_run_lifecycle_logged_under_run_id() {
    let capture = coexpr_core::logging_facility::init_test_capture();
    let dir = TempDir::new().unwrap();
    let db_path = setup_db(&dir);
    let job = write_job(&dir, &["abcd_matrix.tsv"], &[], (-0.8, 0.8));

    let outcome = coexpr_run(&db_path, &job, &mut Vec::<NeighborReport>::new()).unwrap();

    let events = capture.for_run(outcome.run_id.as_str());
    let lifecycle: Vec<&str> = events
        .iter()
        .filter(|e| e.op() == Some("coexpr_run"))
        .filter_map(|e| e.event())
        .collect();
    assert_eq!(lifecycle, vec!["start", "end"]);
    let end = events.iter().find(|e| e.event() == Some("end")).unwrap();
    assert_eq!(end.field("neighbors"), Some("1"));
}
