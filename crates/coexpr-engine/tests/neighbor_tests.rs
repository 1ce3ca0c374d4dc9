// Neighbour aggregation over precomputed correlations.

use coexpr_core::{Database, FamilyId, GeneCollection, GeneExpressionMatrix, GeneId};
use coexpr_engine::{GeneCorrelationMatrix, NeighborAggregator, Thresholds};

/// Genes g0..g3, one matrix row each; g1 and g2 share a family
fn setup() -> (Database, GeneExpressionMatrix, Vec<GeneId>) {
    let mut db = Database::new();
    db.add_gene_collection(GeneCollection::new("c", "", r"g\d+", None).unwrap())
        .unwrap();
    let genes: Vec<GeneId> = (0..4)
        .map(|i| db.get_gene(&format!("g{}", i)).unwrap())
        .collect();
    let family = db.add_ortholog_group(FamilyId::new("s", "F")).unwrap();
    db.add_to_ortholog_group(family, genes[1]).unwrap();
    db.add_to_ortholog_group(family, genes[2]).unwrap();
    db.assign_singleton_groups().unwrap();

    let rows = genes.iter().map(|&g| (g, vec![0.0, 1.0])).collect();
    let matrix =
        GeneExpressionMatrix::from_rows("m", None, vec!["a".into(), "b".into()], rows).unwrap();
    (db, matrix, genes)
}

#[test]
fn test_thresholds_strict_at_half() {
    // GIVEN bait row 0 and correlations 0.5, -0.5, 0.51 with it
    let (db, matrix, genes) = setup();
    let correlations =
        GeneCorrelationMatrix::from_parts(4, vec![0], vec![1.0, 0.5, -0.5, 0.51]).unwrap();

    // WHEN thresholds are +-0.5
    let mut aggregator = NeighborAggregator::new(Thresholds::new(-0.5, 0.5).unwrap());
    let recorded = aggregator.add_matrix(&db, &matrix, &correlations);
    let neighbors = aggregator.finish();

    // THEN only 0.51 passes
    assert_eq!(recorded, 1);
    assert_eq!(neighbors.len(), 1);
    let group = db.ortholog_groups_of(genes[3]).next().unwrap();
    let info = neighbors.get(group).unwrap();
    assert_eq!(info.correlations[0].gene, genes[3]);
    assert_eq!(info.correlations[0].bait, genes[0]);
}

#[test]
fn test_thresholds_include_just_outside() {
    let (db, matrix, _) = setup();
    let correlations =
        GeneCorrelationMatrix::from_parts(4, vec![0], vec![1.0, 0.51, -0.51, 0.0]).unwrap();

    let mut aggregator = NeighborAggregator::new(Thresholds::new(-0.5, 0.5).unwrap());
    aggregator.add_matrix(&db, &matrix, &correlations);
    let neighbors = aggregator.finish();

    // g1 and g2 share their family: one group, two correlations
    assert_eq!(neighbors.len(), 1);
    let info = neighbors.iter().next().unwrap();
    assert_eq!(info.correlations.len(), 2);
}

#[test]
fn test_nan_never_neighbor() {
    let (db, matrix, _) = setup();
    let correlations =
        GeneCorrelationMatrix::from_parts(4, vec![0], vec![1.0, f64::NAN, f64::NAN, f64::NAN])
            .unwrap();

    let mut aggregator = NeighborAggregator::new(Thresholds::new(0.0, 0.0).unwrap());
    assert_eq!(aggregator.add_matrix(&db, &matrix, &correlations), 0);
    assert!(aggregator.finish().is_empty());
}

#[test]
fn test_bait_pairs_skipped() {
    // GIVEN g0 and g1 both baits, perfectly correlated
    let (db, matrix, genes) = setup();
    let correlations = GeneCorrelationMatrix::from_parts(
        4,
        vec![0, 1],
        vec![1.0, 1.0, 1.0, 1.0, 0.9, 0.9, 0.0, 0.0],
    )
    .unwrap();

    let mut aggregator = NeighborAggregator::new(Thresholds::new(-0.8, 0.8).unwrap());
    aggregator.add_matrix(&db, &matrix, &correlations);
    let neighbors = aggregator.finish();

    // THEN only g2 is a neighbour, once per bait
    assert_eq!(neighbors.len(), 1);
    let info = neighbors.iter().next().unwrap();
    assert!(info.correlations.iter().all(|c| c.gene == genes[2]));
    assert_eq!(info.correlations.len(), 2);
}

#[test]
fn test_neighbors_ordered_by_group() {
    let (db, matrix, _) = setup();
    let correlations =
        GeneCorrelationMatrix::from_parts(4, vec![0], vec![1.0, 0.0, 0.9, -0.9]).unwrap();

    let mut aggregator = NeighborAggregator::new(Thresholds::new(-0.8, 0.8).unwrap());
    aggregator.add_matrix(&db, &matrix, &correlations);
    let groups: Vec<_> = aggregator.finish().iter().map(|i| i.group).collect();

    let mut sorted = groups.clone();
    sorted.sort();
    assert_eq!(groups, sorted);
    assert_eq!(groups.len(), 2);
}
