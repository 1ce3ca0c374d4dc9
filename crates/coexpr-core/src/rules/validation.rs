use crate::errors::{CoexprError, Result};
use crate::ops::Database;

use super::invariants;

/// Validate the whole database
///
/// Checks, in order:
///
/// 1. Gene/group membership is consistent in both directions
/// 2. No gene is a member of two groups
/// 3. Every gene has a group and no group is empty
/// 4. Singleton groups hold exactly one gene and no family id
/// 5. No gene is clustered twice within one clustering
/// 6. Matrices are rectangular and hold genes of their own collection
///
/// # Errors
///
/// Returns `InvariantViolation` describing the first violation found. Use
/// [`list_violations`] for an exhaustive report.
pub fn validate_database(db: &Database) -> Result<()> {
    match list_violations(db).into_iter().next() {
        Some(reason) => Err(CoexprError::InvariantViolation { reason }),
        None => Ok(()),
    }
}

/// Describe every invariant violation in the database
pub fn list_violations(db: &Database) -> Vec<String> {
    let mut violations = Vec::new();

    for (gene, group) in invariants::find_stale_group_refs(db) {
        violations.push(format!(
            "gene {} refers to ortholog group {} which does not list it",
            gene, group
        ));
    }
    for (group, gene) in invariants::find_members_with_wrong_backref(db) {
        violations.push(format!(
            "ortholog group {} lists gene {} which refers to another group",
            group, gene
        ));
    }
    for gene in invariants::find_genes_in_multiple_groups(db) {
        violations.push(format!("gene {} is a member of several ortholog groups", gene));
    }
    for gene in invariants::find_genes_without_group(db) {
        violations.push(format!("gene {} has no ortholog group", gene));
    }
    for group in invariants::find_empty_groups(db) {
        violations.push(format!("ortholog group {} is empty", group));
    }
    for group in invariants::find_malformed_singletons(db) {
        violations.push(format!(
            "singleton group {} holds several genes or a family id",
            group
        ));
    }
    for (clustering, gene) in invariants::find_multiply_clustered_genes(db) {
        violations.push(format!(
            "gene {} appears in several clusters of clustering {}",
            gene, clustering
        ));
    }
    for (matrix, expected, found) in invariants::find_misshapen_matrices(db) {
        violations.push(format!(
            "expression matrix {} holds {} values, expected {}",
            matrix, found, expected
        ));
    }
    for (matrix, gene) in invariants::find_foreign_matrix_genes(db) {
        violations.push(format!(
            "expression matrix {} holds gene {} of another collection",
            matrix, gene
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cluster, Clustering, FamilyId, GeneCollection};

    fn db() -> Database {
        let mut db = Database::new();
        db.add_gene_collection(GeneCollection::new("c", "", r"g\d+", None).unwrap())
            .unwrap();
        db
    }

    #[test]
    fn test_valid_database_passes() {
        let mut db = db();
        let group = db.add_ortholog_group(FamilyId::new("s", "F")).unwrap();
        let g1 = db.get_gene("g1").unwrap();
        db.add_to_ortholog_group(group, g1).unwrap();
        db.get_gene("g2").unwrap();
        db.assign_singleton_groups().unwrap();

        assert!(validate_database(&db).is_ok());
        assert!(list_violations(&db).is_empty());
    }

    #[test]
    fn test_gene_without_group_reported() {
        let mut db = db();
        db.get_gene("g1").unwrap();
        let err = validate_database(&db).unwrap_err();
        assert!(err.to_string().contains("g1 has no ortholog group"));
    }

    #[test]
    fn test_empty_group_reported() {
        let mut db = db();
        db.add_ortholog_group(FamilyId::new("s", "F")).unwrap();
        assert_eq!(invariants::find_empty_groups(&db), vec!["s:F".to_string()]);
    }

    #[test]
    fn test_family_merged_into_singleton_reported() {
        let mut db = db();
        let gene = db.get_gene("g1").unwrap();
        db.assign_singleton_groups().unwrap();
        let singleton = db.gene(gene).ortholog_group.unwrap();
        let family = db.add_ortholog_group(FamilyId::new("s", "F")).unwrap();
        let g2 = db.get_gene("g2").unwrap();
        db.add_to_ortholog_group(family, g2).unwrap();

        db.merge_ortholog_groups(singleton, family).unwrap();

        assert_eq!(
            invariants::find_malformed_singletons(&db),
            vec!["singleton:0".to_string()]
        );
        assert!(validate_database(&db).is_err());
    }

    #[test]
    fn test_stale_backref_reported() {
        let mut db = db();
        let group = db.add_ortholog_group(FamilyId::new("s", "F")).unwrap();
        let gene = db.get_gene("g1").unwrap();
        db.genes[gene.index()].ortholog_group = Some(group);

        assert_eq!(
            invariants::find_stale_group_refs(&db),
            vec![("g1".to_string(), "s:F".to_string())]
        );
    }

    #[test]
    fn test_multiply_clustered_gene_reported_once() {
        let mut db = db();
        let gene = db.get_gene("g1").unwrap();
        let mut clustering = Clustering::new("k");
        for name in ["a", "b", "c"] {
            let mut cluster = Cluster::new(name);
            cluster.add(gene);
            clustering.clusters.push(cluster);
        }
        db.add_clustering(clustering).unwrap();

        assert_eq!(
            invariants::find_multiply_clustered_genes(&db),
            vec![("k".to_string(), "g1".to_string())]
        );
    }
}
