use coexpr_core::{Database, FamilyId, GeneCollection, GeneId, GroupId};

/// Database with an Arabidopsis-style collection (`AT1G01010`, splice
/// variants `AT1G01010.1`) and a generic `g<n>` collection
#[allow(dead_code)]
pub fn new_database() -> Database {
    let mut db = Database::new();
    db.add_gene_collection(
        GeneCollection::new(
            "arabidopsis",
            "Arabidopsis thaliana",
            r"AT[1-5CM]G\d{5}",
            Some(r"(AT[1-5CM]G\d{5})\.\d+".to_string()),
        )
        .unwrap(),
    )
    .unwrap();
    db.add_gene_collection(GeneCollection::new("generic", "", r"g\d+", None).unwrap())
        .unwrap();
    db
}

/// Create (or find) an explicit group and add the named genes to it
#[allow(dead_code)]
pub fn group_with(db: &mut Database, family: &str, genes: &[&str]) -> GroupId {
    let family = FamilyId::new("test", family);
    let group = match db.ortholog_group_by_family(&family) {
        Some(id) => id,
        None => db.add_ortholog_group(family).unwrap(),
    };
    for name in genes {
        let gene = db.get_gene(name).unwrap();
        db.add_to_ortholog_group(group, gene).unwrap();
    }
    group
}

#[allow(dead_code)]
pub fn gene(db: &mut Database, name: &str) -> GeneId {
    db.get_gene(name).unwrap()
}
