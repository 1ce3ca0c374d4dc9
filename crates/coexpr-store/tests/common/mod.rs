use std::path::PathBuf;

use coexpr_core::{Database, GeneCollection};

/// Path of a file under `tests/fixtures`
#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Empty database knowing the Arabidopsis gene collection
#[allow(dead_code)]
pub fn arabidopsis_db() -> Database {
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
    db
}

/// Write `content` to a file in `dir` and return its path
#[allow(dead_code)]
pub fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}
