use std::path::{Path, PathBuf};

use coexpr_engine::commands::database::database_create;
use tempfile::TempDir;

/// Path of a file under `tests/fixtures`
#[allow(dead_code)]
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Create `db.json` in `dir` from the fixture update description
///
/// Holds the `letters` collection and one ortholog family {B, C}.
#[allow(dead_code)]
pub fn setup_db(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("db.json");
    database_create(&path, Some(&fixture("update.yaml"))).unwrap();
    path
}

/// Write a job description into `dir`; `out` is the output directory
#[allow(dead_code)]
pub fn write_job(
    dir: &TempDir,
    matrices: &[&str],
    orthologs: &[&str],
    thresholds: (f64, f64),
) -> PathBuf {
    let mut yaml = format!(
        "baits: {}\nnegative_threshold: {}\npositive_threshold: {}\noutput_dir: {}\n",
        fixture("baits.txt").display(),
        thresholds.0,
        thresholds.1,
        dir.path().display()
    );
    yaml.push_str("expression_matrices:\n");
    for matrix in matrices {
        yaml.push_str(&format!("  - {}\n", fixture(matrix).display()));
    }
    if !orthologs.is_empty() {
        yaml.push_str("orthologs:\n");
        for file in orthologs {
            yaml.push_str(&format!(
                "  - source: alt\n    path: {}\n",
                fixture(file).display()
            ));
        }
    }
    let path = dir.path().join("job.yaml");
    std::fs::write(&path, yaml).unwrap();
    path
}

#[allow(dead_code)]
pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}
