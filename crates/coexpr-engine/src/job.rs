//! YAML job descriptions for neighbour runs
//!
//! ```yaml
//! baits: baits.txt
//! negative_threshold: -0.8
//! positive_threshold: 0.8
//! expression_matrices: [leaf.tsv, root.tsv]
//! orthologs:
//!   - { source: plaza, path: plaza_families.tsv }
//! clusterings:
//!   - { name: leaf_clusters, path: leaf_clusters.tsv }
//! output_dir: out
//! ```
//!
//! `negative_treshold` and `positive_treshold` are accepted as well. Paths
//! are relative to the directory of the job file.

use std::path::{Path, PathBuf};

use coexpr_store::errors::{import_validation, io_error, Result};
use coexpr_store::import::update::OrthologFile;
use serde::Deserialize;

use crate::neighbors::Thresholds;

const OP: &str = "load_job";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobDescription {
    pub baits: PathBuf,
    #[serde(alias = "negative_treshold")]
    pub negative_threshold: f64,
    #[serde(alias = "positive_treshold")]
    pub positive_threshold: f64,
    #[serde(default)]
    pub expression_matrices: Vec<PathBuf>,
    /// Replaces the database's ortholog families for this run when not empty
    #[serde(default)]
    pub orthologs: Vec<OrthologFile>,
    /// Clusterings whose candidates are ranked against the baits
    #[serde(default)]
    pub clusterings: Vec<JobClustering>,
    /// Where correlation tables go; the job file's directory by default
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// A `gene<TAB>cluster` file to rank within
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobClustering {
    pub name: String,
    pub path: PathBuf,
}

impl JobDescription {
    /// ## Errors
    ///
    /// `InvalidInput` if a threshold lies outside [-1, 1].
    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.negative_threshold, self.positive_threshold)
    }

    /// Make every relative path relative to `base` instead
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.baits);
        self.expression_matrices.iter_mut().for_each(resolve);
        self.orthologs.iter_mut().for_each(|o| resolve(&mut o.path));
        self.clusterings.iter_mut().for_each(|c| resolve(&mut c.path));
        match &mut self.output_dir {
            Some(dir) => resolve(dir),
            None => self.output_dir = Some(base.to_path_buf()),
        }
    }

    /// Directory for correlation tables
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }
}

/// Read a job description, resolve its paths and check its thresholds
///
/// ## Errors
///
/// - `ExErrorKind::Io`: the file cannot be read
/// - `ExErrorKind::InvalidInput`: malformed YAML or thresholds out of range
pub fn load_job(path: &Path) -> Result<JobDescription> {
    let content = std::fs::read_to_string(path).map_err(|e| io_error(OP, path, e))?;
    let mut job: JobDescription = serde_yaml::from_str(&content)
        .map_err(|e| import_validation(OP, path, format!("YAML parse error: {}", e)))?;
    job.thresholds()
        .map_err(|e| e.with_path(path.display().to_string()))?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    job.resolve_paths(base);
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misspelled_threshold_keys_accepted() {
        let yaml = "baits: b.txt\nnegative_treshold: -0.7\npositive_treshold: 0.7\n";
        let job: JobDescription = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(job.negative_threshold, -0.7);
        assert_eq!(job.positive_threshold, 0.7);
        assert!(job.orthologs.is_empty());
        assert!(job.clusterings.is_empty());
    }

    #[test]
    fn test_paths_resolved_against_base() {
        let yaml = "baits: b.txt\nnegative_threshold: -0.7\npositive_threshold: 0.7\n\
                    expression_matrices: [m.tsv, /abs/n.tsv]\n\
                    clusterings: [{ name: k, path: k.tsv }]\n";
        let mut job: JobDescription = serde_yaml::from_str(yaml).unwrap();
        job.resolve_paths(Path::new("/jobs"));

        assert_eq!(job.baits, PathBuf::from("/jobs/b.txt"));
        assert_eq!(
            job.expression_matrices,
            vec![PathBuf::from("/jobs/m.tsv"), PathBuf::from("/abs/n.tsv")]
        );
        assert_eq!(job.clusterings[0].path, PathBuf::from("/jobs/k.tsv"));
        assert_eq!(job.output_dir(), Path::new("/jobs"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = "baits: b.txt\nnegative_threshold: 0\npositive_threshold: 0\nbait: x\n";
        assert!(serde_yaml::from_str::<JobDescription>(yaml).is_err());
    }
}
