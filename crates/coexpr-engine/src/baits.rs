//! Bait lists: whitespace separated gene names

use std::path::Path;

use coexpr_core::{Database, GeneId};
use coexpr_store::errors::{import_validation, in_file, Result};

const OP: &str = "load_baits";

/// Split a bait list into distinct names, keeping first occurrences
pub fn parse_baits(text: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for name in text.split_whitespace() {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Read the bait list at `path` and resolve every name to a gene
///
/// Unseen genes are created, as with any other input.
///
/// ## Errors
///
/// - `ExErrorKind::Io`: the file cannot be read
/// - `ExErrorKind::InvalidInput`: not UTF-8, or no names at all
/// - `ExErrorKind::NotFound`: a name belongs to no gene collection
/// - `ExErrorKind::SpliceVariantMismatch`: a name is a splice variant
pub fn load_baits(db: &mut Database, path: &Path) -> Result<Vec<GeneId>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::InvalidData {
            import_validation(OP, path, "Bait list is not valid UTF-8")
        } else {
            coexpr_store::errors::io_error(OP, path, e)
        }
    })?;

    let names = parse_baits(&content);
    if names.is_empty() {
        return Err(import_validation(OP, path, "Bait list is empty"));
    }

    let mut baits = Vec::with_capacity(names.len());
    for name in names {
        let gene = db.get_gene(name).map_err(in_file(OP, path))?;
        if !baits.contains(&gene) {
            baits.push(gene);
        }
    }

    tracing::debug!(path = %path.display(), baits = baits.len(), "Loaded baits");
    Ok(baits)
}
