use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{CoexprError, Result};

/// How a gene collection claims a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch {
    /// The name is a gene of the collection
    Gene,
    /// The name is a splice variant of `gene_name`
    SpliceVariant { gene_name: String },
}

/// A namespace of genes, typically one genome annotation
///
/// Names are claimed by full-match regular expressions. The splice variant
/// pattern is tried first and must have one capture group yielding the
/// parent gene's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneCollection {
    pub name: String,
    pub species: String,
    pub gene_pattern: String,
    pub splice_variant_pattern: Option<String>,

    #[serde(skip)]
    matcher: Option<Matcher>,
}

#[derive(Debug, Clone)]
struct Matcher {
    gene: Regex,
    splice_variant: Option<Regex>,
}

impl PartialEq for GeneCollection {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.species == other.species
            && self.gene_pattern == other.gene_pattern
            && self.splice_variant_pattern == other.splice_variant_pattern
    }
}

impl GeneCollection {
    /// Create a collection and compile its patterns
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if a pattern does not compile or the splice
    /// variant pattern lacks a capture group.
    pub fn new(
        name: impl Into<String>,
        species: impl Into<String>,
        gene_pattern: impl Into<String>,
        splice_variant_pattern: Option<String>,
    ) -> Result<Self> {
        let mut collection = Self {
            name: name.into(),
            species: species.into(),
            gene_pattern: gene_pattern.into(),
            splice_variant_pattern,
            matcher: None,
        };
        collection.compile()?;
        Ok(collection)
    }

    /// Compile the patterns; required after deserialization
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` on a bad pattern.
    pub fn compile(&mut self) -> Result<()> {
        let gene = full_match(&self.name, &self.gene_pattern)?;
        let splice_variant = match &self.splice_variant_pattern {
            Some(pattern) => {
                let regex = full_match(&self.name, pattern)?;
                if regex.captures_len() < 2 {
                    return Err(CoexprError::InvalidPattern {
                        collection: self.name.clone(),
                        reason: format!(
                            "splice variant pattern '{}' needs a capture group for the gene name",
                            pattern
                        ),
                    });
                }
                Some(regex)
            }
            None => None,
        };
        self.matcher = Some(Matcher {
            gene,
            splice_variant,
        });
        Ok(())
    }

    /// Decide whether (and how) this collection claims `name`
    ///
    /// Returns `None` for names of other collections, and for every name if
    /// the patterns were never compiled.
    pub fn classify(&self, name: &str) -> Option<NameMatch> {
        let matcher = self.matcher.as_ref()?;
        if let Some(splice) = &matcher.splice_variant {
            if let Some(captures) = splice.captures(name) {
                if let Some(gene_name) = captures.get(1) {
                    return Some(NameMatch::SpliceVariant {
                        gene_name: gene_name.as_str().to_string(),
                    });
                }
            }
        }
        if matcher.gene.is_match(name) {
            return Some(NameMatch::Gene);
        }
        None
    }
}

fn full_match(collection: &str, pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| CoexprError::InvalidPattern {
        collection: collection.to_string(),
        reason: e.to_string(),
    })
}
