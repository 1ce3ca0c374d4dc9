use coexpr_core_types::RunId;
use thiserror::Error;

/// Result type alias using CoexprError
pub type Result<T> = std::result::Result<T, CoexprError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing and user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    /// Malformed or ragged input, out-of-range threshold, bad pattern
    InvalidInput,
    /// Referenced entity is absent where lookup is mandatory
    NotFound,
    /// Uniqueness violation (duplicate name or id)
    AlreadyExists,
    /// A splice variant was supplied where a gene is required
    SpliceVariantMismatch,
    /// The database breaks one of its structural invariants
    InvariantViolation,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    /// Mutation attempted through a read-only session
    ReadOnly,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::SpliceVariantMismatch => "ERR_SPLICE_VARIANT_MISMATCH",
            ExErrorKind::InvariantViolation => "ERR_INVARIANT_VIOLATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ReadOnly => "ERR_READ_ONLY",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification plus the context an operator needs to find the
/// problem: the operation, the entity, the input file and line.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    path: Option<String>,
    line: Option<usize>,
    run_id: Option<RunId>,
    message: String,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            path: None,
            line: None,
            run_id: None,
            message: String::new(),
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity context (gene, group, matrix or clustering name)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add input file context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add 1-based line context
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add offending entity names (e.g. the genes found in several clusters)
    pub fn with_candidates(mut self, names: Vec<String>) -> Self {
        self.candidates = Some(names);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the input file context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the line context, if any
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get offending entity names, if any
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {}", path)?;
            if let Some(line) = self.line {
                write!(f, ", line {}", line)?;
            }
            write!(f, ")")?;
        } else if let Some(line) = self.line {
            write!(f, " (line {})", line)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy raised by the in-memory database
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoexprError {
    // ===== Lookup Errors =====
    /// No gene collection claims the name
    #[error("Gene of unknown collection: {name}")]
    GeneNotFound { name: String },

    /// A splice variant was given where a gene is required
    #[error("Expected a gene, got splice variant: {name}")]
    SpliceVariantInsteadOfGene { name: String },

    /// Ortholog group not registered
    #[error("Ortholog group not found: {group}")]
    OrthologGroupNotFound { group: String },

    /// Gene expression matrix not registered
    #[error("Gene expression matrix not found: {name}")]
    MatrixNotFound { name: String },

    /// Clustering not registered
    #[error("Clustering not found: {name}")]
    ClusteringNotFound { name: String },

    /// Entity already exists (duplicate name)
    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: &'static str, name: String },

    // ===== Validation Errors =====
    /// Gene collection pattern is not a valid regular expression
    #[error("Invalid pattern for gene collection {collection}: {reason}")]
    InvalidPattern { collection: String, reason: String },

    /// Generic malformed input
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A correlation threshold lies outside [-1, 1]
    #[error("{name} must be a number between -1 and 1, got {value}")]
    ThresholdOutOfRange { name: String, value: f64 },

    /// Genes of different collections mixed in one matrix or clustering
    #[error("All genes of {entity} must belong to collection {expected}. Conflicting gene: {gene}")]
    MixedGeneCollections {
        entity: String,
        expected: String,
        gene: String,
    },

    /// A gene appears on more than one row of an expression matrix
    #[error("Duplicate gene: {gene} (line {line})")]
    DuplicateGeneRow { gene: String, line: usize },

    /// A data row has a different width than the header
    #[error("Line {line} (1-based, header included): expected {expected} columns, got {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// An expression value is not a finite number
    #[error("Line {line}, column {column}: invalid expression value '{field}'")]
    InvalidValue {
        line: usize,
        column: usize,
        field: String,
    },

    /// Genes appearing in more than one cluster of a clustering
    #[error("Clustering {clustering} contains some genes more than once: {}", genes.join(", "))]
    MultiplyClusteredGenes {
        clustering: String,
        genes: Vec<String>,
    },

    /// A gene is part of a matrix already used in the same run
    #[error("Gene {gene} present in multiple matrices")]
    GeneInMultipleMatrices { gene: String },

    // ===== Integrity Errors =====
    /// Structural invariant broken
    #[error("Invariant violated: {reason}")]
    InvariantViolation { reason: String },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from CoexprError to ExError
///
/// Lets store and engine code use `?` on core operations while reporting
/// through the canonical facility.
impl From<CoexprError> for ExError {
    fn from(err: CoexprError) -> Self {
        let message = err.to_string();
        match err {
            CoexprError::GeneNotFound { name } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(name)
                .with_op("get_gene_variant")
                .with_message(message),

            CoexprError::SpliceVariantInsteadOfGene { name } => {
                ExError::new(ExErrorKind::SpliceVariantMismatch)
                    .with_entity_id(name)
                    .with_op("as_gene")
                    .with_message(message)
            }

            CoexprError::OrthologGroupNotFound { group } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(group)
                .with_message(message),

            CoexprError::MatrixNotFound { name } | CoexprError::ClusteringNotFound { name } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(name)
                    .with_message(message)
            }

            CoexprError::AlreadyExists { name, .. } => ExError::new(ExErrorKind::AlreadyExists)
                .with_entity_id(name)
                .with_message(message),

            CoexprError::InvalidPattern { collection, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(collection)
                    .with_message(message)
            }

            CoexprError::InvalidInput { .. } | CoexprError::ThresholdOutOfRange { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }

            CoexprError::MixedGeneCollections { entity, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(entity)
                    .with_message(message)
            }

            CoexprError::DuplicateGeneRow { gene, line } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(gene)
                    .with_line(line)
                    .with_message(message)
            }

            CoexprError::RaggedRow { line, .. } | CoexprError::InvalidValue { line, .. } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_line(line)
                    .with_message(message)
            }

            CoexprError::MultiplyClusteredGenes { clustering, genes } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(clustering)
                    .with_candidates(genes)
                    .with_message(message)
            }

            CoexprError::GeneInMultipleMatrices { gene } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(gene)
                    .with_message(message)
            }

            CoexprError::InvariantViolation { .. } => {
                ExError::new(ExErrorKind::InvariantViolation).with_message(message)
            }

            CoexprError::Internal { .. } => ExError::new(ExErrorKind::Internal).with_message(message),
        }
    }
}
