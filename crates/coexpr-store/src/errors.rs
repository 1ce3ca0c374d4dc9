//! Error handling for coexpr-store
//!
//! Wraps coexpr-core ExError with store-specific helpers

use std::fmt::Display;
use std::path::Path;

use coexpr_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create an import validation error for a structurally broken input file
pub fn import_validation(operation: &str, path: &Path, reason: impl Display) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(reason.to_string())
}

/// Create a serialization error
pub fn serialization_error(operation: &str, err: impl Display) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create a persistence error for a snapshot that cannot be trusted
pub fn persistence_error(operation: &str, path: &Path, reason: impl Display) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(reason.to_string())
}

/// Create an error for a mutation attempted through a read-only session
pub fn read_only(operation: &str, path: &Path) -> ExError {
    ExError::new(ExErrorKind::ReadOnly)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message("Database was opened read-only")
}

/// Attach operation and input file to a domain error
///
/// ```ignore
/// db.get_gene(name).map_err(in_file("import_orthologs", path))?;
/// ```
pub fn in_file<'a, E: Into<ExError>>(
    operation: &'a str,
    path: &'a Path,
) -> impl Fn(E) -> ExError + 'a {
    move |err| {
        err.into()
            .with_op(operation.to_string())
            .with_path(path.display().to_string())
    }
}

/// Read a whole input file
pub fn read_input(operation: &str, path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| io_error(operation, path, e))
}
