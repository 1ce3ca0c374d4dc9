pub mod invariants;
pub mod validation;

pub use validation::{list_violations, validate_database};
