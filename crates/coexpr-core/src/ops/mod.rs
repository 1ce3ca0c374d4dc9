pub mod database;
pub mod ortholog_ops;

pub use database::Database;
