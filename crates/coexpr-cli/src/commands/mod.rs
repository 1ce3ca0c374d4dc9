pub mod database;
pub mod run;
