//! Line-oriented, separator-delimited text input
//!
//! Every import format in the system is a sequence of records, one per
//! line, fields split on a single ASCII separator. Records are read with
//! the `csv` crate with quoting turned off. Blank lines are skipped but
//! still counted, so reported line numbers match what an editor shows.
//!
//! This module only tokenizes; what a record means is up to the importers.

pub mod parser;

pub use parser::{count_records, parse_records, parse_value, Record, RecordError, Records, TabFormat};
