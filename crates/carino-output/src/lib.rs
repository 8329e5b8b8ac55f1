#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;

pub use export::{
    CellRecord, ExportError, ExportFormat, Result, export, to_csv_string, to_json_string,
    to_records, write_csv,
};
