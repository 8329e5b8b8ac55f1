#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod load;
pub mod table;

pub use error::{DataError, Result};
pub use load::{DATE_COLUMN, FACTOR_COLUMN, VALUE_COLUMN, read_returns_csv, returns_from_frame};
pub use table::{ReturnRecord, ReturnsTable, SmoothedColumn};
