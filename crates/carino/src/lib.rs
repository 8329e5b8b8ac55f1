#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export main types from sub-crates
pub use carino_data as data;
pub use carino_output as output;
pub use carino_smoothing as smoothing;

pub use carino_data::{ReturnRecord, ReturnsTable, read_returns_csv};
pub use carino_output::{ExportFormat, export};
pub use carino_smoothing::{
    EngineConfig, FactorSelection, PeriodSelection, SmoothingEngine, SmoothingError,
};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
