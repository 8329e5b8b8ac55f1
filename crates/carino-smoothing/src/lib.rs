#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adjustment;
pub mod config;
pub mod engine;
pub mod error;
pub mod selection;

pub use config::EngineConfig;
pub use engine::{INCEPTION_LABEL, SmoothingEngine};
pub use error::{Result, SmoothingError};
pub use selection::{FactorSelection, PeriodSelection};
