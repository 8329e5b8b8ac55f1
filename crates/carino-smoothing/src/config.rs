//! Engine configuration and its string boundary.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::selection::{FactorSelection, PeriodSelection};

/// Validated configuration for one smoothing run.
///
/// Constructing a config from raw strings is the fail-fast validation point:
/// a value outside either closed enumeration is rejected here, before any
/// computation. Running the engine *without* a config is the distinct
/// raw-inspection mode in which no filtering or smoothing happens at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Aggregation granularity; an empty selection defaults to
    /// inception-to-date once a config exists.
    pub period_selection: PeriodSelection,

    /// Optional restriction to a single factor row.
    pub factor_selection: FactorSelection,
}

impl EngineConfig {
    /// Parse the two configuration strings, failing on any value outside
    /// the closed enumerations.
    pub fn from_args(period: &str, factor: &str) -> Result<Self> {
        Ok(Self {
            period_selection: period.parse()?,
            factor_selection: factor.parse()?,
        })
    }
}
