//! Closed selection enumerations for the smoothing configuration.
//!
//! Both sets are validated at the string boundary through [`FromStr`]; once
//! a value is constructed it is a member by construction, so the engine
//! never re-checks membership.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SmoothingError;

/// Factor (country/category) filter for the returns table.
///
/// `None` (the empty string) means "all factors"; any other value restricts
/// the table to that single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactorSelection {
    /// No filter; keep every factor row.
    #[serde(rename = "")]
    None,
    /// Australia
    Australia,
    /// Austria
    Austria,
    /// Belgium
    Belgium,
    /// Denmark
    Denmark,
    /// Finland
    Finland,
    /// France
    France,
    /// Futures contracts category
    Futures,
    /// Germany
    Germany,
    /// Hungary
    Hungary,
    /// Ireland
    Ireland,
    /// Italy
    Italy,
    /// Netherlands
    Netherlands,
    /// Norway
    Norway,
    /// Residual category
    Others,
    /// Poland
    Poland,
    /// Portugal
    Portugal,
    /// Spain
    Spain,
    /// Sweden
    Sweden,
    /// Switzerland
    Switzerland,
    /// United Kingdom
    #[serde(rename = "United Kingdom")]
    UnitedKingdom,
    /// United States
    #[serde(rename = "United States")]
    UnitedStates,
}

impl FactorSelection {
    /// Every member of the closed set, in source order.
    pub const ALL: [Self; 22] = [
        Self::None,
        Self::Australia,
        Self::Austria,
        Self::Belgium,
        Self::Denmark,
        Self::Finland,
        Self::France,
        Self::Futures,
        Self::Germany,
        Self::Hungary,
        Self::Ireland,
        Self::Italy,
        Self::Netherlands,
        Self::Norway,
        Self::Others,
        Self::Poland,
        Self::Portugal,
        Self::Spain,
        Self::Sweden,
        Self::Switzerland,
        Self::UnitedKingdom,
        Self::UnitedStates,
    ];

    /// The wire string for this selection ("" for [`Self::None`]).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Australia => "Australia",
            Self::Austria => "Austria",
            Self::Belgium => "Belgium",
            Self::Denmark => "Denmark",
            Self::Finland => "Finland",
            Self::France => "France",
            Self::Futures => "Futures",
            Self::Germany => "Germany",
            Self::Hungary => "Hungary",
            Self::Ireland => "Ireland",
            Self::Italy => "Italy",
            Self::Netherlands => "Netherlands",
            Self::Norway => "Norway",
            Self::Others => "Others",
            Self::Poland => "Poland",
            Self::Portugal => "Portugal",
            Self::Spain => "Spain",
            Self::Sweden => "Sweden",
            Self::Switzerland => "Switzerland",
            Self::UnitedKingdom => "United Kingdom",
            Self::UnitedStates => "United States",
        }
    }

    /// The factor name to filter on, or `None` when no filter applies.
    pub const fn name(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            other => Some(other.as_str()),
        }
    }
}

impl FromStr for FactorSelection {
    type Err = SmoothingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| SmoothingError::InvalidFactorSelection(s.to_string()))
    }
}

impl fmt::Display for FactorSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregation granularity for the smoothing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodSelection {
    /// No aggregation: the cleaned/filtered table is returned unchanged.
    #[serde(rename = "")]
    None,
    /// One bucket per calendar quarter.
    #[serde(rename = "Q")]
    Quarterly,
    /// One bucket per calendar year.
    #[serde(rename = "Y")]
    Yearly,
    /// One bucket spanning the entire history.
    #[serde(rename = "I")]
    InceptionToDate,
}

impl PeriodSelection {
    /// The wire string for this selection.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Quarterly => "Q",
            Self::Yearly => "Y",
            Self::InceptionToDate => "I",
        }
    }
}

impl FromStr for PeriodSelection {
    type Err = SmoothingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self::None),
            "Q" => Ok(Self::Quarterly),
            "Y" => Ok(Self::Yearly),
            "I" => Ok(Self::InceptionToDate),
            other => Err(SmoothingError::InvalidPeriodSelection(other.to_string())),
        }
    }
}

impl fmt::Display for PeriodSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
