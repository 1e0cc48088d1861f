// ==========================================
// Tupacery Reports - Aggregation Error Types
// ==========================================
// Empty-result conditions only: the caller should offer a wider
// selection, not retry. Division guards never reach this enum.
// ==========================================

use crate::domain::types::DateRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Why a selection produced nothing to aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum NoDataReason {
    /// The table has no rows at all
    EmptyTable,
    /// No rows inside the selected range
    EmptyRange { range: DateRange },
    /// Rows exist but none has positive production
    NoProductiveDays { range: DateRange },
    /// Neither quality block has a usable date
    NoValidDates,
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::EmptyTable => write!(f, "the table has no rows"),
            NoDataReason::EmptyRange { range } => write!(f, "no rows in {}", range),
            NoDataReason::NoProductiveDays { range } => {
                write!(f, "no productive days in {}", range)
            }
            NoDataReason::NoValidDates => write!(f, "no valid date in any quality block"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("no data for this selection: {0}")]
    NoData(NoDataReason),
}

impl AggregateError {
    pub fn reason(&self) -> NoDataReason {
        match self {
            AggregateError::NoData(reason) => *reason,
        }
    }
}

pub type AggregateResult<T> = Result<T, AggregateError>;
