// ==========================================
// Tupacery Reports - Quality Tidy Blocks & Snapshot
// ==========================================
// One row per calendar date per quality line.
// Indicator values are Option<f64>: a day without a sample is
// missing, not zero.
// ==========================================

use crate::domain::types::QualityLine;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical quality column names
pub mod fields {
    pub const DATE: &str = "Data";
    pub const TON: &str = "Ton";
    pub const FE: &str = "Fe";
    pub const SIO2: &str = "SiO2";
    pub const AL2O3: &str = "Al2O3";
    pub const P: &str = "P";
    pub const MN: &str = "Mn";
    pub const LOI: &str = "LOI";
    pub const TMP: &str = "TMP";
    pub const ABOVE_31_5MM: &str = ">31_5mm";
    pub const BELOW_12MM_PART: &str = "_coluna_soma_1";
    pub const BELOW_6_3MM_PART: &str = "_coluna_soma_2";
    pub const BELOW_0_15MM: &str = "<0_15mm";
    pub const TOTAL: &str = "TOTAL";
}

// ==========================================
// QualityRow / QualityBlock
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRow {
    /// None when the date cell did not parse; the row keeps its position
    pub date: Option<NaiveDate>,
    /// Aligned with `QualityBlock::columns`
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityBlock {
    pub line: QualityLine,
    /// Non-date column names after mapping and deduplication
    pub columns: Vec<String>,
    /// Sheet order
    pub rows: Vec<QualityRow>,
}

impl QualityBlock {
    pub fn new(line: QualityLine, columns: Vec<String>) -> Self {
        Self {
            line,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn value(&self, row: &QualityRow, name: &str) -> Option<f64> {
        self.column_index(name)
            .and_then(|idx| row.values.get(idx).copied().flatten())
    }

    pub fn has_tonnage(&self) -> bool {
        self.has_column(fields::TON)
    }

    /// Tonnage > 0; a missing tonnage counts as zero
    pub fn is_productive(&self, row: &QualityRow) -> bool {
        self.value(row, fields::TON).unwrap_or(0.0) > 0.0
    }

    /// Any non-date column carries a value
    pub fn has_any_value(row: &QualityRow) -> bool {
        row.values.iter().any(|v| v.is_some())
    }

    /// Rows whose date parsed
    pub fn dated_rows(&self) -> impl Iterator<Item = (NaiveDate, &QualityRow)> {
        self.rows.iter().filter_map(|r| r.date.map(|d| (d, r)))
    }
}

/// Parsed quality sheet: one block per line, PMT 01 first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityTables {
    pub blocks: Vec<QualityBlock>,
    /// Blocks came from the fixed legacy positions, not from detection
    pub block_fallback: bool,
}

impl QualityTables {
    pub fn block(&self, line: QualityLine) -> Option<&QualityBlock> {
        self.blocks.iter().find(|b| b.line == line)
    }
}

// ==========================================
// Long-form observation (both lines stacked)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityObservation {
    pub line: QualityLine,
    pub date: NaiveDate,
    pub values: BTreeMap<String, Option<f64>>,
}

impl QualityObservation {
    pub fn value(&self, indicator: &str) -> Option<f64> {
        self.values.get(indicator).copied().flatten()
    }
}

// ==========================================
// Quality snapshot (aggregate output)
// ==========================================

/// Which fallback tier supplied a line's snapshot row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    ExactDate,
    LastProductive,
    LastWithValues,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Met,
    Missed,
    /// Target exists but is not pass/fail (reference line)
    NoLimit,
    /// No value to compare
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValue {
    pub indicator: String,
    pub value: Option<f64>,
    pub status: TargetStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineQuality {
    pub line: QualityLine,
    pub last_valid_date: Option<NaiveDate>,
    pub source: SnapshotSource,
    pub latest: Vec<IndicatorValue>,
    pub month_mean: Vec<IndicatorValue>,
}

impl LineQuality {
    pub fn latest_value(&self, indicator: &str) -> Option<f64> {
        find_value(&self.latest, indicator)
    }

    pub fn mean_value(&self, indicator: &str) -> Option<f64> {
        find_value(&self.month_mean, indicator)
    }
}

fn find_value(values: &[IndicatorValue], indicator: &str) -> Option<f64> {
    values
        .iter()
        .find(|v| v.indicator == indicator)
        .and_then(|v| v.value)
}

/// Month of the reference day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMonth {
    pub year: i32,
    pub month: u32,
}

impl From<NaiveDate> for ReferenceMonth {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

impl ReferenceMonth {
    /// Portuguese month name; None outside 1..=12
    pub fn month_name(&self) -> Option<&'static str> {
        let idx = usize::try_from(self.month).ok()?.checked_sub(1)?;
        MONTH_NAMES.get(idx).copied()
    }
}

/// "Setembro/2025"
impl fmt::Display for ReferenceMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month_name() {
            Some(name) => write!(f, "{}/{}", name, self.year),
            None => write!(f, "{:02}/{}", self.month, self.year),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySnapshot {
    pub reference_day: NaiveDate,
    pub reference_month: ReferenceMonth,
    pub lines: Vec<LineQuality>,
    pub observations: Vec<QualityObservation>,
}

impl QualitySnapshot {
    pub fn line(&self, line: QualityLine) -> Option<&LineQuality> {
        self.lines.iter().find(|l| l.line == line)
    }
}

/// One dated reading of an indicator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Distribution of one indicator on one line (zeros and gaps excluded)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorStats {
    pub line: QualityLine,
    pub indicator: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Coefficient of variation in %, None when not available
    pub cv_pct: Option<f64>,
    /// Last 7 vs previous 7 readings, in %
    pub week_over_week_pct: f64,
}
