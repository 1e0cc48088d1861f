// ==========================================
// Tupacery Reports - Production Tidy Table & Snapshot
// ==========================================
// One row per calendar date; tonnage per (line, product).
// Absent tonnage is zero, never missing.
// ==========================================

use crate::domain::types::{DateRange, Entity, Line, Product};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ProductionField - canonical production column
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductionField {
    pub line: Line,
    pub product: Product,
}

impl ProductionField {
    pub fn new(line: Line, product: Product) -> Self {
        Self { line, product }
    }

    /// All six line x product fields in sheet order
    pub fn all() -> impl Iterator<Item = ProductionField> {
        Line::ALL
            .into_iter()
            .flat_map(|line| Product::ALL.into_iter().map(move |p| ProductionField::new(line, p)))
    }

    /// Canonical name, e.g. `pm01_lump`
    pub fn canonical_name(&self) -> String {
        format!("{}_{}", self.line.code(), self.product.code())
    }

    /// Reverse lookup of a canonical name
    pub fn from_canonical(name: &str) -> Option<Self> {
        Self::all().find(|f| f.canonical_name() == name)
    }
}

impl fmt::Display for ProductionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

// ==========================================
// ProductionRow - one tidy production day
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRow {
    pub date: NaiveDate,
    /// tonnage[line][product]
    pub tonnage: [[f64; 3]; 2],
}

impl ProductionRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            tonnage: [[0.0; 3]; 2],
        }
    }

    pub fn tonnage(&self, field: ProductionField) -> f64 {
        self.tonnage[field.line.index()][field.product.index()]
    }

    pub fn add_tonnage(&mut self, field: ProductionField, value: f64) {
        self.tonnage[field.line.index()][field.product.index()] += value;
    }

    /// Sum of the line's product columns
    pub fn line_total(&self, line: Line) -> f64 {
        self.tonnage[line.index()].iter().sum()
    }

    /// Sum of one product over both lines
    pub fn product_total(&self, product: Product) -> f64 {
        Line::ALL
            .iter()
            .map(|line| self.tonnage[line.index()][product.index()])
            .sum()
    }

    /// Overall daily total (sum of all line totals)
    pub fn daily_total(&self) -> f64 {
        Line::ALL.iter().map(|line| self.line_total(*line)).sum()
    }

    pub fn entity_total(&self, entity: Entity) -> f64 {
        match entity {
            Entity::Combined => self.daily_total(),
            Entity::Line(line) => self.line_total(line),
        }
    }

    /// A productive day has strictly positive overall output
    pub fn is_productive(&self) -> bool {
        self.daily_total() > 0.0
    }
}

// ==========================================
// ProductionTable - parsed production sheet
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionTable {
    /// Sorted by date, one row per date
    pub rows: Vec<ProductionRow>,
    /// Canonical fields found in the sheet header
    pub fields_present: Vec<ProductionField>,
}

impl ProductionTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }

    /// Last date with positive output
    pub fn last_productive_date(&self) -> Option<NaiveDate> {
        self.rows.iter().rev().find(|r| r.is_productive()).map(|r| r.date)
    }

    /// Rows inside the inclusive range, date order preserved
    pub fn rows_in(&self, range: &DateRange) -> Vec<&ProductionRow> {
        self.rows.iter().filter(|r| range.contains(r.date)).collect()
    }

    /// Overall production inside the range
    pub fn total_in(&self, range: &DateRange) -> f64 {
        self.rows_in(range).iter().map(|r| r.daily_total()).sum()
    }
}

// ==========================================
// Production snapshot (aggregate output)
// ==========================================

/// Daily chart point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub line_totals: [f64; 2],
    /// Combined lump / hematite / sinter feed
    pub product_totals: [f64; 3],
    pub daily_total: f64,
    pub moving_avg_7d: f64,
}

/// Per-entity KPI row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub entity: Entity,
    pub total: f64,
    pub target: f64,
    pub productive_days: usize,
    pub mean_daily: f64,
    pub last_day_output: f64,
    pub rate_7d: f64,
    pub trend_pct: f64,
    pub attainment_pct: f64,
    pub projected_additional: f64,
    pub projected_total: f64,
    pub projected_attainment_pct: f64,
}

/// Product mix of one line over productive days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMix {
    pub line: Line,
    pub lump: f64,
    pub hematite: f64,
    pub sinter_feed: f64,
}

/// Stock depletion forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockForecast {
    pub initial_stock: f64,
    pub reference_date: NaiveDate,
    pub consumed: f64,
    pub remaining: f64,
    pub rate_7d: f64,
    /// 0 when the rate is 0
    pub days_remaining: f64,
}

impl StockForecast {
    /// A projection only exists with a positive rate and days left
    pub fn is_projectable(&self) -> bool {
        self.rate_7d > 0.0 && self.days_remaining > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionSnapshot {
    pub range: DateRange,
    pub productive_days: usize,
    pub last_productive_date: Option<NaiveDate>,
    pub combined: EntityStats,
    pub lines: Vec<EntityStats>,
    pub product_mix: Vec<ProductMix>,
    pub stock: StockForecast,
    pub daily: Vec<DailyPoint>,
}

impl ProductionSnapshot {
    pub fn entity(&self, entity: Entity) -> Option<&EntityStats> {
        match entity {
            Entity::Combined => Some(&self.combined),
            Entity::Line(_) => self.lines.iter().find(|s| s.entity == entity),
        }
    }
}
