// ==========================================
// Tupacery Reports - Diesel Consumption Table & Snapshot
// ==========================================

use crate::domain::types::Sector;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical diesel column names
pub mod fields {
    pub const INCLUSION_DATE: &str = "DataInclusao";
    pub const QUANTITY: &str = "ConsumoDiesel";
    pub const UNIT_COST: &str = "CustoUnitario";
    pub const TOTAL_COST: &str = "CustoTotalAbastecimento";
    pub const SECTOR: &str = "Setor";
    pub const CONSUMPTION_DATE: &str = "DataConsumo";
}

/// One refuelling record after cleaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefuelRecord {
    pub date: NaiveDate,
    pub sector: Sector,
    pub litres: f64,
    pub unit_cost: f64,
    pub total_cost: f64,
}

/// One tidy row per (date, sector)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieselDay {
    pub date: NaiveDate,
    pub sector: Sector,
    pub litres: f64,
    pub cost: f64,
    pub cumulative_litres: f64,
    pub cumulative_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DieselTable {
    /// Sorted by (date, sector)
    pub days: Vec<DieselDay>,
}

impl DieselTable {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn sector_days(&self, sector: Sector) -> impl Iterator<Item = &DieselDay> {
        self.days.iter().filter(move |d| d.sector == sector)
    }
}

/// Consumption pace compared with the preceding days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceTrend {
    Rising,
    Falling,
    Stable,
    StableWithoutBaseline,
    InsufficientData,
}

impl fmt::Display for PaceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaceTrend::Rising => write!(f, "Aumentando"),
            PaceTrend::Falling => write!(f, "Diminuindo"),
            PaceTrend::Stable => write!(f, "Estável"),
            PaceTrend::StableWithoutBaseline => {
                write!(f, "Estável (sem consumo anterior para comparação)")
            }
            PaceTrend::InsufficientData => write!(f, "Não há dados suficientes"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorTotals {
    pub sector: Sector,
    pub litres: f64,
    pub cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieselSnapshot {
    pub today: NaiveDate,
    pub sectors: Vec<SectorTotals>,
    pub total_litres: f64,
    pub total_cost: f64,
    pub avg_cost_per_litre: f64,
    pub complete_days: usize,
    pub avg_daily_litres: f64,
    pub avg_daily_cost: f64,
    pub days_left_in_month: u32,
    pub projected_litres: f64,
    pub projected_cost: f64,
    pub pace: PaceTrend,
}

impl DieselSnapshot {
    /// Sector with the larger consumption (ties go to Screening)
    pub fn leading_sector(&self) -> Option<Sector> {
        let exp = self.sectors.iter().find(|s| s.sector == Sector::Expedition)?;
        let scr = self.sectors.iter().find(|s| s.sector == Sector::Screening)?;
        if exp.litres > scr.litres {
            Some(Sector::Expedition)
        } else {
            Some(Sector::Screening)
        }
    }
}
