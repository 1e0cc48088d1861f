// ==========================================
// Tupacery Reports - Report Constants
// ==========================================
// Targets, stock baseline, sheet layout and quality limits.
// Every field has a default; a JSON override only needs the
// fields it changes.
// ==========================================

use crate::domain::quality::{fields, TargetStatus};
use crate::domain::types::Entity;
use crate::importer::block_detector::BlockSpan;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    pub production: ProductionConfig,
    pub quality: QualityConfig,
    pub diesel: DieselConfig,
}

// ==========================================
// Production
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    pub sheet_name: String,
    pub header_depth: usize,
    /// Daily tonnage target of one line
    pub line_daily_target: f64,
    /// Lump share of the line target; the rest is sinter feed
    pub lump_daily_target: f64,
    pub initial_stock: f64,
    pub stock_reference_date: NaiveDate,
    pub default_period_start: NaiveDate,
    pub moving_average_window: usize,
    /// Readings per side of the week-over-week comparison
    pub trend_window: usize,
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self {
            sheet_name: "BD_Real".to_string(),
            header_depth: 3,
            line_daily_target: 5000.0,
            lump_daily_target: 3240.0,
            initial_stock: 189_544.0,
            stock_reference_date: ymd(2025, 9, 16),
            default_period_start: ymd(2025, 8, 26),
            moving_average_window: 7,
            trend_window: 7,
        }
    }
}

impl ProductionConfig {
    pub fn sinter_daily_target(&self) -> f64 {
        self.line_daily_target - self.lump_daily_target
    }

    /// Combined target covers both lines
    pub fn combined_daily_target(&self) -> f64 {
        self.line_daily_target * 2.0
    }

    pub fn daily_target(&self, entity: Entity) -> f64 {
        match entity {
            Entity::Combined => self.combined_daily_target(),
            Entity::Line(_) => self.line_daily_target,
        }
    }
}

// ==========================================
// Quality
// ==========================================

/// How a target value is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Min,
    Max,
    /// Reference line only, no pass/fail
    Reference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityTarget {
    pub indicator: String,
    pub kind: TargetKind,
    pub value: f64,
}

impl QualityTarget {
    pub fn new(indicator: &str, kind: TargetKind, value: f64) -> Self {
        Self {
            indicator: indicator.to_string(),
            kind,
            value,
        }
    }

    pub fn evaluate(&self, observed: Option<f64>) -> TargetStatus {
        match (observed, self.kind) {
            (None, _) => TargetStatus::Unknown,
            (Some(_), TargetKind::Reference) => TargetStatus::NoLimit,
            (Some(v), TargetKind::Min) if v >= self.value => TargetStatus::Met,
            (Some(v), TargetKind::Max) if v <= self.value => TargetStatus::Met,
            (Some(_), _) => TargetStatus::Missed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    pub sheet_name: String,
    pub header_depth: usize,
    /// Data rows read below the header
    pub data_rows: usize,
    /// Blocks in sheet order: PMT 01 then PMT 02
    pub fallback_blocks: Vec<BlockSpan>,
    pub indicators: Vec<String>,
    pub targets: Vec<QualityTarget>,
    pub trend_window: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            sheet_name: "RESUMO GR".to_string(),
            header_depth: 2,
            data_rows: 34,
            fallback_blocks: vec![BlockSpan::new(260, 267), BlockSpan::new(709, 716)],
            indicators: [
                fields::FE,
                fields::SIO2,
                fields::AL2O3,
                fields::TMP,
                fields::ABOVE_31_5MM,
                fields::BELOW_0_15MM,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            targets: vec![
                QualityTarget::new(fields::FE, TargetKind::Min, 65.0),
                QualityTarget::new(fields::SIO2, TargetKind::Max, 1.5),
                QualityTarget::new(fields::AL2O3, TargetKind::Max, 0.8),
                QualityTarget::new(fields::TMP, TargetKind::Reference, 18.0),
                QualityTarget::new(fields::ABOVE_31_5MM, TargetKind::Max, 10.0),
                QualityTarget::new(fields::BELOW_0_15MM, TargetKind::Max, 5.0),
            ],
            trend_window: 7,
        }
    }
}

impl QualityConfig {
    pub fn target(&self, indicator: &str) -> Option<&QualityTarget> {
        self.targets.iter().find(|t| t.indicator == indicator)
    }

    /// Status of a value against the indicator's target, if any
    pub fn status(&self, indicator: &str, value: Option<f64>) -> TargetStatus {
        match self.target(indicator) {
            Some(target) => target.evaluate(value),
            None if value.is_some() => TargetStatus::NoLimit,
            None => TargetStatus::Unknown,
        }
    }
}

// ==========================================
// Diesel
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DieselConfig {
    /// None reads the first sheet
    pub sheet_name: Option<String>,
    /// Area code of the expedition sector
    pub expedition_code: String,
    /// Area code of the screening sector
    pub screening_code: String,
    /// Minimum complete days for the 3-vs-3 pace comparison
    pub pace_min_days: usize,
    /// Relative band treated as stable, in %
    pub pace_band_pct: f64,
}

impl Default for DieselConfig {
    fn default() -> Self {
        Self {
            sheet_name: None,
            expedition_code: "Tup".to_string(),
            screening_code: "Rep".to_string(),
            pace_min_days: 6,
            pace_band_pct: 5.0,
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Line;

    #[test]
    fn test_default_constants() {
        let config = ReportConfig::default();
        assert_eq!(config.production.line_daily_target, 5000.0);
        assert_eq!(config.production.sinter_daily_target(), 1760.0);
        assert_eq!(config.production.daily_target(Entity::Combined), 10000.0);
        assert_eq!(config.production.daily_target(Entity::Line(Line::Pm04)), 5000.0);
        assert_eq!(
            config.production.stock_reference_date,
            NaiveDate::from_ymd_opt(2025, 9, 16).unwrap()
        );
        assert_eq!(config.quality.data_rows, 34);
        assert_eq!(config.quality.fallback_blocks[0], BlockSpan::new(260, 267));
        assert_eq!(config.quality.indicators.len(), 6);
    }

    #[test]
    fn test_target_evaluation() {
        let quality = QualityConfig::default();
        assert_eq!(quality.status(fields::FE, Some(65.2)), TargetStatus::Met);
        assert_eq!(quality.status(fields::FE, Some(64.9)), TargetStatus::Missed);
        assert_eq!(quality.status(fields::SIO2, Some(1.5)), TargetStatus::Met);
        assert_eq!(quality.status(fields::AL2O3, Some(0.81)), TargetStatus::Missed);
        assert_eq!(quality.status(fields::TMP, Some(25.0)), TargetStatus::NoLimit);
        assert_eq!(quality.status(fields::FE, None), TargetStatus::Unknown);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "production": { "line_daily_target": 5500.0 } }"#;
        let config: ReportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.production.line_daily_target, 5500.0);
        assert_eq!(config.production.lump_daily_target, 3240.0);
        assert_eq!(config.quality.sheet_name, "RESUMO GR");
        assert_eq!(config.diesel.expedition_code, "Tup");
    }
}
