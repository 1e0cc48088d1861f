// ==========================================
// Tupacery Reports - Report API
// ==========================================
// Entry point for callers (CLI, dashboards): file in, snapshot out.
// Parsed tables are cached per report type by file fingerprint;
// aggregation always reruns since it is cheap and depends on the
// selected range or reference day.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ReportConfig;
use crate::domain::diesel::{DieselSnapshot, DieselTable};
use crate::domain::production::{ProductionSnapshot, ProductionTable};
use crate::domain::quality::{IndicatorStats, QualitySnapshot, QualityTables};
use crate::domain::types::DateRange;
use crate::engine::{DieselAggregator, NoDataReason, ProductionAggregator, QualityAggregator};
use crate::importer::error::ImportError;
use crate::importer::{
    reader_for_extension, DieselImporter, ProductionImporter, QualityImporter, ReportImporter,
    SheetReader,
};
use crate::source::SourceCache;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Report types served by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Production,
    Quality,
    Diesel,
}

impl std::str::FromStr for ReportKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" | "producao" => Ok(ReportKind::Production),
            "quality" | "qualidade" => Ok(ReportKind::Quality),
            "diesel" => Ok(ReportKind::Diesel),
            other => Err(ApiError::InvalidInput(format!("unknown report: {}", other))),
        }
    }
}

/// Quality snapshot plus per-indicator distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub snapshot: QualitySnapshot,
    pub distribution: Vec<IndicatorStats>,
    /// Blocks came from the fixed legacy positions
    pub block_fallback: bool,
}

/// Picks the sheet reader from the file extension
pub fn reader_for_path(path: &Path) -> ApiResult<Box<dyn SheetReader>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ImportError::UnsupportedFormat(path.display().to_string()))?;
    Ok(reader_for_extension(ext)?)
}

// ==========================================
// ReportApi
// ==========================================
pub struct ReportApi {
    config: ReportConfig,
    production: SourceCache<ProductionTable>,
    quality: SourceCache<QualityTables>,
    diesel: SourceCache<DieselTable>,
}

impl ReportApi {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            production: SourceCache::new(),
            quality: SourceCache::new(),
            diesel: SourceCache::new(),
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    // ==========================================
    // Parse (cached)
    // ==========================================

    pub fn production_table(&self, path: &Path) -> ApiResult<Arc<ProductionTable>> {
        let importer = ProductionImporter::new(self.config.production.clone(), reader_for_path(path)?);
        Ok(self.production.load(path, |bytes| importer.parse(bytes))?)
    }

    pub fn quality_tables(&self, path: &Path) -> ApiResult<Arc<QualityTables>> {
        let importer = QualityImporter::new(self.config.quality.clone(), reader_for_path(path)?);
        Ok(self.quality.load(path, |bytes| importer.parse(bytes))?)
    }

    pub fn diesel_table(&self, path: &Path) -> ApiResult<Arc<DieselTable>> {
        let importer = DieselImporter::new(self.config.diesel.clone(), reader_for_path(path)?);
        Ok(self.diesel.load(path, |bytes| importer.parse(bytes))?)
    }

    // ==========================================
    // Reports
    // ==========================================

    /// Production KPIs for `range`, or for the default period
    ///
    /// # Errors
    /// NoData when the table has no productive day to anchor the
    /// default period, or the aggregator finds nothing in the range
    pub fn production_report(
        &self,
        path: &Path,
        range: Option<DateRange>,
    ) -> ApiResult<ProductionSnapshot> {
        let table = self.production_table(path)?;
        let aggregator = ProductionAggregator::new();
        let range = match range {
            Some(range) => range,
            None => aggregator
                .default_range(&table, &self.config.production)
                .ok_or(ApiError::NoData(NoDataReason::EmptyTable))?,
        };

        let snapshot = aggregator.aggregate(&table, range, &self.config.production)?;
        info!(
            report = "production",
            range = %snapshot.range,
            productive_days = snapshot.productive_days,
            "report ready"
        );
        Ok(snapshot)
    }

    pub fn quality_report(&self, path: &Path) -> ApiResult<QualityReport> {
        let tables = self.quality_tables(path)?;
        let aggregator = QualityAggregator::new();
        let snapshot = aggregator.aggregate(&tables, &self.config.quality)?;
        let distribution = aggregator.distribution(&snapshot, &self.config.quality);

        info!(
            report = "quality",
            reference_day = %snapshot.reference_day,
            block_fallback = tables.block_fallback,
            "report ready"
        );
        Ok(QualityReport {
            snapshot,
            distribution,
            block_fallback: tables.block_fallback,
        })
    }

    pub fn diesel_report(&self, path: &Path, today: NaiveDate) -> ApiResult<DieselSnapshot> {
        let table = self.diesel_table(path)?;
        let snapshot = DieselAggregator::new().aggregate(&table, today, &self.config.diesel)?;
        info!(
            report = "diesel",
            today = %today,
            total_litres = snapshot.total_litres,
            "report ready"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_report_kind_parsing() {
        assert_eq!("production".parse::<ReportKind>().unwrap(), ReportKind::Production);
        assert_eq!(" Qualidade ".parse::<ReportKind>().unwrap(), ReportKind::Quality);
        assert!("stock".parse::<ReportKind>().is_err());
    }

    #[test]
    fn test_reader_for_path_rejects_unknown_extension() {
        assert!(reader_for_path(Path::new("data.csv")).is_ok());
        assert!(reader_for_path(Path::new("data.XLSX")).is_ok());
        assert!(reader_for_path(Path::new("data.ods")).is_err());
        assert!(reader_for_path(Path::new("data")).is_err());
    }

    #[test]
    fn test_diesel_report_from_csv() {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "DataInclusao,ConsumoDiesel,CustoUnitario,CustoTotalAbastecimento,Setor,DataConsumo"
        )
        .unwrap();
        writeln!(file, "2025-09-01,100,6,600,Tup,2025-09-01").unwrap();
        writeln!(file, "2025-09-02,50,6,300,Rep,2025-09-02").unwrap();
        writeln!(file, "2025-09-02,70,6,420,Oficina,2025-09-02").unwrap();
        file.flush().unwrap();

        let api = ReportApi::new(ReportConfig::default());
        let today = NaiveDate::from_ymd_opt(2025, 9, 3).unwrap();
        let snap = api.diesel_report(file.path(), today).unwrap();
        assert_eq!(snap.total_litres, 150.0);
        assert_eq!(snap.complete_days, 2);

        // second call is served from the cache
        let again = api.diesel_report(file.path(), today).unwrap();
        assert_eq!(again, snap);
    }

    #[test]
    fn test_missing_file_is_structural() {
        let api = ReportApi::new(ReportConfig::default());
        let err = api
            .diesel_report(Path::new("/nonexistent/diesel.csv"), NaiveDate::MIN)
            .unwrap_err();
        assert!(!err.is_no_data());
    }
}
