// ==========================================
// Quality report integration tests
// ==========================================
// Real .xlsx bytes -> QualityImporter -> QualityAggregator
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use mining_reports::api::{ApiError, ReportApi};
use mining_reports::config::{QualityConfig, ReportConfig};
use mining_reports::domain::quality::fields;
use mining_reports::domain::{QualityLine, SnapshotSource, TargetStatus};
use mining_reports::engine::QualityAggregator;
use mining_reports::importer::{BlockSpan, ImportError, QualityImporter, ReportImporter};
use test_helpers::{n, quality_rows, t, workbook, write_file, X};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
}

/// Tonnage [0, 0, 50, 0, 30], Fe [60, 0, 65, missing, 66]
fn pmt01() -> Vec<Vec<X>> {
    vec![
        vec![t("2025-09-01"), n(0.0), n(60.0), n(1.4), n(2.0), n(1.0)],
        vec![t("2025-09-02"), n(0.0), n(0.0), n(1.3), X::E, X::E],
        vec![t("2025-09-03"), n(50.0), n(65.0), n(1.2), n(3.0), X::E],
        vec![t("2025-09-04"), n(0.0), X::E, X::E, X::E, X::E],
        vec![t("2025-09-05"), n(30.0), n(66.0), n(1.6), n(2.5), n(1.5)],
    ]
}

fn pmt02() -> Vec<Vec<X>> {
    vec![
        vec![t("2025-09-01"), n(40.0), n(64.0), n(1.1)],
        vec![t("2025-09-02"), n(45.0), n(64.5), n(1.0)],
        vec![t("2025-09-03"), n(0.0), n(0.0), n(0.0)],
    ]
}

fn quality_workbook(date_label: &str) -> Vec<u8> {
    workbook(&[("RESUMO GR", quality_rows(date_label, &pmt01(), &pmt02()))])
}

#[test]
fn test_blocks_detected_from_date_markers() {
    let tables = QualityImporter::excel(QualityConfig::default())
        .parse(&quality_workbook("Data"))
        .unwrap();
    assert!(!tables.block_fallback);

    let block = tables.block(QualityLine::Pmt01).unwrap();
    assert_eq!(block.rows.len(), 5);
    assert!(block.has_column(fields::FE));
    assert!(block.has_column(fields::SIO2));

    // derived fines fraction: parts summed, a missing part counts as 0
    assert_eq!(block.value(&block.rows[0], fields::BELOW_0_15MM), Some(3.0));
    assert_eq!(block.value(&block.rows[2], fields::BELOW_0_15MM), Some(3.0));
    assert_eq!(block.value(&block.rows[3], fields::BELOW_0_15MM), None);

    // PMT 02 is shorter: the padding rows stay, undated
    let other = tables.block(QualityLine::Pmt02).unwrap();
    assert_eq!(other.rows.len(), 5);
    assert_eq!(other.dated_rows().count(), 3);
    assert!(!other.has_column(fields::BELOW_0_15MM));
}

#[test]
fn test_month_mean_and_last_valid_date() {
    let tables = QualityImporter::excel(QualityConfig::default())
        .parse(&quality_workbook("Data"))
        .unwrap();
    let aggregator = QualityAggregator::new();
    let block = tables.block(QualityLine::Pmt01).unwrap();

    assert_eq!(aggregator.month_mean(block, fields::FE), Some(65.5));
    assert_eq!(aggregator.last_valid_date(block), Some(day(5)));
}

#[test]
fn test_snapshot_tiers_and_targets() {
    let config = QualityConfig::default();
    let tables = QualityImporter::excel(config.clone())
        .parse(&quality_workbook("Data"))
        .unwrap();
    let snapshot = QualityAggregator::new().aggregate(&tables, &config).unwrap();

    assert_eq!(snapshot.reference_day, day(5));
    assert_eq!(snapshot.reference_month.to_string(), "Setembro/2025");

    let first = snapshot.line(QualityLine::Pmt01).unwrap();
    assert_eq!(first.source, SnapshotSource::ExactDate);
    assert_eq!(first.latest_value(fields::FE), Some(66.0));
    let fe = first.latest.iter().find(|v| v.indicator == fields::FE).unwrap();
    assert_eq!(fe.status, TargetStatus::Met);

    // PMT 02 has no row for day 5: last productive row (day 2)
    let second = snapshot.line(QualityLine::Pmt02).unwrap();
    assert_eq!(second.source, SnapshotSource::LastProductive);
    assert_eq!(second.last_valid_date, Some(day(2)));
    assert_eq!(second.latest_value(fields::FE), Some(64.5));
    let fe = second.latest.iter().find(|v| v.indicator == fields::FE).unwrap();
    assert_eq!(fe.status, TargetStatus::Missed);
}

#[test]
fn test_fallback_positions_when_markers_missing() {
    let mut config = QualityConfig::default();
    config.fallback_blocks = vec![BlockSpan::new(0, 5), BlockSpan::new(6, 9)];

    let tables = QualityImporter::excel(config)
        .parse(&quality_workbook("Dia"))
        .unwrap();
    assert!(tables.block_fallback);
    let block = tables.block(QualityLine::Pmt01).unwrap();
    assert_eq!(block.rows[4].date, Some(day(5)));
}

#[test]
fn test_default_fallback_outside_small_sheet() {
    let err = QualityImporter::excel(QualityConfig::default())
        .parse(&quality_workbook("Dia"))
        .unwrap_err();
    assert!(matches!(err, ImportError::BlockOutOfRange { .. }));
}

#[test]
fn test_report_api_distribution() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "qualidade.xlsx", &quality_workbook("Data"));

    let api = ReportApi::new(ReportConfig::default());
    let report = api.quality_report(&path).unwrap();
    assert!(!report.block_fallback);

    let fe = report
        .distribution
        .iter()
        .find(|s| s.line == QualityLine::Pmt01 && s.indicator == fields::FE)
        .unwrap();
    // zero reading on day 2 and the gap on day 4 are left out
    assert_eq!(fe.count, 3);
    assert_eq!(fe.min, Some(60.0));
    assert_eq!(fe.max, Some(66.0));
    assert_eq!(fe.week_over_week_pct, 0.0);
}

#[test]
fn test_undated_sheet_is_no_data() {
    let blank = |_: usize| vec![X::E, n(10.0), n(65.0)];
    let rows = quality_rows("Data", &(0..3).map(blank).collect::<Vec<_>>(), &[]);
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "q.xlsx", &workbook(&[("RESUMO GR", rows)]));

    let err = ReportApi::new(ReportConfig::default())
        .quality_report(&path)
        .unwrap_err();
    assert!(matches!(err, ApiError::NoData(_)));
}
