// ==========================================
// Tupacery Reports - Quality Aggregator
// ==========================================
// Input: two tidy quality blocks (PMT 01, PMT 02)
// Output: latest-day snapshot, month means, long-form data,
//         distribution stats and trend series
// ==========================================
// Fallback tiers (kept in this order):
//   last valid date: Ton > 0 -> any value -> any date
//   snapshot row:    exact date -> last Ton > 0 -> last with values
// ==========================================

use crate::config::QualityConfig;
use crate::domain::quality::{
    IndicatorStats, IndicatorValue, LineQuality, QualityBlock, QualityObservation, QualityRow,
    QualitySnapshot, QualityTables, ReferenceMonth, SnapshotSource, TrendPoint,
};
use crate::domain::types::QualityLine;
use crate::engine::error::{AggregateError, AggregateResult, NoDataReason};
use crate::engine::stats;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct QualityAggregator;

impl QualityAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Latest date of the block that carries data
    pub fn last_valid_date(&self, block: &QualityBlock) -> Option<NaiveDate> {
        let productive = if block.has_tonnage() {
            max_date_where(block, |row| block.is_productive(row))
        } else {
            None
        };

        productive
            .or_else(|| max_date_where(block, QualityBlock::has_any_value))
            .or_else(|| max_date_where(block, |_| true))
    }

    /// Row that represents `date` for this block, with the tier used
    pub fn snapshot_row<'a>(
        &self,
        block: &'a QualityBlock,
        date: NaiveDate,
    ) -> (Option<&'a QualityRow>, SnapshotSource) {
        if let Some(row) = block.rows.iter().find(|r| r.date == Some(date)) {
            return (Some(row), SnapshotSource::ExactDate);
        }
        if block.has_tonnage() {
            if let Some(row) = block.rows.iter().rev().find(|r| block.is_productive(r)) {
                return (Some(row), SnapshotSource::LastProductive);
            }
        }
        if let Some(row) = block.rows.iter().rev().find(|r| QualityBlock::has_any_value(r)) {
            return (Some(row), SnapshotSource::LastWithValues);
        }
        (None, SnapshotSource::Unavailable)
    }

    /// Mean of one indicator over productive rows, zero readings excluded
    ///
    /// Without a Ton column, rows with any value qualify; with a Ton
    /// column but no productive row, every row qualifies.
    pub fn month_mean(&self, block: &QualityBlock, indicator: &str) -> Option<f64> {
        let idx = block.column_index(indicator)?;

        let any_productive = block.rows.iter().any(|r| block.is_productive(r));
        let qualifies = |row: &QualityRow| {
            if block.has_tonnage() {
                !any_productive || block.is_productive(row)
            } else {
                QualityBlock::has_any_value(row)
            }
        };

        let values: Vec<f64> = block
            .rows
            .iter()
            .filter(|r| qualifies(*r))
            .filter_map(|r| r.values.get(idx).copied().flatten())
            .filter(|v| *v != 0.0)
            .collect();
        stats::mean(&values)
    }

    /// Both blocks stacked with a line tag; undated rows are left out
    pub fn observations(&self, tables: &QualityTables) -> Vec<QualityObservation> {
        tables
            .blocks
            .iter()
            .flat_map(|block| {
                block.dated_rows().map(move |(date, row)| QualityObservation {
                    line: block.line,
                    date,
                    values: block
                        .columns
                        .iter()
                        .cloned()
                        .zip(row.values.iter().copied())
                        .collect::<BTreeMap<_, _>>(),
                })
            })
            .collect()
    }

    /// Latest-day snapshot and month means for both lines
    ///
    /// # Errors
    /// NoData when no block has a usable date
    pub fn aggregate(
        &self,
        tables: &QualityTables,
        config: &QualityConfig,
    ) -> AggregateResult<QualitySnapshot> {
        let last_dates: Vec<Option<NaiveDate>> = tables
            .blocks
            .iter()
            .map(|b| self.last_valid_date(b))
            .collect();
        let reference_day = last_dates
            .iter()
            .flatten()
            .max()
            .copied()
            .ok_or(AggregateError::NoData(NoDataReason::NoValidDates))?;

        let lines = tables
            .blocks
            .iter()
            .zip(last_dates)
            .map(|(block, last_valid_date)| {
                let (row, source) = self.snapshot_row(block, reference_day);
                let latest = config
                    .indicators
                    .iter()
                    .map(|ind| {
                        let value = row.and_then(|r| block.value(r, ind));
                        indicator_value(config, ind, value)
                    })
                    .collect();
                let month_mean = config
                    .indicators
                    .iter()
                    .map(|ind| indicator_value(config, ind, self.month_mean(block, ind)))
                    .collect();

                debug!(line = %block.line, ?source, ?last_valid_date, "quality line snapshot");
                LineQuality {
                    line: block.line,
                    last_valid_date,
                    source,
                    latest,
                    month_mean,
                }
            })
            .collect();

        Ok(QualitySnapshot {
            reference_day,
            reference_month: ReferenceMonth::from(reference_day),
            lines,
            observations: self.observations(tables),
        })
    }

    /// Date-ordered non-zero readings of one indicator on one line
    pub fn trend_series(
        &self,
        observations: &[QualityObservation],
        line: QualityLine,
        indicator: &str,
    ) -> Vec<TrendPoint> {
        let mut points: Vec<TrendPoint> = observations
            .iter()
            .filter(|o| o.line == line)
            .filter_map(|o| {
                o.value(indicator)
                    .filter(|v| *v != 0.0)
                    .map(|value| TrendPoint { date: o.date, value })
            })
            .collect();
        points.sort_by_key(|p| p.date);
        points
    }

    /// Distribution and week-over-week delta of one indicator on one line
    pub fn indicator_stats(
        &self,
        observations: &[QualityObservation],
        line: QualityLine,
        indicator: &str,
        trend_window: usize,
    ) -> IndicatorStats {
        let values: Vec<f64> = self
            .trend_series(observations, line, indicator)
            .iter()
            .map(|p| p.value)
            .collect();

        IndicatorStats {
            line,
            indicator: indicator.to_string(),
            count: values.len(),
            mean: stats::mean(&values),
            median: stats::median(&values),
            std_dev: stats::sample_std(&values),
            min: stats::min(&values),
            max: stats::max(&values),
            cv_pct: stats::coefficient_of_variation(&values),
            week_over_week_pct: stats::week_over_week_pct(&values, trend_window),
        }
    }

    /// Stats for every configured indicator on every line
    pub fn distribution(
        &self,
        snapshot: &QualitySnapshot,
        config: &QualityConfig,
    ) -> Vec<IndicatorStats> {
        QualityLine::ALL
            .iter()
            .flat_map(|&line| {
                config.indicators.iter().map(move |ind| {
                    self.indicator_stats(&snapshot.observations, line, ind, config.trend_window)
                })
            })
            .collect()
    }
}

fn max_date_where(
    block: &QualityBlock,
    keep: impl Fn(&QualityRow) -> bool,
) -> Option<NaiveDate> {
    block
        .dated_rows()
        .filter(|(_, row)| keep(*row))
        .map(|(date, _)| date)
        .max()
}

fn indicator_value(config: &QualityConfig, indicator: &str, value: Option<f64>) -> IndicatorValue {
    IndicatorValue {
        indicator: indicator.to_string(),
        value,
        status: config.status(indicator, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quality::{fields, TargetStatus};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn block(line: QualityLine, columns: &[&str], rows: Vec<(Option<u32>, Vec<Option<f64>>)>) -> QualityBlock {
        let mut block = QualityBlock::new(line, columns.iter().map(|c| c.to_string()).collect());
        block.rows = rows
            .into_iter()
            .map(|(d, values)| QualityRow {
                date: d.map(day),
                values,
            })
            .collect();
        block
    }

    /// Ton [0, 0, 50, 0, 30], Fe [60, 0, 65, -, 66]
    fn scenario_block() -> QualityBlock {
        block(
            QualityLine::Pmt01,
            &[fields::TON, fields::FE],
            vec![
                (Some(1), vec![Some(0.0), Some(60.0)]),
                (Some(2), vec![Some(0.0), Some(0.0)]),
                (Some(3), vec![Some(50.0), Some(65.0)]),
                (Some(4), vec![Some(0.0), None]),
                (Some(5), vec![Some(30.0), Some(66.0)]),
            ],
        )
    }

    #[test]
    fn test_month_mean_scenario() {
        let aggregator = QualityAggregator::new();
        let block = scenario_block();
        assert_eq!(aggregator.month_mean(&block, fields::FE), Some(65.5));
        assert_eq!(aggregator.last_valid_date(&block), Some(day(5)));
        assert_eq!(aggregator.month_mean(&block, fields::SIO2), None);
    }

    #[test]
    fn test_last_valid_date_tiers() {
        let aggregator = QualityAggregator::new();

        // No productive row: falls to the last row with any value
        let idle = block(
            QualityLine::Pmt02,
            &[fields::TON, fields::FE],
            vec![
                (Some(1), vec![Some(0.0), Some(64.0)]),
                (Some(2), vec![None, Some(63.0)]),
                (Some(3), vec![None, None]),
            ],
        );
        assert_eq!(aggregator.last_valid_date(&idle), Some(day(2)));

        // Nothing measured at all: last parseable date
        let empty = block(
            QualityLine::Pmt02,
            &[fields::FE],
            vec![(Some(1), vec![None]), (Some(4), vec![None]), (None, vec![None])],
        );
        assert_eq!(aggregator.last_valid_date(&empty), Some(day(4)));

        let undated = block(QualityLine::Pmt02, &[fields::FE], vec![(None, vec![Some(1.0)])]);
        assert_eq!(aggregator.last_valid_date(&undated), None);
    }

    #[test]
    fn test_snapshot_row_tiers() {
        let aggregator = QualityAggregator::new();
        let scenario = scenario_block();

        let (row, source) = aggregator.snapshot_row(&scenario, day(4));
        assert_eq!(source, SnapshotSource::ExactDate);
        assert_eq!(row.unwrap().date, Some(day(4)));

        let (row, source) = aggregator.snapshot_row(&scenario, day(9));
        assert_eq!(source, SnapshotSource::LastProductive);
        assert_eq!(row.unwrap().date, Some(day(5)));

        let no_ton = block_without_tonnage();
        let (row, source) = aggregator.snapshot_row(&no_ton, day(9));
        assert_eq!(source, SnapshotSource::LastWithValues);
        assert_eq!(row.unwrap().date, Some(day(2)));

        let blank = block(QualityLine::Pmt02, &[fields::FE], vec![(Some(1), vec![None])]);
        assert_eq!(
            aggregator.snapshot_row(&blank, day(9)),
            (None, SnapshotSource::Unavailable)
        );
    }

    fn block_without_tonnage() -> QualityBlock {
        block(
            QualityLine::Pmt02,
            &[fields::FE, fields::SIO2],
            vec![
                (Some(1), vec![Some(64.0), Some(1.2)]),
                (Some(2), vec![Some(66.0), None]),
                (Some(3), vec![None, None]),
            ],
        )
    }

    #[test]
    fn test_aggregate_reference_day_and_status() {
        let tables = QualityTables {
            blocks: vec![scenario_block(), block_without_tonnage()],
            block_fallback: false,
        };
        let config = QualityConfig::default();
        let snapshot = QualityAggregator::new().aggregate(&tables, &config).unwrap();

        assert_eq!(snapshot.reference_day, day(5));
        assert_eq!(snapshot.reference_month.to_string(), "Setembro/2025");

        let pmt01 = snapshot.line(QualityLine::Pmt01).unwrap();
        assert_eq!(pmt01.source, SnapshotSource::ExactDate);
        assert_eq!(pmt01.latest_value(fields::FE), Some(66.0));
        assert_eq!(pmt01.latest[0].status, TargetStatus::Met);
        assert_eq!(pmt01.mean_value(fields::FE), Some(65.5));

        let pmt02 = snapshot.line(QualityLine::Pmt02).unwrap();
        assert_eq!(pmt02.last_valid_date, Some(day(2)));
        assert_eq!(pmt02.source, SnapshotSource::LastWithValues);
        assert_eq!(pmt02.mean_value(fields::FE), Some(65.0));
        assert_eq!(pmt02.latest_value(fields::TMP), None);

        // 5 dated rows + 3 dated rows
        assert_eq!(snapshot.observations.len(), 8);
    }

    #[test]
    fn test_aggregate_without_dates_is_no_data() {
        let tables = QualityTables {
            blocks: vec![block(QualityLine::Pmt01, &[fields::FE], vec![(None, vec![Some(65.0)])])],
            block_fallback: true,
        };
        let err = QualityAggregator::new()
            .aggregate(&tables, &QualityConfig::default())
            .unwrap_err();
        assert_eq!(err.reason(), NoDataReason::NoValidDates);
    }

    #[test]
    fn test_indicator_stats_skip_zero_and_missing() {
        let tables = QualityTables {
            blocks: vec![scenario_block()],
            block_fallback: false,
        };
        let aggregator = QualityAggregator::new();
        let observations = aggregator.observations(&tables);
        let stats = aggregator.indicator_stats(&observations, QualityLine::Pmt01, fields::FE, 7);

        assert_eq!(stats.count, 3);
        assert_eq!(stats.median, Some(65.0));
        assert_eq!(stats.min, Some(60.0));
        assert!(stats.cv_pct.is_some());
        assert_eq!(stats.week_over_week_pct, 0.0);

        let series = aggregator.trend_series(&observations, QualityLine::Pmt01, fields::FE);
        let dates: Vec<NaiveDate> = series.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(1), day(3), day(5)]);
    }
}
