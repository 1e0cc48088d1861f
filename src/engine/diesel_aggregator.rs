// ==========================================
// Tupacery Reports - Diesel Aggregator
// ==========================================
// Input: tidy diesel table + today + config
// Output: DieselSnapshot (month totals, daily averages, projection, pace)
// ==========================================
// "Complete days" are the dates of today's month strictly before
// today; the current day is still being filled and never drives
// averages or the pace label.
// ==========================================

use crate::config::DieselConfig;
use crate::domain::diesel::{DieselDay, DieselSnapshot, DieselTable, PaceTrend, SectorTotals};
use crate::domain::types::Sector;
use crate::engine::error::{AggregateError, AggregateResult, NoDataReason};
use crate::engine::stats::{mean, safe_div};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

/// Days kept for the pace comparison
const PACE_LOOKBACK: usize = 7;
/// Days on each side of the pace comparison
const PACE_HALF: usize = 3;

/// Last calendar day of `date`'s month
pub fn last_day_of_month(date: NaiveDate) -> u32 {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

// ==========================================
// DieselAggregator
// ==========================================
#[derive(Debug, Default)]
pub struct DieselAggregator;

impl DieselAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Computes the month KPIs as of `today`
    ///
    /// # Arguments
    /// * `table` - tidy (date, sector) table
    /// * `today` - reference day; its month is the current month
    /// * `config` - pace thresholds
    ///
    /// # Errors
    /// NoData when the table is empty
    pub fn aggregate(
        &self,
        table: &DieselTable,
        today: NaiveDate,
        config: &DieselConfig,
    ) -> AggregateResult<DieselSnapshot> {
        if table.is_empty() {
            return Err(AggregateError::NoData(NoDataReason::EmptyTable));
        }

        let month: Vec<&DieselDay> = table
            .days
            .iter()
            .filter(|d| d.date.year() == today.year() && d.date.month() == today.month())
            .collect();

        // === Month totals (today included) ===
        let sectors: Vec<SectorTotals> = Sector::ALL
            .iter()
            .map(|&sector| SectorTotals {
                sector,
                litres: month.iter().filter(|d| d.sector == sector).map(|d| d.litres).sum(),
                cost: month.iter().filter(|d| d.sector == sector).map(|d| d.cost).sum(),
            })
            .collect();
        let total_litres: f64 = sectors.iter().map(|s| s.litres).sum();
        let total_cost: f64 = sectors.iter().map(|s| s.cost).sum();
        let avg_cost_per_litre = if total_litres > 0.0 {
            safe_div(total_cost, total_litres)
        } else {
            0.0
        };

        // === Complete days: both sectors summed per date ===
        let complete = daily_totals(month.iter().copied().filter(|d| d.date < today));
        let complete_days = complete.len();
        let avg_daily_litres = safe_div(
            complete.values().map(|(litres, _)| litres).sum(),
            complete_days as f64,
        );
        let avg_daily_cost = safe_div(
            complete.values().map(|(_, cost)| cost).sum(),
            complete_days as f64,
        );

        let days_left_in_month = last_day_of_month(today).saturating_sub(today.day());
        let projected_litres = total_litres + avg_daily_litres * days_left_in_month as f64;
        let projected_cost = total_cost + avg_daily_cost * days_left_in_month as f64;

        let litres_by_day: Vec<f64> = complete.values().map(|(litres, _)| *litres).collect();
        let pace = self.pace(&litres_by_day, config);

        debug!(
            today = %today,
            month_rows = month.len(),
            complete_days,
            total_litres,
            pace = ?pace,
            "diesel aggregated"
        );

        Ok(DieselSnapshot {
            today,
            sectors,
            total_litres,
            total_cost,
            avg_cost_per_litre,
            complete_days,
            avg_daily_litres,
            avg_daily_cost,
            days_left_in_month,
            projected_litres,
            projected_cost,
            pace,
        })
    }

    /// Pace label from date-ordered daily consumption
    ///
    /// With `pace_min_days` or more days the mean of the last 3 days is
    /// compared with the 3 before them inside a +-band; with 2 or more
    /// days the last two days are compared directly.
    pub fn pace(&self, daily_litres: &[f64], config: &DieselConfig) -> PaceTrend {
        let lookback = &daily_litres[daily_litres.len().saturating_sub(PACE_LOOKBACK)..];
        let n = lookback.len();

        if n >= config.pace_min_days.max(2 * PACE_HALF) {
            let last = mean(&lookback[n - PACE_HALF..]).unwrap_or(0.0);
            let previous = mean(&lookback[n - 2 * PACE_HALF..n - PACE_HALF]).unwrap_or(0.0);
            let band = config.pace_band_pct / 100.0;
            if previous == 0.0 {
                PaceTrend::StableWithoutBaseline
            } else if last > previous * (1.0 + band) {
                PaceTrend::Rising
            } else if last < previous * (1.0 - band) {
                PaceTrend::Falling
            } else {
                PaceTrend::Stable
            }
        } else if n >= 2 {
            let last = lookback[n - 1];
            let previous = lookback[n - 2];
            if last > previous {
                PaceTrend::Rising
            } else if last < previous {
                PaceTrend::Falling
            } else {
                PaceTrend::Stable
            }
        } else {
            PaceTrend::InsufficientData
        }
    }
}

/// (litres, cost) per date, both sectors combined
fn daily_totals<'a>(days: impl Iterator<Item = &'a DieselDay>) -> BTreeMap<NaiveDate, (f64, f64)> {
    let mut totals: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();
    for day in days {
        let entry = totals.entry(day.date).or_insert((0.0, 0.0));
        entry.0 += day.litres;
        entry.1 += day.cost;
    }
    totals
}
