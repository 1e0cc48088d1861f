// ==========================================
// Tupacery Reports - Production Aggregator
// ==========================================
// Input: tidy production table + date range + targets
// Output: ProductionSnapshot (KPIs, mix, stock forecast, daily series)
// ==========================================
// Averages count productive days only: an idle day neither
// lowers the mean nor enters the target denominator.
// ==========================================

use crate::config::ProductionConfig;
use crate::domain::production::{
    DailyPoint, EntityStats, ProductMix, ProductionRow, ProductionSnapshot, ProductionTable,
    StockForecast,
};
use crate::domain::types::{DateRange, Entity, Line, Product};
use crate::engine::error::{AggregateError, AggregateResult, NoDataReason};
use crate::engine::stats::{finite_or_zero, last_rolling_mean, pct, rolling_mean, safe_div, week_over_week_pct};
use tracing::debug;

/// Goal attainment in %: total / (daily target x productive days)
///
/// 0 when there are no productive days.
pub fn attainment_pct(total: f64, daily_target: f64, productive_days: usize) -> f64 {
    pct(total, daily_target * productive_days as f64)
}

// ==========================================
// ProductionAggregator
// ==========================================
#[derive(Debug, Default)]
pub struct ProductionAggregator;

impl ProductionAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Configured period start through the last productive day
    pub fn default_range(
        &self,
        table: &ProductionTable,
        config: &ProductionConfig,
    ) -> Option<DateRange> {
        let end = table.last_productive_date()?;
        Some(DateRange::new(config.default_period_start.min(end), end))
    }

    /// Computes the production snapshot for `range`
    ///
    /// # Errors
    /// NoData when the table is empty, the range holds no rows,
    /// or none of its rows is productive
    pub fn aggregate(
        &self,
        table: &ProductionTable,
        range: DateRange,
        config: &ProductionConfig,
    ) -> AggregateResult<ProductionSnapshot> {
        if table.is_empty() {
            return Err(AggregateError::NoData(NoDataReason::EmptyTable));
        }

        let rows = table.rows_in(&range);
        if rows.is_empty() {
            return Err(AggregateError::NoData(NoDataReason::EmptyRange { range }));
        }

        // === Daily series over every row of the range ===
        let totals: Vec<f64> = rows.iter().map(|r| r.daily_total()).collect();
        let moving_avg = rolling_mean(&totals, config.moving_average_window);
        let daily = rows
            .iter()
            .zip(&moving_avg)
            .map(|(row, ma)| daily_point(row, *ma))
            .collect();

        // === Productive rows drive every average ===
        let productive: Vec<&ProductionRow> =
            rows.iter().copied().filter(|r| r.is_productive()).collect();
        if productive.is_empty() {
            return Err(AggregateError::NoData(NoDataReason::NoProductiveDays { range }));
        }

        let rate_7d = moving_avg.last().copied().unwrap_or(0.0);
        let stock = self.stock_forecast(table, rate_7d, config);

        let combined = entity_stats(
            Entity::Combined,
            &productive,
            rate_7d,
            &stock,
            config,
        );
        let lines: Vec<EntityStats> = Line::ALL
            .iter()
            .map(|&line| {
                let series: Vec<f64> = productive.iter().map(|r| r.line_total(line)).collect();
                let rate = last_rolling_mean(&series, config.moving_average_window);
                entity_stats(Entity::Line(line), &productive, rate, &stock, config)
            })
            .collect();

        let product_mix = Line::ALL
            .iter()
            .map(|&line| product_mix(line, &productive))
            .collect();

        debug!(
            range = %range,
            rows = rows.len(),
            productive_days = productive.len(),
            total = combined.total,
            "production aggregated"
        );

        Ok(ProductionSnapshot {
            range,
            productive_days: productive.len(),
            last_productive_date: productive.last().map(|r| r.date),
            combined,
            lines,
            product_mix,
            stock,
            daily,
        })
    }

    /// Stock left after everything produced after the reference date
    ///
    /// Consumption uses the whole table, not the selected range.
    pub fn stock_forecast(
        &self,
        table: &ProductionTable,
        rate_7d: f64,
        config: &ProductionConfig,
    ) -> StockForecast {
        let consumed: f64 = table
            .rows
            .iter()
            .filter(|r| r.date > config.stock_reference_date)
            .map(|r| r.daily_total())
            .sum();
        let remaining = config.initial_stock - consumed;
        let days_remaining = if rate_7d > 0.0 {
            finite_or_zero(remaining / rate_7d)
        } else {
            0.0
        };

        StockForecast {
            initial_stock: config.initial_stock,
            reference_date: config.stock_reference_date,
            consumed,
            remaining,
            rate_7d,
            days_remaining,
        }
    }
}

fn daily_point(row: &ProductionRow, moving_avg_7d: f64) -> DailyPoint {
    DailyPoint {
        date: row.date,
        line_totals: [row.line_total(Line::Pm01), row.line_total(Line::Pm04)],
        product_totals: [
            row.product_total(Product::Lump),
            row.product_total(Product::Hematite),
            row.product_total(Product::SinterFeed),
        ],
        daily_total: row.daily_total(),
        moving_avg_7d,
    }
}

fn entity_stats(
    entity: Entity,
    productive: &[&ProductionRow],
    rate_7d: f64,
    stock: &StockForecast,
    config: &ProductionConfig,
) -> EntityStats {
    let series: Vec<f64> = productive.iter().map(|r| r.entity_total(entity)).collect();
    let total: f64 = series.iter().sum();
    // A line counts its own running days; combined counts every productive day
    let productive_days = match entity {
        Entity::Combined => series.len(),
        Entity::Line(_) => series.iter().filter(|v| **v > 0.0).count(),
    };

    let daily_target = config.daily_target(entity);
    let target = daily_target * productive_days as f64;
    let attainment = attainment_pct(total, daily_target, productive_days);

    let projected_additional = if rate_7d > 0.0 && stock.days_remaining > 0.0 {
        rate_7d * stock.days_remaining
    } else {
        0.0
    };
    let projected_total = total + projected_additional;

    EntityStats {
        entity,
        total,
        target,
        productive_days,
        mean_daily: safe_div(total, productive_days as f64),
        last_day_output: series.last().copied().unwrap_or(0.0),
        rate_7d,
        trend_pct: week_over_week_pct(&series, config.trend_window),
        attainment_pct: attainment,
        projected_additional,
        projected_total,
        projected_attainment_pct: pct(projected_total, target),
    }
}

fn product_mix(line: Line, productive: &[&ProductionRow]) -> ProductMix {
    let sum = |product: Product| -> f64 {
        productive
            .iter()
            .map(|r| r.tonnage[line.index()][product.index()])
            .sum()
    };
    ProductMix {
        line,
        lump: sum(Product::Lump),
        hematite: sum(Product::Hematite),
        sinter_feed: sum(Product::SinterFeed),
    }
}
