// ==========================================
// Tupacery Reports - Engine Layer
// ==========================================
// Turns tidy tables into KPI snapshots.
// Engines are stateless: every input comes in as an argument,
// nothing reads files or the clock.
// ==========================================

pub mod diesel_aggregator;
pub mod error;
pub mod production_aggregator;
pub mod quality_aggregator;
pub mod stats;

pub use diesel_aggregator::DieselAggregator;
pub use error::{AggregateError, AggregateResult, NoDataReason};
pub use production_aggregator::{attainment_pct, ProductionAggregator};
pub use quality_aggregator::QualityAggregator;
