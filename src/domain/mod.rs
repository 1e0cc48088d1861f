// ==========================================
// Tupacery Reports - Domain Layer
// ==========================================
// Tidy tables produced by the importers and the snapshot
// structures produced by the engines.
// No parsing logic, no aggregation logic.
// ==========================================

pub mod diesel;
pub mod production;
pub mod quality;
pub mod types;

pub use diesel::{DieselDay, DieselSnapshot, DieselTable, PaceTrend, RefuelRecord, SectorTotals};
pub use production::{
    DailyPoint, EntityStats, ProductMix, ProductionField, ProductionRow, ProductionSnapshot,
    ProductionTable, StockForecast,
};
pub use quality::{
    IndicatorStats, IndicatorValue, LineQuality, QualityBlock, QualityObservation, QualityRow,
    QualitySnapshot, QualityTables, ReferenceMonth, SnapshotSource, TargetStatus, TrendPoint,
};
pub use types::{DateRange, Entity, Line, Product, QualityLine, Sector};
