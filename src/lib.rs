// ==========================================
// Tupacery Reports - Core Library
// ==========================================
// Spreadsheet exports in, tidy tables and KPI snapshots out.
// Reports: production, quality, diesel consumption.
// ==========================================

// ==========================================
// Modules
// ==========================================

// Domain layer - tidy tables and snapshots
pub mod domain;

// Import layer - workbook bytes to tidy tables
pub mod importer;

// Engine layer - KPI aggregation
pub mod engine;

// Config layer - targets, layout constants
pub mod config;

// I/O layer - fingerprint cache
pub mod source;

// API layer - file in, snapshot out
pub mod api;

// Logging
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

pub use domain::{
    DateRange, DieselSnapshot, DieselTable, Line, Product, ProductionSnapshot, ProductionTable,
    QualityLine, QualitySnapshot, QualityTables, Sector,
};

pub use engine::{DieselAggregator, ProductionAggregator, QualityAggregator};

pub use importer::{DieselImporter, ProductionImporter, QualityImporter, ReportImporter};

pub use config::{ConfigManager, ReportConfig};

pub use api::{ApiError, ReportApi, ReportKind};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Tupacery Reports";
