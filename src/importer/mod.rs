// ==========================================
// Tupacery Reports - Importer Layer
// ==========================================
// Workbook bytes -> tidy tables.
// Supports: Excel (.xlsx), CSV (diesel export)
// ==========================================
// Pipeline: normalize -> map -> flatten -> detect blocks -> process
// ==========================================

pub mod block_detector;
pub mod block_processor;
pub mod column_mapper;
pub mod diesel_importer;
pub mod error;
pub mod header_flattener;
pub mod mapping_rules;
pub mod production_importer;
pub mod quality_importer;
pub mod report_importer;
pub mod sheet_reader;
pub mod text_normalizer;

pub use block_detector::{BlockDetection, BlockDetector, BlockSpan, DetectionPath};
pub use block_processor::{BlockProcessor, CoercionPath, ProcessedBlock};
pub use column_mapper::ColumnMapper;
pub use diesel_importer::DieselImporter;
pub use error::{ImportError, ImportResult};
pub use header_flattener::FlattenStrategy;
pub use production_importer::ProductionImporter;
pub use quality_importer::QualityImporter;
pub use report_importer::ReportImporter;
pub use sheet_reader::{reader_for_extension, CsvReader, ExcelReader, RawSheet, SheetReader};
pub use text_normalizer::normalize_text;
