// ==========================================
// Tupacery Reports - API Layer
// ==========================================
// File path in, serializable snapshot out.
// ==========================================

pub mod error;
pub mod report_api;

pub use error::{ApiError, ApiResult};
pub use report_api::{reader_for_path, QualityReport, ReportApi, ReportKind};
