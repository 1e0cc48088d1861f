// ==========================================
// Tupacery Reports - API Error Types
// ==========================================
// One error surface for callers: structural import failures,
// empty selections and configuration problems stay distinct so
// a caller can tell "fix the file" from "widen the filter".
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::{AggregateError, NoDataReason};
use crate::importer::error::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The file could not be turned into a tidy table
    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    /// The selection holds nothing to aggregate
    #[error("no data: {0}")]
    NoData(NoDataReason),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AggregateError> for ApiError {
    fn from(err: AggregateError) -> Self {
        ApiError::NoData(err.reason())
    }
}

impl ApiError {
    pub fn is_no_data(&self) -> bool {
        matches!(self, ApiError::NoData(_))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_error_becomes_no_data() {
        let err: ApiError = AggregateError::NoData(NoDataReason::EmptyTable).into();
        assert!(err.is_no_data());
        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn test_import_error_is_structural() {
        let err: ApiError = ImportError::ColumnMissing("Setor".to_string()).into();
        assert!(!err.is_no_data());
        assert!(err.to_string().contains("Setor"));
    }
}
