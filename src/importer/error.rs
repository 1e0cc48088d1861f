// ==========================================
// Tupacery Reports - Importer Error Types
// ==========================================
// Structural failures only. Per-cell coercion problems are
// absorbed as zero / missing and never reach this enum.
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    // ===== Workbook =====
    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("unsupported file format: {0} (only .xlsx / .csv)")]
    UnsupportedFormat(String),

    #[error("file read failed: {0}")]
    FileReadError(String),

    #[error("Excel parse failed: {0}")]
    ExcelParseError(String),

    #[error("CSV parse failed: {0}")]
    CsvParseError(String),

    // ===== Layout =====
    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("sheet '{sheet}' has {found} rows, header needs {expected}")]
    MissingHeaderRows {
        sheet: String,
        expected: usize,
        found: usize,
    },

    #[error("no date column found in {0}")]
    DateColumnNotFound(String),

    #[error("block {start}..={end} lies outside the sheet ({width} columns)")]
    BlockOutOfRange {
        start: usize,
        end: usize,
        width: usize,
    },

    #[error("expected {expected} data blocks, found {found}")]
    NotEnoughBlocks { expected: usize, found: usize },

    #[error("required column missing: {0}")]
    ColumnMissing(String),

    // ===== Cache =====
    #[error("source cache lock poisoned: {0}")]
    LockError(String),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
