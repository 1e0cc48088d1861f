// ==========================================
// Tupacery Reports - Report Importer Trait
// ==========================================
// Parse boundary of every report type: bytes in, tidy table out.
// Implementors: ProductionImporter, QualityImporter, DieselImporter
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;

pub trait ReportImporter: Send + Sync {
    type Output;

    /// Parses plaintext workbook bytes
    ///
    /// # Returns
    /// - Ok: tidy table(s); identical bytes give an identical result
    /// - Err: structural failure (sheet, header, date column, blocks)
    fn parse(&self, bytes: &[u8]) -> ImportResult<Self::Output>;

    /// Reads a local file and parses it
    fn parse_file(&self, path: &Path) -> ImportResult<Self::Output> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        self.parse(&bytes)
    }
}
