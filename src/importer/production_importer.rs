// ==========================================
// Tupacery Reports - Production Importer
// ==========================================
// Sheet BD_Real, three header rows:
//   year / plant / "Santa Cruz - Tupacery PM 01" / Lump ...
// Flow: read -> resolve header -> zero-fill rows -> merge dates
// ==========================================

use crate::config::ProductionConfig;
use crate::domain::production::{ProductionField, ProductionRow, ProductionTable};
use crate::importer::block_processor::{BlockProcessor, ProcessedBlock};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::report_importer::ReportImporter;
use crate::importer::sheet_reader::{ExcelReader, SheetReader};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

pub struct ProductionImporter {
    config: ProductionConfig,
    reader: Box<dyn SheetReader>,
}

impl ProductionImporter {
    pub fn new(config: ProductionConfig, reader: Box<dyn SheetReader>) -> Self {
        Self { config, reader }
    }

    /// Reads .xlsx workbooks
    pub fn excel(config: ProductionConfig) -> Self {
        Self::new(config, Box::new(ExcelReader))
    }
}

impl ReportImporter for ProductionImporter {
    type Output = ProductionTable;

    fn parse(&self, bytes: &[u8]) -> ImportResult<ProductionTable> {
        let load_id = Uuid::new_v4();
        let span = info_span!("parse_production", load_id = %load_id);
        let _guard = span.enter();

        info!(
            bytes = bytes.len(),
            sheet = %self.config.sheet_name,
            "production parse started"
        );

        // === Step 1: read sheet ===
        let sheet = self
            .reader
            .read_sheet(bytes, Some(&self.config.sheet_name))?;
        debug!(rows = sheet.height(), columns = sheet.width(), "sheet read");

        // === Step 2: header + typed rows ===
        let processor = BlockProcessor::production(self.config.header_depth);
        let header = processor.resolve_header(&sheet)?;
        if !header.date_detected {
            return Err(ImportError::DateColumnNotFound(sheet.name.clone()));
        }
        let processed = processor.process(&sheet, None)?;

        // === Step 3: tidy table ===
        let table = build_table(processed);
        if table.fields_present.is_empty() {
            warn!("no line/product columns recognised, every day reads as zero");
        }

        info!(
            days = table.len(),
            fields = table.fields_present.len(),
            first = ?table.first_date(),
            last = ?table.last_date(),
            "production parse finished"
        );
        Ok(table)
    }
}

/// Keeps canonical columns only; same-date rows are summed
fn build_table(processed: ProcessedBlock) -> ProductionTable {
    let columns: Vec<(usize, ProductionField)> = processed
        .columns
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| ProductionField::from_canonical(name).map(|f| (idx, f)))
        .collect();

    let mut by_date: BTreeMap<NaiveDate, ProductionRow> = BTreeMap::new();
    let mut merged = 0usize;
    for row in processed.rows {
        let Some(date) = row.date else { continue };
        if by_date.contains_key(&date) {
            merged += 1;
        }
        let tidy = by_date
            .entry(date)
            .or_insert_with(|| ProductionRow::new(date));
        for &(idx, field) in &columns {
            tidy.add_tonnage(field, row.values[idx].unwrap_or(0.0));
        }
    }
    if merged > 0 {
        debug!(merged, "duplicate dates merged");
    }

    let mut fields_present: Vec<ProductionField> = columns.iter().map(|&(_, f)| f).collect();
    fields_present.sort();
    fields_present.dedup();

    ProductionTable {
        rows: by_date.into_values().collect(),
        fields_present,
    }
}
