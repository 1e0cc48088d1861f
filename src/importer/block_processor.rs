// ==========================================
// Tupacery Reports - Block Processor
// ==========================================
// One sub-table -> typed rows:
// flatten -> map -> dedupe -> date column -> coerce -> derive
// ==========================================
// Two coercion paths:
// - Production: bad numbers become 0, undated rows are dropped
// - Quality: bad numbers stay missing, undated rows keep their slot
// ==========================================

use crate::domain::quality::fields;
use crate::importer::column_mapper::ColumnMapper;
use crate::importer::error::ImportResult;
use crate::importer::header_flattener::{flatten, read_header_paths, FlattenStrategy};
use crate::importer::sheet_reader::RawSheet;
use crate::importer::text_normalizer::normalize_text;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{debug, warn};

/// How unusable cells are absorbed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionPath {
    /// Missing figures mean "nothing produced"
    Production,
    /// Missing figures mean "not measured"
    Quality,
}

/// Header after mapping, deduplication and date detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHeader {
    /// One name per block column, the date column included
    pub names: Vec<String>,
    pub date_index: usize,
    /// false when the first column was taken as the date by default
    pub date_detected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedRow {
    pub date: Option<NaiveDate>,
    /// Aligned with `ProcessedBlock::columns`
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedBlock {
    /// Non-date columns, derived columns last
    pub columns: Vec<String>,
    pub rows: Vec<ProcessedRow>,
}

impl ProcessedBlock {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

// ==========================================
// BlockProcessor
// ==========================================
pub struct BlockProcessor<'a> {
    mapper: &'a ColumnMapper,
    strategy: FlattenStrategy,
    header_depth: usize,
    date_field: &'a str,
    path: CoercionPath,
}

impl<'a> BlockProcessor<'a> {
    pub fn new(
        mapper: &'a ColumnMapper,
        strategy: FlattenStrategy,
        header_depth: usize,
        date_field: &'a str,
        path: CoercionPath,
    ) -> Self {
        Self {
            mapper,
            strategy,
            header_depth,
            date_field,
            path,
        }
    }

    /// Quality block: innermost labels, missing stays missing
    pub fn quality(header_depth: usize) -> BlockProcessor<'static> {
        BlockProcessor::new(
            ColumnMapper::quality(),
            FlattenStrategy::Innermost,
            header_depth,
            fields::DATE,
            CoercionPath::Quality,
        )
    }

    /// Production sheet: joined labels, missing becomes zero
    pub fn production(header_depth: usize) -> BlockProcessor<'static> {
        BlockProcessor::new(
            ColumnMapper::production(),
            FlattenStrategy::JoinLevels,
            header_depth,
            "data",
            CoercionPath::Production,
        )
    }

    /// Steps 1-4: flatten, map, dedupe, locate and rename the date column
    pub fn resolve_header(&self, block: &RawSheet) -> ImportResult<ResolvedHeader> {
        let paths = read_header_paths(block, self.header_depth)?;
        let labels = flatten(&paths, self.strategy);

        let mapped: Vec<String> = labels.iter().map(|l| self.mapper.map_label(l)).collect();
        let mut names = dedupe_names(mapped);

        let detected = names
            .iter()
            .position(|name| normalize_text(name).contains("data"));
        let date_index = detected.unwrap_or(0);
        if let Some(name) = names.get_mut(date_index) {
            *name = self.date_field.to_string();
        }

        debug!(
            sheet = %block.name,
            columns = names.len(),
            date_index,
            date_detected = detected.is_some(),
            "header resolved"
        );

        Ok(ResolvedHeader {
            names,
            date_index,
            date_detected: detected.is_some(),
        })
    }

    /// Runs the full pipeline over `block`
    ///
    /// # Arguments
    /// - block: header rows followed by data rows
    /// - max_rows: cap on data rows read after the header
    pub fn process(&self, block: &RawSheet, max_rows: Option<usize>) -> ImportResult<ProcessedBlock> {
        let header = self.resolve_header(block)?;

        let value_cols: Vec<usize> = (0..header.names.len())
            .filter(|&c| c != header.date_index)
            .collect();
        let mut columns: Vec<String> = value_cols
            .iter()
            .map(|&c| header.names[c].clone())
            .collect();

        let first = self.header_depth;
        let last = match max_rows {
            Some(n) => block.height().min(first + n),
            None => block.height(),
        };

        let mut rows = Vec::with_capacity(last.saturating_sub(first));
        let mut dropped = 0usize;
        for r in first..last {
            let date = block.cell(r, header.date_index).as_date();
            if date.is_none() && self.path == CoercionPath::Production {
                dropped += 1;
                continue;
            }
            let values = value_cols
                .iter()
                .map(|&c| {
                    let value = block.cell(r, c).as_number();
                    match self.path {
                        CoercionPath::Production => Some(value.unwrap_or(0.0)),
                        CoercionPath::Quality => value,
                    }
                })
                .collect();
            rows.push(ProcessedRow { date, values });
        }
        if dropped > 0 {
            debug!(sheet = %block.name, dropped, "rows without a date dropped");
        }

        if self.path == CoercionPath::Quality {
            derive_fines_fraction(&block.name, &mut columns, &mut rows);
        }

        Ok(ProcessedBlock { columns, rows })
    }
}

/// First occurrence keeps the bare name, then `_2`, `_3`, ...
pub fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                name
            } else {
                format!("{}_{}", name, count)
            }
        })
        .collect()
}

/// `<0_15mm` = -12mm part + -6.3mm part, only when both columns exist
fn derive_fines_fraction(sheet: &str, columns: &mut Vec<String>, rows: &mut [ProcessedRow]) {
    let first = columns.iter().position(|c| c == fields::BELOW_12MM_PART);
    let second = columns.iter().position(|c| c == fields::BELOW_6_3MM_PART);

    let (a, b) = match (first, second) {
        (Some(a), Some(b)) => (a, b),
        (None, None) => {
            debug!(sheet, "no fine-fraction columns, {} not derived", fields::BELOW_0_15MM);
            return;
        }
        _ => {
            warn!(
                sheet,
                "only one fine-fraction column present, {} not derived",
                fields::BELOW_0_15MM
            );
            return;
        }
    };

    columns.push(fields::BELOW_0_15MM.to_string());
    for row in rows.iter_mut() {
        let derived = match (row.values[a], row.values[b]) {
            (None, None) => None,
            (x, y) => Some(x.unwrap_or(0.0) + y.unwrap_or(0.0)),
        };
        row.values.push(derived);
    }
}
