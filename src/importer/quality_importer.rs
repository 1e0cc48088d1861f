// ==========================================
// Tupacery Reports - Quality Importer
// ==========================================
// Sheet RESUMO GR, two header rows, 34 data rows.
// Two side-by-side blocks: PMT 01 then PMT 02.
// Flow: read -> detect blocks -> process each block
// ==========================================

use crate::config::QualityConfig;
use crate::domain::quality::{QualityBlock, QualityRow, QualityTables};
use crate::domain::types::QualityLine;
use crate::importer::block_detector::BlockDetector;
use crate::importer::block_processor::BlockProcessor;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::header_flattener::read_header_paths;
use crate::importer::report_importer::ReportImporter;
use crate::importer::sheet_reader::{ExcelReader, SheetReader};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

pub struct QualityImporter {
    config: QualityConfig,
    reader: Box<dyn SheetReader>,
}

impl QualityImporter {
    pub fn new(config: QualityConfig, reader: Box<dyn SheetReader>) -> Self {
        Self { config, reader }
    }

    pub fn excel(config: QualityConfig) -> Self {
        Self::new(config, Box::new(ExcelReader))
    }
}

impl ReportImporter for QualityImporter {
    type Output = QualityTables;

    fn parse(&self, bytes: &[u8]) -> ImportResult<QualityTables> {
        let load_id = Uuid::new_v4();
        let span = info_span!("parse_quality", load_id = %load_id);
        let _guard = span.enter();

        info!(
            bytes = bytes.len(),
            sheet = %self.config.sheet_name,
            "quality parse started"
        );

        // === Step 1: read sheet ===
        let sheet = self
            .reader
            .read_sheet(bytes, Some(&self.config.sheet_name))?;
        debug!(rows = sheet.height(), columns = sheet.width(), "sheet read");

        // === Step 2: locate blocks from the innermost header row ===
        let paths = read_header_paths(&sheet, self.config.header_depth)?;
        let markers: Vec<Option<String>> = paths
            .iter()
            .map(|path| path.last().cloned().flatten())
            .collect();

        let expected = QualityLine::ALL.len();
        let detector = BlockDetector::with_fallback(expected, self.config.fallback_blocks.clone());
        let detection = detector.detect(&markers);
        if detection.used_fallback() {
            warn!(
                spans = ?detection.spans,
                "quality block detection failed, values may come from the wrong columns"
            );
        }
        if detection.spans.len() < expected {
            return Err(ImportError::NotEnoughBlocks {
                expected,
                found: detection.spans.len(),
            });
        }

        // === Step 3: one tidy block per line ===
        let processor = BlockProcessor::quality(self.config.header_depth);
        let mut blocks = Vec::with_capacity(expected);
        for (line, span) in QualityLine::ALL.into_iter().zip(&detection.spans) {
            let slice = sheet.columns(span.start, span.end)?;
            let processed = processor.process(&slice, Some(self.config.data_rows))?;

            let mut block = QualityBlock::new(line, processed.columns);
            block.rows = processed
                .rows
                .into_iter()
                .map(|r| QualityRow {
                    date: r.date,
                    values: r.values,
                })
                .collect();

            debug!(
                line = %line,
                start = span.start,
                end = span.end,
                rows = block.rows.len(),
                columns = ?block.columns,
                "quality block processed"
            );
            blocks.push(block);
        }

        info!(
            blocks = blocks.len(),
            fallback = detection.used_fallback(),
            "quality parse finished"
        );
        Ok(QualityTables {
            blocks,
            block_fallback: detection.used_fallback(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quality::fields;
    use crate::importer::block_detector::BlockSpan;
    use crate::importer::sheet_reader::{Cell, RawSheet};
    use chrono::NaiveDate;

    struct FixedSheet(RawSheet);

    impl SheetReader for FixedSheet {
        fn read_sheet(&self, _bytes: &[u8], _sheet: Option<&str>) -> ImportResult<RawSheet> {
            Ok(self.0.clone())
        }
    }

    fn text(s: &str) -> Cell {
        Cell::from_text(s)
    }

    /// Filler column, then PMT 01 (Data, Ton, Fe), then PMT 02 (Data, Fe)
    fn two_block_sheet(date_label: &str) -> RawSheet {
        RawSheet::from_rows(
            "RESUMO GR",
            vec![
                vec![Cell::Empty, text("PMT 01"), Cell::Empty, Cell::Empty, text("PMT 02"), Cell::Empty],
                vec![text("Obs"), text(date_label), text("Ton"), text("Fe"), text(date_label), text("Fe")],
                vec![
                    Cell::Empty,
                    text("2025-09-01"),
                    Cell::Number(50.0),
                    Cell::Number(65.0),
                    text("2025-09-01"),
                    Cell::Number(64.0),
                ],
                vec![
                    Cell::Empty,
                    text("2025-09-02"),
                    Cell::Number(0.0),
                    Cell::Empty,
                    text("2025-09-02"),
                    Cell::Number(63.5),
                ],
            ],
        )
    }

    #[test]
    fn test_detected_blocks() {
        let importer = QualityImporter::new(
            QualityConfig::default(),
            Box::new(FixedSheet(two_block_sheet("Data"))),
        );
        let tables = importer.parse(b"").unwrap();
        assert!(!tables.block_fallback);

        let pmt01 = tables.block(QualityLine::Pmt01).unwrap();
        assert_eq!(pmt01.columns, vec![fields::TON, fields::FE]);
        assert_eq!(pmt01.rows.len(), 2);
        assert_eq!(pmt01.value(&pmt01.rows[0], fields::FE), Some(65.0));

        let pmt02 = tables.block(QualityLine::Pmt02).unwrap();
        assert_eq!(pmt02.columns, vec![fields::FE]);
        assert_eq!(pmt02.rows[1].date, NaiveDate::from_ymd_opt(2025, 9, 2));
    }

    #[test]
    fn test_fallback_blocks_are_flagged() {
        let mut config = QualityConfig::default();
        config.fallback_blocks = vec![BlockSpan::new(1, 3), BlockSpan::new(4, 5)];
        let importer = QualityImporter::new(config, Box::new(FixedSheet(two_block_sheet("Dia"))));

        let tables = importer.parse(b"").unwrap();
        assert!(tables.block_fallback);
        // No "data" label: the first column of each block is the date
        let pmt02 = tables.block(QualityLine::Pmt02).unwrap();
        assert_eq!(pmt02.columns, vec![fields::FE]);
        assert_eq!(pmt02.rows[0].date, NaiveDate::from_ymd_opt(2025, 9, 1));
    }

    #[test]
    fn test_fallback_outside_sheet_is_structural() {
        let importer = QualityImporter::new(
            QualityConfig::default(),
            Box::new(FixedSheet(two_block_sheet("Dia"))),
        );
        assert!(matches!(
            importer.parse(b""),
            Err(ImportError::BlockOutOfRange { .. })
        ));
    }

    #[test]
    fn test_data_rows_cap() {
        let mut config = QualityConfig::default();
        config.data_rows = 1;
        let importer = QualityImporter::new(config, Box::new(FixedSheet(two_block_sheet("Data"))));
        let tables = importer.parse(b"").unwrap();
        assert!(tables.blocks.iter().all(|b| b.rows.len() == 1));
    }
}
