// ==========================================
// Tupacery Reports - Diesel Importer
// ==========================================
// Flat refuelling export (.xlsx first sheet or .csv), one header row.
// Flow: map header -> keep Tup/Rep rows -> drop incomplete rows
//       -> group by (day, sector) -> per-sector running totals
// ==========================================

use crate::config::DieselConfig;
use crate::domain::diesel::{fields, DieselDay, DieselTable, RefuelRecord};
use crate::domain::types::Sector;
use crate::importer::block_processor::dedupe_names;
use crate::importer::column_mapper::ColumnMapper;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::report_importer::ReportImporter;
use crate::importer::sheet_reader::{RawSheet, SheetReader};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{debug, info, info_span};
use uuid::Uuid;

pub struct DieselImporter {
    config: DieselConfig,
    reader: Box<dyn SheetReader>,
}

/// Column positions of the fields the report needs
struct DieselColumns {
    date: usize,
    sector: usize,
    quantity: usize,
    unit_cost: usize,
    total_cost: usize,
}

impl DieselImporter {
    pub fn new(config: DieselConfig, reader: Box<dyn SheetReader>) -> Self {
        Self { config, reader }
    }

    fn sector_of(&self, code: &str) -> Option<Sector> {
        if code == self.config.expedition_code {
            Some(Sector::Expedition)
        } else if code == self.config.screening_code {
            Some(Sector::Screening)
        } else {
            None
        }
    }

    /// Cleaned records in sheet order
    pub fn records(&self, sheet: &RawSheet) -> ImportResult<Vec<RefuelRecord>> {
        let columns = locate_columns(sheet)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for r in 1..sheet.height() {
            let code = sheet.cell(r, columns.sector).as_label();
            let Some(sector) = code.as_deref().and_then(|c| self.sector_of(c)) else {
                continue;
            };

            let parsed = (
                sheet.cell(r, columns.date).as_date(),
                sheet.cell(r, columns.quantity).as_number(),
                sheet.cell(r, columns.unit_cost).as_number(),
                sheet.cell(r, columns.total_cost).as_number(),
            );
            match parsed {
                (Some(date), Some(litres), Some(unit_cost), Some(total_cost)) => {
                    records.push(RefuelRecord {
                        date,
                        sector,
                        litres,
                        unit_cost,
                        total_cost,
                    })
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(skipped, "incomplete refuelling rows dropped");
        }
        Ok(records)
    }
}

impl ReportImporter for DieselImporter {
    type Output = DieselTable;

    fn parse(&self, bytes: &[u8]) -> ImportResult<DieselTable> {
        let load_id = Uuid::new_v4();
        let span = info_span!("parse_diesel", load_id = %load_id);
        let _guard = span.enter();

        info!(bytes = bytes.len(), "diesel parse started");

        let sheet = self
            .reader
            .read_sheet(bytes, self.config.sheet_name.as_deref())?;
        let records = self.records(&sheet)?;
        let table = group_daily(&records);

        info!(
            records = records.len(),
            days = table.days.len(),
            "diesel parse finished"
        );
        Ok(table)
    }
}

fn locate_columns(sheet: &RawSheet) -> ImportResult<DieselColumns> {
    let mapper = ColumnMapper::diesel();
    let labels: Vec<String> = (0..sheet.width())
        .map(|c| {
            sheet
                .cell(0, c)
                .as_label()
                .map(|l| mapper.map_label(&l))
                .unwrap_or_default()
        })
        .collect();
    let names = dedupe_names(labels);

    let find = |field: &str| {
        names
            .iter()
            .position(|n| n == field)
            .ok_or_else(|| ImportError::ColumnMissing(field.to_string()))
    };

    Ok(DieselColumns {
        date: find(fields::CONSUMPTION_DATE)?,
        sector: find(fields::SECTOR)?,
        quantity: find(fields::QUANTITY)?,
        unit_cost: find(fields::UNIT_COST)?,
        total_cost: find(fields::TOTAL_COST)?,
    })
}

/// One row per (day, sector) plus per-sector running totals
pub fn group_daily(records: &[RefuelRecord]) -> DieselTable {
    let mut grouped: BTreeMap<(NaiveDate, Sector), (f64, f64)> = BTreeMap::new();
    for record in records {
        let entry = grouped.entry((record.date, record.sector)).or_insert((0.0, 0.0));
        entry.0 += record.litres;
        entry.1 += record.total_cost;
    }

    let mut running = [(0.0_f64, 0.0_f64); 2];
    let days = grouped
        .into_iter()
        .map(|((date, sector), (litres, cost))| {
            let acc = &mut running[sector.index()];
            acc.0 += litres;
            acc.1 += cost;
            DieselDay {
                date,
                sector,
                litres,
                cost,
                cumulative_litres: acc.0,
                cumulative_cost: acc.1,
            }
        })
        .collect();

    DieselTable { days }
}
