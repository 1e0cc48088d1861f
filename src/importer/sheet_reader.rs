// ==========================================
// Tupacery Reports - Sheet Reader
// ==========================================
// Turns workbook bytes into a plain cell grid (RawSheet).
// Supports: Excel (.xlsx) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::io::Cursor;

// ==========================================
// Cell - one raw cell value
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl Cell {
    /// Blank text counts as empty
    pub fn from_text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Header label form; None for empty cells
    pub fn as_label(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Bool(b) => Some(b.to_string()),
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Numeric coercion; None when the cell is not numeric
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(*n),
            Cell::Text(s) => parse_number(s),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Date coercion; None when the cell is not a date
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Number(n) => excel_serial_to_date(*n),
            Cell::Text(s) => parse_date(s),
            _ => None,
        }
    }
}

/// Whole numbers print without a trailing ".0"
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Plain decimal, or comma decimal when no dot is present ("65,3")
pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = trimmed.parse::<f64>().ok().or_else(|| {
        if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
            trimmed.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    });
    parsed.filter(|n| n.is_finite())
}

/// ISO date, ISO datetime, or day-first Brazilian date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y%m%d"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S"))
                .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%d/%m/%Y %H:%M:%S"))
                .map(|dt| dt.date())
                .ok()
        })
}

/// Excel serial day (1900 system) to date
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    // 2958465 = 9999-12-31
    if !serial.is_finite() || !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

// ==========================================
// RawSheet - rectangular cell grid
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    /// Every row has `width()` cells
    pub cells: Vec<Vec<Cell>>,
}

impl RawSheet {
    /// Builds a sheet, padding short rows with empty cells
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let cells = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Cell::Empty);
                row
            })
            .collect();
        Self {
            name: name.into(),
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.cells.first().map(|r| r.len()).unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&Cell::Empty)
    }

    /// Copy of columns `start..=end`
    pub fn columns(&self, start: usize, end: usize) -> ImportResult<RawSheet> {
        let width = self.width();
        if start > end || end >= width {
            return Err(ImportError::BlockOutOfRange { start, end, width });
        }
        let cells = self
            .cells
            .iter()
            .map(|row| row[start..=end].to_vec())
            .collect();
        Ok(RawSheet {
            name: format!("{}[{}..={}]", self.name, start, end),
            cells,
        })
    }
}

// ==========================================
// SheetReader trait
// ==========================================
pub trait SheetReader: Send + Sync {
    /// Reads one sheet; `sheet` None means the first sheet
    fn read_sheet(&self, bytes: &[u8], sheet: Option<&str>) -> ImportResult<RawSheet>;
}

// ==========================================
// ExcelReader
// ==========================================
pub struct ExcelReader;

impl SheetReader for ExcelReader {
    fn read_sheet(&self, bytes: &[u8], sheet: Option<&str>) -> ImportResult<RawSheet> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet {
            Some(name) => {
                if !sheet_names.iter().any(|s| s == name) {
                    return Err(ImportError::SheetNotFound(name.to_string()));
                }
                name.to_string()
            }
            None => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::ExcelParseError("workbook has no sheets".to_string()))?,
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        // calamine ranges start at the first used cell; re-anchor at A1
        let (row_offset, col_offset) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
        for data_row in range.rows() {
            let mut row = vec![Cell::Empty; col_offset];
            row.extend(data_row.iter().map(convert_cell));
            rows.push(row);
        }

        Ok(RawSheet::from_rows(sheet_name, rows))
    }
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(Cell::Date)
            .unwrap_or(Cell::Empty),
        Data::DateTimeIso(s) => parse_date(s).map(Cell::Date).unwrap_or(Cell::Empty),
        Data::DurationIso(s) => Cell::from_text(s),
        Data::Error(_) => Cell::Empty,
    }
}

// ==========================================
// CsvReader
// ==========================================
pub struct CsvReader;

impl SheetReader for CsvReader {
    fn read_sheet(&self, bytes: &[u8], _sheet: Option<&str>) -> ImportResult<RawSheet> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(Cell::from_text).collect());
        }

        Ok(RawSheet::from_rows("csv", rows))
    }
}

// ==========================================
// Picks the reader from a file extension
// ==========================================
pub fn reader_for_extension(ext: &str) -> ImportResult<Box<dyn SheetReader>> {
    match ext.to_lowercase().as_str() {
        "xlsx" | "xlsm" => Ok(Box::new(ExcelReader)),
        "csv" => Ok(Box::new(CsvReader)),
        other => Err(ImportError::UnsupportedFormat(other.to_string())),
    }
}
