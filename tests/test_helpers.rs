// ==========================================
// Test Helpers
// ==========================================
// Builds real .xlsx workbooks in the layouts the importers expect.
// ==========================================

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};

/// One cell of a synthetic sheet
#[derive(Debug, Clone)]
pub enum X {
    T(String),
    N(f64),
    E,
}

pub fn t(s: &str) -> X {
    X::T(s.to_string())
}

pub fn n(v: f64) -> X {
    X::N(v)
}

/// Serializes sheets (name, rows) into workbook bytes
pub fn workbook(sheets: &[(&str, Vec<Vec<X>>)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    X::T(s) => {
                        worksheet.write_string(r as u32, c as u16, s.as_str()).unwrap();
                    }
                    X::N(v) => {
                        worksheet.write_number(r as u32, c as u16, *v).unwrap();
                    }
                    X::E => {}
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

// ==========================================
// Production (BD_Real)
// ==========================================

/// Daily tonnages for one day, in sheet column order:
/// PM 01 lump / hematita / sinter, PM 04 lump / hematita / sinter
pub struct ProductionDay {
    pub date: String,
    pub tonnages: [f64; 6],
}

/// Three header rows: area, line, product; then one row per day
pub fn production_rows(days: &[ProductionDay]) -> Vec<Vec<X>> {
    let mut rows = vec![
        vec![X::E, t("PENEIRAMENTO MSC"), X::E, X::E, X::E, X::E, X::E],
        vec![
            X::E,
            t("Santa Cruz - Tupacery PM 01"),
            X::E,
            X::E,
            t("Santa Cruz - Tupacery PM 04"),
            X::E,
            X::E,
        ],
        vec![
            t("Data"),
            t("Lump"),
            t("Hematita"),
            t("Sinter Feed"),
            t("Lump"),
            t("Hematita"),
            t("Sinter Feed"),
        ],
    ];
    for day in days {
        let mut row = vec![t(&day.date)];
        row.extend(day.tonnages.iter().map(|v| n(*v)));
        rows.push(row);
    }
    rows
}

pub fn production_workbook(days: &[ProductionDay]) -> Vec<u8> {
    workbook(&[("Capa", vec![vec![t("Relatório")]]), ("BD_Real", production_rows(days))])
}

// ==========================================
// Quality (RESUMO GR)
// ==========================================

/// Two header rows; PMT 01 block then PMT 02 block
pub fn quality_rows(date_label: &str, pmt01: &[Vec<X>], pmt02: &[Vec<X>]) -> Vec<Vec<X>> {
    let mut header_top = vec![t("PMT 01")];
    header_top.extend(std::iter::repeat(X::E).take(5));
    header_top.push(t("PMT 02"));
    header_top.extend(std::iter::repeat(X::E).take(3));

    let header = vec![
        t(date_label),
        t("Ton"),
        t("Fe (%)"),
        t("SiO2"),
        t("-12"),
        t("-6,3"),
        t(date_label),
        t("Ton"),
        t("Fe (%)"),
        t("Si O2"),
    ];

    let mut rows = vec![header_top, header];
    let height = pmt01.len().max(pmt02.len());
    for i in 0..height {
        let mut row: Vec<X> = pmt01.get(i).cloned().unwrap_or_else(|| vec![X::E; 6]);
        row.resize(6, X::E);
        let mut right: Vec<X> = pmt02.get(i).cloned().unwrap_or_else(|| vec![X::E; 4]);
        right.resize(4, X::E);
        row.extend(right);
        rows.push(row);
    }
    rows
}
