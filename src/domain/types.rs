// ==========================================
// Tupacery Reports - Domain Types
// ==========================================
// Screening lines, products, sectors and date ranges shared by
// every report type.
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Production line (mobile screen)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Line {
    Pm01,
    Pm04,
}

impl Line {
    pub const ALL: [Line; 2] = [Line::Pm01, Line::Pm04];

    /// Position of the line in per-line arrays
    pub fn index(self) -> usize {
        match self {
            Line::Pm01 => 0,
            Line::Pm04 => 1,
        }
    }

    /// Prefix used by canonical production field names (`pm01_lump`)
    pub fn code(self) -> &'static str {
        match self {
            Line::Pm01 => "pm01",
            Line::Pm04 => "pm04",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Pm01 => write!(f, "PM 01"),
            Line::Pm04 => write!(f, "PM 04"),
        }
    }
}

// ==========================================
// Screened product
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Product {
    Lump,
    Hematite,
    SinterFeed,
}

impl Product {
    pub const ALL: [Product; 3] = [Product::Lump, Product::Hematite, Product::SinterFeed];

    pub fn index(self) -> usize {
        match self {
            Product::Lump => 0,
            Product::Hematite => 1,
            Product::SinterFeed => 2,
        }
    }

    /// Suffix used by canonical production field names
    pub fn code(self) -> &'static str {
        match self {
            Product::Lump => "lump",
            Product::Hematite => "hematita",
            Product::SinterFeed => "sinter",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Product::Lump => write!(f, "Lump"),
            Product::Hematite => write!(f, "Hematita"),
            Product::SinterFeed => write!(f, "Sinter Feed"),
        }
    }
}

// ==========================================
// Aggregation entity (combined or single line)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Combined,
    Line(Line),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Combined => write!(f, "Combinado"),
            Entity::Line(line) => write!(f, "{}", line),
        }
    }
}

// ==========================================
// Quality line (one data block of the quality sheet)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityLine {
    Pmt01,
    Pmt02,
}

impl QualityLine {
    /// Block order in the sheet: first block is PMT 01
    pub const ALL: [QualityLine; 2] = [QualityLine::Pmt01, QualityLine::Pmt02];
}

impl fmt::Display for QualityLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityLine::Pmt01 => write!(f, "PMT 01"),
            QualityLine::Pmt02 => write!(f, "PMT 02"),
        }
    }
}

// ==========================================
// Diesel consumption sector
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sector {
    Expedition,
    Screening,
}

impl Sector {
    pub const ALL: [Sector; 2] = [Sector::Expedition, Sector::Screening];

    pub fn index(self) -> usize {
        match self {
            Sector::Expedition => 0,
            Sector::Screening => 1,
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sector::Expedition => write!(f, "Expedição"),
            Sector::Screening => write!(f, "Peneiramento"),
        }
    }
}

// ==========================================
// Inclusive date range
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Builds a range; swapped bounds are reordered
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}
