// ==========================================
// Tupacery Reports - Header Flattener
// ==========================================
// Multi-row headers -> one label per column.
// Column positions are preserved 1:1.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet_reader::RawSheet;

/// Per-column header labels, outermost level first
pub type HeaderPath = Vec<Option<String>>;

/// How a header path becomes a single label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlattenStrategy {
    /// Most specific non-empty level (quality blocks)
    Innermost,
    /// All non-empty levels joined with `_` (production sheet)
    JoinLevels,
}

/// Reads the first `depth` rows as header levels
///
/// Blank cells of every level but the innermost inherit the label on
/// their left, unless a label of that level or an outer one starts in
/// the same column (merged-cell layout).
pub fn read_header_paths(sheet: &RawSheet, depth: usize) -> ImportResult<Vec<HeaderPath>> {
    if depth == 0 || sheet.height() < depth {
        return Err(ImportError::MissingHeaderRows {
            sheet: sheet.name.clone(),
            expected: depth,
            found: sheet.height(),
        });
    }

    let width = sheet.width();
    let mut levels: Vec<Vec<Option<String>>> = (0..depth)
        .map(|row| (0..width).map(|col| sheet.cell(row, col).as_label()).collect())
        .collect();

    // true while no outer level has started a new label in that column
    let mut inherit = vec![true; width];
    for level in levels.iter_mut().take(depth - 1) {
        let mut last = level.first().cloned().flatten();
        for col in 1..width {
            if !inherit[col] {
                last = level[col].clone();
            }
            match level[col].clone() {
                None => level[col] = last.clone(),
                Some(label) => {
                    inherit[col] = false;
                    last = Some(label);
                }
            }
        }
    }

    Ok((0..width)
        .map(|col| levels.iter().map(|level| level[col].clone()).collect())
        .collect())
}

/// Flattens header paths to one label per column
pub fn flatten(paths: &[HeaderPath], strategy: FlattenStrategy) -> Vec<String> {
    paths
        .iter()
        .enumerate()
        .map(|(col, path)| flatten_one(col, path, strategy))
        .collect()
}

fn flatten_one(col: usize, path: &HeaderPath, strategy: FlattenStrategy) -> String {
    let present: Vec<&str> = path.iter().flatten().map(String::as_str).collect();

    let chosen = match strategy {
        FlattenStrategy::Innermost => path.iter().rev().flatten().next().cloned(),
        FlattenStrategy::JoinLevels if present.is_empty() => None,
        FlattenStrategy::JoinLevels => Some(present.join("_")),
    };

    chosen.unwrap_or_else(|| synthesize(col, path.len()))
}

/// Label for a column with no header text at any level
fn synthesize(col: usize, depth: usize) -> String {
    (0..depth.max(1))
        .map(|level| format!("Unnamed: {}_level_{}", col, level))
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::column_mapper::ColumnMapper;
    use crate::importer::sheet_reader::Cell;

    fn text(s: &str) -> Cell {
        Cell::from_text(s)
    }

    fn production_header() -> RawSheet {
        RawSheet::from_rows(
            "BD_Real",
            vec![
                vec![text("2025"), text("PENEIRAMENTO MSC"), Cell::Empty, Cell::Empty],
                vec![
                    Cell::Empty,
                    text("Santa Cruz - Tupacery PM 01"),
                    Cell::Empty,
                    text("Santa Cruz - Tupacery PM 04"),
                ],
                vec![text("Data"), text("Lump"), text("Hemat"), text("Lump")],
            ],
        )
    }

    #[test]
    fn test_forward_fill_respects_outer_levels() {
        let paths = read_header_paths(&production_header(), 3).unwrap();
        assert_eq!(paths[2][0].as_deref(), Some("PENEIRAMENTO MSC"));
        assert_eq!(paths[2][1].as_deref(), Some("Santa Cruz - Tupacery PM 01"));
        assert_eq!(paths[3][1].as_deref(), Some("Santa Cruz - Tupacery PM 04"));
        // First column is never filled
        assert_eq!(paths[0][1], None);
    }

    #[test]
    fn test_join_levels_feeds_production_mapping() {
        let paths = read_header_paths(&production_header(), 3).unwrap();
        let labels = flatten(&paths, FlattenStrategy::JoinLevels);
        assert_eq!(labels[0], "2025_Data");
        assert_eq!(
            labels[1],
            "PENEIRAMENTO MSC_Santa Cruz - Tupacery PM 01_Lump"
        );

        let mapped: Vec<String> = labels
            .iter()
            .map(|l| ColumnMapper::production().map_label(l))
            .collect();
        assert_eq!(mapped, vec!["data", "pm01_lump", "pm01_hematita", "pm04_lump"]);
    }

    #[test]
    fn test_two_level_tuple_maps_to_pm01_lump() {
        let path: HeaderPath = vec![
            Some("PENEIRAMENTO MSC_Santa Cruz - Tupacery PM 01".to_string()),
            Some("Lump".to_string()),
        ];
        let label = flatten(&[path], FlattenStrategy::JoinLevels).remove(0);
        assert_eq!(ColumnMapper::production().map_label(&label), "pm01_lump");
    }

    #[test]
    fn test_innermost_prefers_inner_label() {
        let paths: Vec<HeaderPath> = vec![
            vec![Some("PMT 01".to_string()), Some("Fe".to_string())],
            vec![Some("Umidade".to_string()), None],
            vec![None, None],
        ];
        let labels = flatten(&paths, FlattenStrategy::Innermost);
        assert_eq!(labels[0], "Fe");
        assert_eq!(labels[1], "Umidade");
        assert_eq!(labels[2], "Unnamed: 2_level_0_Unnamed: 2_level_1");
    }

    #[test]
    fn test_header_depth_larger_than_sheet() {
        let sheet = RawSheet::from_rows("tiny", vec![vec![text("Data")]]);
        assert!(matches!(
            read_header_paths(&sheet, 2),
            Err(ImportError::MissingHeaderRows { expected: 2, found: 1, .. })
        ));
    }
}
