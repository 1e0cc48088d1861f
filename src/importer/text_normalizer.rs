// ==========================================
// Tupacery Reports - Text Normalizer
// ==========================================
// Header labels -> comparable form: lowercase, no accents,
// no `%` / parentheses, comma decimal -> dot, single spaces.
// ==========================================

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalizes a header label. Never fails.
pub fn normalize_text(raw: &str) -> String {
    let stripped: String = raw.trim().nfd().filter(|c| !is_combining_mark(*c)).collect();

    let replaced: String = stripped
        .chars()
        .filter(|c| !matches!(c, '%' | '(' | ')'))
        .map(|c| match c {
            '\n' | '\r' => ' ',
            ',' => '.',
            other => other,
        })
        .collect();

    replaced
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_accents_and_case() {
        assert_eq!(normalize_text("Produção"), "producao");
        assert_eq!(normalize_text("Sílica"), "silica");
        assert_eq!(normalize_text("TAMANHO MÉDIO"), "tamanho medio");
    }

    #[test]
    fn test_removes_punctuation_and_collapses_spaces() {
        assert_eq!(normalize_text("  Fe (%)  "), "fe");
        assert_eq!(normalize_text("Sinter Feed\nNP"), "sinter feed np");
        assert_eq!(normalize_text("+31,5 mm"), "+31.5 mm");
        assert_eq!(normalize_text("a \r\n  b"), "a b");
    }

    #[test]
    fn test_equivalent_labels_compare_equal() {
        assert_eq!(normalize_text("SiO2 (%)"), normalize_text(" sio2 "));
        assert_eq!(normalize_text("DATA"), normalize_text("Data"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
    }
}
