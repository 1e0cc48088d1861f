// ==========================================
// Tupacery Reports - Column Mapper
// ==========================================
// Matches a header label against an ordered rule table and
// returns the canonical field name of the first hit.
// Unmatched labels come back trimmed, unchanged.
// ==========================================

use crate::importer::mapping_rules::{RuleSpec, DIESEL_RULES, PRODUCTION_RULES, QUALITY_RULES};
use crate::importer::text_normalizer::normalize_text;
use regex::Regex;
use std::sync::OnceLock;

// ==========================================
// MappingRule - compiled RuleSpec
// ==========================================
#[derive(Debug, Clone)]
pub struct MappingRule {
    regex: Regex,
    field: String,
    not_followed_by: Option<String>,
}

impl MappingRule {
    pub fn compile(spec: &RuleSpec) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(spec.pattern)?,
            field: spec.field.to_string(),
            not_followed_by: spec.not_followed_by.map(str::to_string),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Tests normalized text against the rule
    pub fn matches(&self, normalized: &str) -> bool {
        match &self.not_followed_by {
            None => self.regex.is_match(normalized),
            // The last hit leaves the shortest tail, so it decides
            Some(excluded) => self
                .regex
                .find_iter(normalized)
                .last()
                .map(|m| !normalized[m.end()..].contains(excluded.as_str()))
                .unwrap_or(false),
        }
    }
}

// ==========================================
// ColumnMapper
// ==========================================
#[derive(Debug, Clone)]
pub struct ColumnMapper {
    rules: Vec<MappingRule>,
}

impl ColumnMapper {
    /// Compiles a rule table, keeping its order
    pub fn new(specs: &[RuleSpec]) -> Result<Self, regex::Error> {
        let rules = specs
            .iter()
            .map(MappingRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn quality() -> &'static ColumnMapper {
        static MAPPER: OnceLock<ColumnMapper> = OnceLock::new();
        MAPPER.get_or_init(|| ColumnMapper::new(QUALITY_RULES).expect("valid regex"))
    }

    pub fn production() -> &'static ColumnMapper {
        static MAPPER: OnceLock<ColumnMapper> = OnceLock::new();
        MAPPER.get_or_init(|| ColumnMapper::new(PRODUCTION_RULES).expect("valid regex"))
    }

    pub fn diesel() -> &'static ColumnMapper {
        static MAPPER: OnceLock<ColumnMapper> = OnceLock::new();
        MAPPER.get_or_init(|| ColumnMapper::new(DIESEL_RULES).expect("valid regex"))
    }

    /// Maps a raw header label to its canonical name
    ///
    /// # Returns
    /// - canonical field of the first matching rule
    /// - the trimmed label when it is purely numeric or nothing matches
    pub fn map_label(&self, raw: &str) -> String {
        let normalized = normalize_text(raw);
        if is_numeric_label(&normalized) {
            return raw.trim().to_string();
        }
        self.map_normalized(&normalized)
            .map(str::to_string)
            .unwrap_or_else(|| raw.trim().to_string())
    }

    /// First matching canonical field for already-normalized text
    pub fn map_normalized(&self, normalized: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(normalized))
            .map(|rule| rule.field())
    }
}

fn is_numeric_label(normalized: &str) -> bool {
    static NUMERIC_RE: OnceLock<Regex> = OnceLock::new();
    NUMERIC_RE
        .get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("valid regex"))
        .is_match(normalized)
}
