// ==========================================
// Tupacery Reports - Column Mapping Rule Tables
// ==========================================
// Ordered (pattern -> canonical field) tables, matched against
// normalized header text. First match wins; order is part of
// the contract.
// ==========================================

/// One mapping rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub pattern: &'static str,
    pub field: &'static str,
    /// Rejects the match when this text appears after it
    pub not_followed_by: Option<&'static str>,
}

const fn rule(pattern: &'static str, field: &'static str) -> RuleSpec {
    RuleSpec {
        pattern,
        field,
        not_followed_by: None,
    }
}

// ==========================================
// Quality sheet (RESUMO GR)
// ==========================================
pub const QUALITY_RULES: &[RuleSpec] = &[
    rule(r"\bfe\b", "Fe"),
    rule(r"sio2|si o2|silica|silicio|si02", "SiO2"),
    rule(r"al2o3|alumina|al2", "Al2O3"),
    rule(r"\bp\b", "P"),
    rule(r"\bmn\b", "Mn"),
    rule(r"ton", "Ton"),
    rule(r"loi", "LOI"),
    rule(r"\bmm\b|tamanho medio", "TMP"),
    rule(r"(\+|>) *31(\.|,)5", ">31_5mm"),
    RuleSpec {
        pattern: r"- *12",
        field: "_coluna_soma_1",
        not_followed_by: Some("umidade"),
    },
    rule(r"- *6(\.|,)3", "_coluna_soma_2"),
    rule(r"total", "TOTAL"),
    rule(r"data", "Data"),
];

// ==========================================
// Production sheet (BD_Real), joined header labels.
// Only the screening area under the Tupacery plant counts.
// ==========================================
pub const PRODUCTION_RULES: &[RuleSpec] = &[
    rule(r"peneiramento msc.*tupacery pm ?0?1(\D|$).*lump", "pm01_lump"),
    rule(r"peneiramento msc.*tupacery pm ?0?1(\D|$).*hemat", "pm01_hematita"),
    rule(r"peneiramento msc.*tupacery pm ?0?1(\D|$).*sinter", "pm01_sinter"),
    rule(r"peneiramento msc.*tupacery pm ?0?4(\D|$).*lump", "pm04_lump"),
    rule(r"peneiramento msc.*tupacery pm ?0?4(\D|$).*hemat", "pm04_hematita"),
    rule(r"peneiramento msc.*tupacery pm ?0?4(\D|$).*sinter", "pm04_sinter"),
    rule(r"data", "data"),
];

// ==========================================
// Diesel refuelling export
// ==========================================
pub const DIESEL_RULES: &[RuleSpec] = &[
    rule(r"data de inclusao", "DataInclusao"),
    rule(r"quantidade", "ConsumoDiesel"),
    rule(r"valor? unitario", "CustoUnitario"),
    rule(r"valor total", "CustoTotalAbastecimento"),
    rule(r"^area$", "Setor"),
    rule(r"^dia$", "DataConsumo"),
];
