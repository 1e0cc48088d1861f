// ==========================================
// Tupacery Reports - Configuration Layer
// ==========================================
// Fixed report constants with JSON overrides.
// Aggregators take the resolved config by reference.
// ==========================================

pub mod config_manager;
pub mod report_config;

pub use config_manager::{ConfigError, ConfigManager, ConfigResult, CONFIG_ENV_VAR};
pub use report_config::{
    DieselConfig, ProductionConfig, QualityConfig, QualityTarget, ReportConfig, TargetKind,
};
