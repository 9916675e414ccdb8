// Run-time settings. Defaults match the district-wise IPC crime export the
// dashboard was built around.
use serde::Serialize;
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "data/crime_data.csv";
pub const DEFAULT_CHART_LIMIT: usize = 10;

/// Names of the identifier and total columns. Every other column is a
/// crime category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnConfig {
    pub region: String,
    pub subregion: String,
    pub year: String,
    pub total: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            region: "STATE/UT".to_string(),
            subregion: "DISTRICT".to_string(),
            year: "YEAR".to_string(),
            total: "TOTAL IPC CRIMES".to_string(),
        }
    }
}

/// Thresholds for the alert engine. Both comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlertThresholds {
    /// Top category share of the total above which a concentration alert fires.
    pub concentration_ratio: f64,
    /// Absolute year-over-year change, in percent, for the magnitude rules.
    pub major_change_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        AlertThresholds {
            concentration_ratio: 0.30,
            major_change_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub columns: ColumnConfig,
    pub thresholds: AlertThresholds,
    /// Rows shown in the distribution chart; the report keeps all of them.
    pub chart_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            columns: ColumnConfig::default(),
            thresholds: AlertThresholds::default(),
            chart_limit: DEFAULT_CHART_LIMIT,
        }
    }
}
