//! Regional crime statistics dashboard.
//!
//! The CSV is loaded once ([`loader::load`]) and then every selector change
//! runs [`pipeline::run`]: filter by region + year + sub-region, summarize
//! the matched row, build the multi-year trend, and evaluate the alert rules.
pub mod alerts;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod summary;
pub mod trend;
pub mod types;
pub mod util;

pub use config::{AlertThresholds, ColumnConfig, Config};
pub use error::LoadError;
pub use pipeline::{DashboardReport, Outcome, Selector};
pub use types::{Alert, AlertKind, Record, Severity, Summary, Table, TrendSeries};
