// Selector in, dashboard report out. Filter first; aggregation and alerts
// only run when the selection matched at least one row.
use crate::alerts;
use crate::config::AlertThresholds;
use crate::filter::{by_region_year, by_subregion};
use crate::summary::{compare_subregions, merge_rows, summarize};
use crate::trend::{percent_change, trend};
use crate::types::{Alert, Record, SubregionTotal, Summary, Table, TrendSeries};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    pub region: String,
    pub year: i32,
    pub subregion: String,
}

impl Selector {
    pub fn new(region: impl Into<String>, year: i32, subregion: impl Into<String>) -> Self {
        Selector {
            region: region.into(),
            year,
            subregion: subregion.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub selector: Selector,
    pub categories: Vec<String>,
    /// The matched row; duplicates for the same key are summed into it.
    pub record: Record,
    pub matched_rows: usize,
    pub summary: Summary,
    pub comparison: Vec<SubregionTotal>,
    pub trend: TrendSeries,
    pub percent_change: Option<f64>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The selection matched nothing. Not an error.
    NoData(Selector),
    Report(Box<DashboardReport>),
}

pub fn run(table: &Table, selector: &Selector, thresholds: &AlertThresholds) -> Outcome {
    let slice = by_region_year(table, &selector.region, selector.year);
    let matched = by_subregion(&slice, &selector.subregion);
    let Some(record) = merge_rows(&matched) else {
        log::debug!(
            "No rows for {} / {} / {}",
            selector.region,
            selector.year,
            selector.subregion
        );
        return Outcome::NoData(selector.clone());
    };
    if matched.len() > 1 {
        log::debug!(
            "{} rows share {} / {} / {}; summing them",
            matched.len(),
            record.region,
            record.year,
            record.subregion
        );
    }

    let summary = summarize(&record, &table.categories);
    let comparison = compare_subregions(&slice);
    let trend = trend(table, &record.region, &record.subregion);
    let percent_change = percent_change(&trend);
    let alerts = alerts::evaluate(&summary, &trend, thresholds);

    Outcome::Report(Box::new(DashboardReport {
        selector: Selector::new(record.region.clone(), record.year, record.subregion.clone()),
        categories: table.categories.clone(),
        matched_rows: matched.len(),
        record,
        summary,
        comparison,
        trend,
        percent_change,
        alerts,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlertKind;

    fn row(subregion: &str, year: i32, theft: f64, murder: f64, total: f64) -> Record {
        Record {
            region: "Delhi".to_string(),
            subregion: subregion.to_string(),
            year,
            counts: vec![Some(murder), Some(theft)],
            total: Some(total),
        }
    }

    fn table() -> Table {
        Table::new(
            "t.csv",
            vec!["MURDER".into(), "THEFT".into()],
            vec![
                row("Central", 2019, 40.0, 60.0, 100.0),
                row("Central", 2020, 50.0, 70.0, 120.0),
                row("North", 2020, 10.0, 10.0, 20.0),
            ],
        )
    }

    #[test]
    fn builds_full_report_with_display_names() {
        let t = table();
        let outcome = run(&t, &Selector::new("delhi", 2020, "CENTRAL"), &AlertThresholds::default());
        let Outcome::Report(report) = outcome else {
            panic!("expected a report");
        };
        assert_eq!(report.selector, Selector::new("Delhi", 2020, "Central"));
        assert_eq!(report.matched_rows, 1);
        assert_eq!(report.summary.total, 120.0);
        assert_eq!(report.trend.len(), 2);
        assert_eq!(report.comparison[0].subregion, "Central");
        assert_eq!(report.alerts[0].kind, AlertKind::Rising);
        assert!((report.percent_change.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn missing_combination_is_no_data() {
        let t = table();
        let sel = Selector::new("Delhi", 2019, "North");
        assert_eq!(run(&t, &sel, &AlertThresholds::default()), Outcome::NoData(sel));
    }
}
