// Console rendering and file exports for a dashboard report.
use crate::pipeline::{DashboardReport, Selector};
use crate::types::{
    AlertRow, CategoryCount, CategoryRow, DistributionCsvRow, FieldRow, SubregionRow, TrendRow,
};
use crate::util::{format_count, format_number};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

#[derive(Serialize)]
struct ReportExport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    report: &'a DashboardReport,
}

/// Export the whole report as JSON, stamped with the generation time.
pub fn write_report_json(path: &Path, report: &DashboardReport) -> Result<(), Box<dyn Error>> {
    write_json(
        path,
        &ReportExport {
            generated_at: Utc::now(),
            report,
        },
    )
}

/// Export the full ranked category distribution as CSV.
pub fn write_distribution_csv(path: &Path, report: &DashboardReport) -> Result<(), Box<dyn Error>> {
    let rows: Vec<DistributionCsvRow<'_>> = report
        .summary
        .distribution
        .iter()
        .enumerate()
        .map(|(idx, c)| DistributionCsvRow {
            rank: idx + 1,
            category: &c.category,
            count: c.count,
        })
        .collect();
    write_csv(path, &rows)
}

pub fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(rows).with(Style::markdown()).to_string()
}

pub fn print_no_data(selector: &Selector) {
    println!(
        "No data found for selected filters ({}, {}, {}).\n",
        selector.subregion, selector.region, selector.year
    );
}

/// Describe the latest year-over-year change, if there is one.
pub fn change_message(change: Option<f64>) -> Option<String> {
    let change = change?;
    Some(if change > 0.0 {
        format!(
            "Crimes have increased by {}% compared to last year.",
            format_number(change, 2)
        )
    } else {
        format!(
            "Crimes have decreased by {}% compared to last year.",
            format_number(change.abs(), 2)
        )
    })
}

pub fn print_report(report: &DashboardReport, chart_limit: usize) {
    let sel = &report.selector;

    println!("== Overview ==\n");
    println!(
        "Summary for {}, {} ({})\n",
        sel.subregion, sel.region, sel.year
    );
    println!("Total IPC Crimes: {}\n", format_count(report.summary.total));
    println!("Top {} Crime Categories:", report.summary.top_categories.len());
    println!("{}\n", render_table(category_rows(&report.summary.top_categories, usize::MAX)));

    println!(
        "Crime Category Distribution (top {} in {}, {})",
        chart_limit, sel.subregion, sel.year
    );
    println!("{}\n", render_table(category_rows(&report.summary.distribution, chart_limit)));

    println!(
        "Sub-region Comparison: totals in {} ({})",
        sel.region, sel.year
    );
    let comparison: Vec<SubregionRow> = report
        .comparison
        .iter()
        .map(|s| SubregionRow {
            subregion: s.subregion.clone(),
            total: s.total.map_or_else(|| "-".to_string(), format_count),
        })
        .collect();
    println!("{}\n", render_table(comparison));

    println!("== Trend Analysis ==\n");
    println!("Yearly Crime Trend for {}", sel.subregion);
    let trend: Vec<TrendRow> = report
        .trend
        .points
        .iter()
        .map(|p| TrendRow {
            year: p.year,
            total: format_count(p.total),
            category_total: format_count(p.category_total),
        })
        .collect();
    println!("{}\n", render_table(trend));
    if let Some(msg) = change_message(report.percent_change) {
        println!("{}\n", msg);
    }

    println!("== Alerts & Recommendations ==\n");
    let alerts: Vec<AlertRow> = report
        .alerts
        .iter()
        .map(|a| AlertRow {
            severity: a.severity.as_str().to_uppercase(),
            message: a.message.clone(),
        })
        .collect();
    println!("{}\n", render_table(alerts));

    println!("== Record ==\n");
    if report.matched_rows > 1 {
        println!("({} rows summed)", report.matched_rows);
    }
    println!("{}\n", render_table(record_rows(report)));
}

fn category_rows(series: &[CategoryCount], limit: usize) -> Vec<CategoryRow> {
    series
        .iter()
        .take(limit)
        .enumerate()
        .map(|(idx, c)| CategoryRow {
            rank: idx + 1,
            category: c.category.clone(),
            cases: format_count(c.count),
        })
        .collect()
}

fn record_rows(report: &DashboardReport) -> Vec<FieldRow> {
    let r = &report.record;
    let cell = |v: Option<f64>| v.map_or_else(|| "NA".to_string(), format_count);
    let mut rows = vec![
        FieldRow {
            field: "Region".to_string(),
            value: r.region.clone(),
        },
        FieldRow {
            field: "Sub-region".to_string(),
            value: r.subregion.clone(),
        },
        FieldRow {
            field: "Year".to_string(),
            value: r.year.to_string(),
        },
    ];
    rows.extend(
        report
            .categories
            .iter()
            .zip(&r.counts)
            .map(|(name, v)| FieldRow {
                field: name.clone(),
                value: cell(*v),
            }),
    );
    rows.push(FieldRow {
        field: "Reported Total".to_string(),
        value: cell(r.total),
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_change_direction() {
        assert_eq!(
            change_message(Some(20.0)).unwrap(),
            "Crimes have increased by 20.00% compared to last year."
        );
        assert_eq!(
            change_message(Some(-12.5)).unwrap(),
            "Crimes have decreased by 12.50% compared to last year."
        );
        assert!(change_message(None).is_none());
    }

    #[test]
    fn renders_empty_tables_as_placeholder() {
        assert_eq!(render_table(Vec::<FieldRow>::new()), "(no rows)");
    }

    #[test]
    fn renders_markdown_rows() {
        let out = render_table(vec![FieldRow {
            field: "Year".to_string(),
            value: "2020".to_string(),
        }]);
        assert!(out.contains("| Field"));
        assert!(out.contains("2020"));
    }
}
