use crate::filter::by_region_subregion;
use crate::types::{Record, Table, TrendPoint, TrendSeries};
use crate::util;
use std::collections::BTreeMap;

/// Year-by-year totals for one (region, sub-region) over every year in the
/// table. Duplicate rows within a year are summed.
pub fn trend(table: &Table, region: &str, subregion: &str) -> TrendSeries {
    let rows = by_region_subregion(table, region, subregion);
    series_from_rows(&rows, table.categories.len())
}

/// Group `rows` by year, ascending.
pub fn series_from_rows(rows: &[&Record], category_count: usize) -> TrendSeries {
    let mut by_year: BTreeMap<i32, TrendPoint> = BTreeMap::new();
    for r in rows {
        let point = by_year.entry(r.year).or_insert_with(|| TrendPoint {
            year: r.year,
            total: 0.0,
            category_totals: vec![0.0; category_count],
            category_total: 0.0,
        });
        point.total += r.total.unwrap_or(0.0);
        for (idx, slot) in point.category_totals.iter_mut().enumerate() {
            let count = r.count(idx);
            *slot += count;
            point.category_total += count;
        }
    }
    TrendSeries {
        points: by_year.into_values().collect(),
    }
}

/// Latest-period change in percent. `None` with fewer than two points or a
/// zero previous total.
pub fn percent_change(series: &TrendSeries) -> Option<f64> {
    let (prev, last) = series.last_two()?;
    util::percent_change(prev.total, last.total)
}
