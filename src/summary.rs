use crate::types::{CategoryCount, Record, SubregionTotal, Summary};
use std::cmp::Ordering;

pub const TOP_CATEGORY_COUNT: usize = 3;

/// Reshape a row's category columns into `(category, count)` pairs, in the
/// order of `categories`. Missing cells become 0.
pub fn pivot_to_series(record: &Record, categories: &[String]) -> Vec<CategoryCount> {
    categories
        .iter()
        .enumerate()
        .map(|(idx, name)| CategoryCount {
            category: name.clone(),
            count: record.count(idx),
        })
        .collect()
}

/// Sort descending by count. `sort_by` is stable, so ties keep column order.
pub fn rank(mut series: Vec<CategoryCount>) -> Vec<CategoryCount> {
    series.sort_by(|a, b| b.count.partial_cmp(&a.count).unwrap_or(Ordering::Equal));
    series
}

pub fn summarize(record: &Record, categories: &[String]) -> Summary {
    let distribution = rank(pivot_to_series(record, categories));
    let total: f64 = distribution.iter().map(|c| c.count).sum();
    let top_categories = distribution.iter().take(TOP_CATEGORY_COUNT).cloned().collect();
    Summary {
        total,
        reported_total: record.total,
        top_categories,
        distribution,
    }
}

/// Fold rows sharing a key into one record. `None` for no rows.
pub fn merge_rows(rows: &[&Record]) -> Option<Record> {
    let (first, rest) = rows.split_first()?;
    Some(rest.iter().fold((*first).clone(), |acc, r| acc.merged_with(r)))
}

/// Reported totals of every row in a region+year slice, largest first.
/// Rows without a numeric total sort last.
pub fn compare_subregions(rows: &[&Record]) -> Vec<SubregionTotal> {
    let mut out: Vec<SubregionTotal> = rows
        .iter()
        .map(|r| SubregionTotal {
            subregion: r.subregion.clone(),
            total: r.total,
        })
        .collect();
    out.sort_by(|a, b| match (a.total, b.total) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    out
}
