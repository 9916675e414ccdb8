use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;

use crate::util::add_optional;

/// One observation for a (region, sub-region, year) triple.
///
/// `counts` is aligned with [`Table::categories`]; a `None` cell came from a
/// value that could not be parsed as a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub region: String,
    pub subregion: String,
    pub year: i32,
    pub counts: Vec<Option<f64>>,
    pub total: Option<f64>,
}

impl Record {
    /// Count for category `idx`, treating a missing cell as zero.
    pub fn count(&self, idx: usize) -> f64 {
        self.counts.get(idx).copied().flatten().unwrap_or(0.0)
    }

    /// Sum two rows that share a key. Missing cells stay missing only when
    /// both sides are missing.
    pub fn merged_with(&self, other: &Record) -> Record {
        let len = self.counts.len().max(other.counts.len());
        let counts = (0..len)
            .map(|i| {
                add_optional(
                    self.counts.get(i).copied().flatten(),
                    other.counts.get(i).copied().flatten(),
                )
            })
            .collect();
        Record {
            region: self.region.clone(),
            subregion: self.subregion.clone(),
            year: self.year,
            counts,
            total: add_optional(self.total, other.total),
        }
    }
}

/// The loaded dataset. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub source: PathBuf,
    pub categories: Vec<String>,
    pub records: Vec<Record>,
}

impl Table {
    pub fn new(source: impl Into<PathBuf>, categories: Vec<String>, records: Vec<Record>) -> Self {
        Table {
            source: source.into(),
            categories,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Sum of all category counts; authoritative for ranking and alerts.
    pub total: f64,
    /// The total column as reported by the source, display only.
    pub reported_total: Option<f64>,
    pub top_categories: Vec<CategoryCount>,
    pub distribution: Vec<CategoryCount>,
}

impl Summary {
    pub fn top_category(&self) -> Option<&CategoryCount> {
        self.distribution.first()
    }

    /// Share of the top category in the total; 0 when the total is 0.
    pub fn concentration_ratio(&self) -> f64 {
        match self.top_category() {
            Some(top) if self.total > 0.0 => top.count / self.total,
            _ => 0.0,
        }
    }
}

/// A sub-region's reported total within one region+year slice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubregionTotal {
    pub subregion: String,
    pub total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    /// Sum of the reported total column for the year, missing as zero.
    pub total: f64,
    pub category_totals: Vec<f64>,
    pub category_total: f64,
}

/// Year-ascending totals for one (region, sub-region).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&TrendPoint> {
        self.points.last()
    }

    /// The last two points as `(previous, latest)`.
    pub fn last_two(&self) -> Option<(&TrendPoint, &TrendPoint)> {
        match self.points.as_slice() {
            [.., prev, last] => Some((prev, last)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Rising,
    DecliningOrStable,
    Concentration,
    Recommendation,
    MajorRise,
    DeclineConfirmed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct CategoryRow {
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[tabled(rename = "Crime Type")]
    pub category: String,
    #[tabled(rename = "Cases")]
    pub cases: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct SubregionRow {
    #[tabled(rename = "Sub-region")]
    pub subregion: String,
    #[tabled(rename = "Total")]
    pub total: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct TrendRow {
    #[tabled(rename = "Year")]
    pub year: i32,
    #[tabled(rename = "Total")]
    pub total: String,
    #[tabled(rename = "Category Sum")]
    pub category_total: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct AlertRow {
    #[tabled(rename = "Severity")]
    pub severity: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// One line of the distribution CSV export.
#[derive(Debug, Serialize)]
pub struct DistributionCsvRow<'a> {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Crime Type")]
    pub category: &'a str,
    #[serde(rename = "Number of Cases")]
    pub count: f64,
}
