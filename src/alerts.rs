//! Rule-based alerts and recommendations.
//!
//! [`evaluate`] runs every rule in [`RULES`] in order and keeps each alert
//! produced. The recommendation rule itself walks [`RECOMMENDATIONS`] and
//! stops at the first keyword hit.

use crate::config::AlertThresholds;
use crate::trend::percent_change;
use crate::types::{Alert, AlertKind, Severity, Summary, TrendSeries};

/// Inputs every rule can look at.
pub struct AlertContext<'a> {
    pub summary: &'a Summary,
    pub trend: &'a TrendSeries,
    pub percent_change: Option<f64>,
    pub thresholds: &'a AlertThresholds,
}

pub type Rule = fn(&AlertContext<'_>) -> Option<Alert>;

/// Evaluated top to bottom; all matches are emitted.
pub const RULES: &[Rule] = &[direction, concentration, recommendation, magnitude];

/// A keyword recommendation. Matches when the upper-cased top category name
/// contains any of `keywords`.
pub struct Recommendation {
    pub keywords: &'static [&'static str],
    pub message: &'static str,
}

/// First match wins.
pub const RECOMMENDATIONS: &[Recommendation] = &[
    Recommendation {
        keywords: &["BURGLARY"],
        message: "Burglary Prevention: Increase night patrolling and install CCTV in residential areas.",
    },
    Recommendation {
        keywords: &["THEFT"],
        message: "Theft Control: Deploy teams in market areas and near transport hubs during peak hours.",
    },
    Recommendation {
        keywords: &["RIOT"],
        message: "Riot Control: Strengthen intelligence network and promote community peace programs.",
    },
    Recommendation {
        keywords: &["ASSAULT", "HOMICIDE"],
        message: "Violent Crime Prevention: Increase police visibility and install panic alert systems.",
    },
];

pub const FALLBACK_RECOMMENDATION: &str =
    "Maintain regular patrolling and awareness campaigns to prevent petty crimes.";

pub fn evaluate(summary: &Summary, trend: &TrendSeries, thresholds: &AlertThresholds) -> Vec<Alert> {
    let ctx = AlertContext {
        summary,
        trend,
        percent_change: percent_change(trend),
        thresholds,
    };
    RULES.iter().filter_map(|rule| rule(&ctx)).collect()
}

/// Pick the recommendation text for a category name.
pub fn recommend(category: &str) -> &'static str {
    let upper = category.to_uppercase();
    RECOMMENDATIONS
        .iter()
        .find(|rec| rec.keywords.iter().any(|k| upper.contains(k)))
        .map_or(FALLBACK_RECOMMENDATION, |rec| rec.message)
}

fn direction(ctx: &AlertContext<'_>) -> Option<Alert> {
    let (prev, last) = ctx.trend.last_two()?;
    let alert = if last.total > prev.total {
        Alert {
            kind: AlertKind::Rising,
            severity: Severity::High,
            message: "ALERT: Total IPC crimes have risen this year. Increase police surveillance."
                .to_string(),
        }
    } else {
        Alert {
            kind: AlertKind::DecliningOrStable,
            severity: Severity::Info,
            message: "Crimes have not risen compared to last year. Maintain effective patrolling."
                .to_string(),
        }
    };
    Some(alert)
}

fn concentration(ctx: &AlertContext<'_>) -> Option<Alert> {
    let top = ctx.summary.top_category()?;
    let threshold = ctx.thresholds.concentration_ratio;
    if ctx.summary.total <= 0.0 || ctx.summary.concentration_ratio() <= threshold {
        return None;
    }
    Some(Alert {
        kind: AlertKind::Concentration,
        severity: Severity::Medium,
        message: format!(
            "High Concentration: {} forms more than {:.0}% of all crimes!",
            top.category,
            threshold * 100.0
        ),
    })
}

fn recommendation(ctx: &AlertContext<'_>) -> Option<Alert> {
    let top = ctx.summary.top_category()?;
    Some(Alert {
        kind: AlertKind::Recommendation,
        severity: Severity::Info,
        message: recommend(&top.category).to_string(),
    })
}

fn magnitude(ctx: &AlertContext<'_>) -> Option<Alert> {
    let change = ctx.percent_change?;
    let limit = ctx.thresholds.major_change_pct;
    if change > limit {
        Some(Alert {
            kind: AlertKind::MajorRise,
            severity: Severity::Medium,
            message: "Major rise detected. Recommend immediate review of patrolling routes."
                .to_string(),
        })
    } else if change < -limit {
        Some(Alert {
            kind: AlertKind::DeclineConfirmed,
            severity: Severity::Info,
            message: "Crime decline trend detected. Continue current preventive strategies."
                .to_string(),
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CategoryCount, TrendPoint};

    fn summary(counts: &[(&str, f64)]) -> Summary {
        let distribution: Vec<CategoryCount> = counts
            .iter()
            .map(|(c, n)| CategoryCount {
                category: c.to_string(),
                count: *n,
            })
            .collect();
        Summary {
            total: distribution.iter().map(|c| c.count).sum(),
            reported_total: None,
            top_categories: distribution.iter().take(3).cloned().collect(),
            distribution,
        }
    }

    fn series(totals: &[(i32, f64)]) -> TrendSeries {
        TrendSeries {
            points: totals
                .iter()
                .map(|&(year, total)| TrendPoint {
                    year,
                    total,
                    category_totals: vec![],
                    category_total: 0.0,
                })
                .collect(),
        }
    }

    fn kinds(alerts: &[Alert]) -> Vec<AlertKind> {
        alerts.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn rising_trend_emits_all_rules_in_order() {
        let s = summary(&[("THEFT", 50.0), ("MURDER", 40.0), ("RIOTS", 30.0)]);
        let alerts = evaluate(&s, &series(&[(2019, 100.0), (2020, 120.0)]), &AlertThresholds::default());
        assert_eq!(
            kinds(&alerts),
            vec![
                AlertKind::Rising,
                AlertKind::Concentration,
                AlertKind::Recommendation,
                AlertKind::MajorRise
            ]
        );
        assert_eq!(alerts[0].severity, Severity::High);
        assert!(alerts[1].message.contains("THEFT"));
        assert!(alerts[2].message.starts_with("Theft Control"));
    }

    #[test]
    fn flat_trend_is_declining_or_stable_without_magnitude() {
        let s = summary(&[("MURDER", 10.0), ("RAPE", 10.0), ("DOWRY DEATHS", 10.0), ("CHEATING", 10.0)]);
        let alerts = evaluate(&s, &series(&[(2019, 100.0), (2020, 100.0)]), &AlertThresholds::default());
        assert_eq!(
            kinds(&alerts),
            vec![AlertKind::DecliningOrStable, AlertKind::Recommendation]
        );
        assert_eq!(alerts[1].message, FALLBACK_RECOMMENDATION);
    }

    #[test]
    fn sharp_decline_is_confirmed() {
        let s = summary(&[("MURDER", 1.0), ("THEFT", 1.0), ("RIOTS", 1.0), ("X", 1.0)]);
        let alerts = evaluate(&s, &series(&[(2019, 100.0), (2020, 80.0)]), &AlertThresholds::default());
        assert_eq!(alerts.last().unwrap().kind, AlertKind::DeclineConfirmed);
    }

    #[test]
    fn single_point_history_skips_trend_rules() {
        let s = summary(&[("BURGLARY", 80.0), ("THEFT", 20.0)]);
        let alerts = evaluate(&s, &series(&[(2020, 100.0)]), &AlertThresholds::default());
        assert_eq!(
            kinds(&alerts),
            vec![AlertKind::Concentration, AlertKind::Recommendation]
        );
    }

    #[test]
    fn zero_previous_total_skips_magnitude_only() {
        let s = summary(&[("A", 1.0), ("B", 1.0), ("C", 1.0), ("D", 1.0)]);
        let alerts = evaluate(&s, &series(&[(2019, 0.0), (2020, 50.0)]), &AlertThresholds::default());
        assert_eq!(kinds(&alerts), vec![AlertKind::Rising, AlertKind::Recommendation]);
    }

    #[test]
    fn zero_total_skips_concentration() {
        let s = summary(&[("THEFT", 0.0), ("MURDER", 0.0)]);
        let alerts = evaluate(&s, &TrendSeries::default(), &AlertThresholds::default());
        assert_eq!(kinds(&alerts), vec![AlertKind::Recommendation]);
    }

    #[test]
    fn concentration_threshold_is_strict() {
        let s = summary(&[("A", 30.0), ("B", 35.0), ("C", 35.0)]);
        // Top entry here is "A" because the distribution is taken as given.
        let alerts = evaluate(&s, &TrendSeries::default(), &AlertThresholds::default());
        assert!(!kinds(&alerts).contains(&AlertKind::Concentration));
    }

    #[test]
    fn recommendations_follow_precedence() {
        assert!(recommend("Burglary").starts_with("Burglary"));
        assert!(recommend("AUTO THEFT").starts_with("Theft"));
        assert!(recommend("RIOTS").starts_with("Riot"));
        assert!(recommend("ASSAULT ON WOMEN").starts_with("Violent"));
        assert!(recommend("culpable homicide").starts_with("Violent"));
        assert_eq!(recommend("CHEATING"), FALLBACK_RECOMMENDATION);
        // BURGLARY outranks THEFT when both appear.
        assert!(recommend("BURGLARY AND THEFT").starts_with("Burglary"));
    }
}
