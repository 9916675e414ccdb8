// Progressive narrowing of the table: region + year, then sub-region.
//
// Selector options for each stage come from the output of the previous one,
// so an empty result always means a genuine gap in the data.
use crate::types::{Record, Table};
use crate::util::name_matches;
use std::collections::BTreeSet;

/// Distinct regions, sorted.
pub fn list_regions(table: &Table) -> Vec<String> {
    table
        .records
        .iter()
        .map(|r| r.region.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct years, ascending, optionally restricted to one region.
pub fn list_years(table: &Table, region: Option<&str>) -> Vec<i32> {
    table
        .records
        .iter()
        .filter(|r| region.map_or(true, |q| name_matches(&r.region, q)))
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn by_region_year<'a>(table: &'a Table, region: &str, year: i32) -> Vec<&'a Record> {
    table
        .records
        .iter()
        .filter(|r| r.year == year && name_matches(&r.region, region))
        .collect()
}

/// Distinct sub-regions of an already narrowed slice, sorted.
pub fn list_subregions(rows: &[&Record]) -> Vec<String> {
    rows.iter()
        .map(|r| r.subregion.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn by_subregion<'a>(rows: &[&'a Record], subregion: &str) -> Vec<&'a Record> {
    rows.iter()
        .copied()
        .filter(|r| name_matches(&r.subregion, subregion))
        .collect()
}

/// Every row for one (region, sub-region) across all years.
pub fn by_region_subregion<'a>(table: &'a Table, region: &str, subregion: &str) -> Vec<&'a Record> {
    table
        .records
        .iter()
        .filter(|r| name_matches(&r.region, region) && name_matches(&r.subregion, subregion))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(region: &str, subregion: &str, year: i32) -> Record {
        Record {
            region: region.to_string(),
            subregion: subregion.to_string(),
            year,
            counts: vec![Some(1.0)],
            total: Some(1.0),
        }
    }

    fn table() -> Table {
        Table::new(
            "test.csv",
            vec!["Theft".to_string()],
            vec![
                row("Delhi", "North", 2020),
                row("Delhi", "Central", 2020),
                row("Delhi", "Central", 2020),
                row("Delhi", "Central", 2019),
                row("Goa", "North Goa", 2020),
                row("Goa", "South Goa", 2018),
            ],
        )
    }

    #[test]
    fn lists_sorted_regions_and_years() {
        let t = table();
        assert_eq!(list_regions(&t), vec!["Delhi", "Goa"]);
        assert_eq!(list_years(&t, None), vec![2018, 2019, 2020]);
        assert_eq!(list_years(&t, Some("delhi")), vec![2019, 2020]);
    }

    #[test]
    fn narrows_by_region_and_year() {
        let t = table();
        let rows = by_region_year(&t, "DELHI", 2020);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.region == "Delhi" && r.year == 2020));
    }

    #[test]
    fn subregions_are_sorted_and_distinct() {
        let t = table();
        let rows = by_region_year(&t, "Delhi", 2020);
        assert_eq!(list_subregions(&rows), vec!["Central", "North"]);
    }

    #[test]
    fn narrows_by_subregion_case_insensitively() {
        let t = table();
        let rows = by_region_year(&t, "Delhi", 2020);
        assert_eq!(by_subregion(&rows, "central").len(), 2);
        assert!(by_subregion(&rows, "South").is_empty());
    }

    #[test]
    fn region_subregion_spans_all_years() {
        let t = table();
        let rows = by_region_subregion(&t, "delhi", "CENTRAL");
        let years: Vec<i32> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2020, 2020, 2019]);
    }

    #[test]
    fn unknown_region_yields_nothing() {
        let t = table();
        assert!(by_region_year(&t, "Kerala", 2020).is_empty());
    }
}
