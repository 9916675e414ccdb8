use crate::config::ColumnConfig;
use crate::error::LoadError;
use crate::types::{Record, Table};
use crate::util::{normalize_name, parse_count_safe, parse_f64_safe, parse_i32_safe};
use csv::{ReaderBuilder, StringRecord, Trim};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub skipped_rows: usize,
    pub null_totals: usize,
    pub null_cells: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    columns: ColumnConfig,
}

// Tables stay cached for the life of the process unless explicitly
// invalidated, so every recomputation shares the same read-only data.
static TABLE_CACHE: Lazy<Mutex<HashMap<CacheKey, Arc<Table>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Load `path`, reusing the cached table when the same file was already
/// loaded with the same column layout.
pub fn load(path: impl AsRef<Path>, columns: &ColumnConfig) -> Result<Arc<Table>, LoadError> {
    let key = cache_key(path.as_ref(), columns)?;
    if let Some(table) = lock_cache().get(&key) {
        log::debug!("Table cache hit for {}", key.path.display());
        return Ok(Arc::clone(table));
    }

    let (table, report) = load_and_clean(&key.path, columns)?;
    log_report(&key.path, &report);

    // Another caller may have raced us; keep whichever table landed first.
    let mut cache = lock_cache();
    let table = cache.entry(key).or_insert_with(|| Arc::new(table));
    Ok(Arc::clone(table))
}

/// Drop the cached table for `path`. Returns whether anything was evicted.
pub fn invalidate(path: impl AsRef<Path>) -> bool {
    let Ok(canonical) = std::fs::canonicalize(path.as_ref()) else {
        return false;
    };
    let mut cache = lock_cache();
    let before = cache.len();
    cache.retain(|k, _| k.path != canonical);
    before != cache.len()
}

pub fn clear_cache() {
    lock_cache().clear();
}

/// Read and clean the CSV at `path` without touching the cache.
pub fn load_and_clean(
    path: impl AsRef<Path>,
    columns: &ColumnConfig,
) -> Result<(Table, LoadReport), LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, path, columns)
}

/// Parse CSV from any reader. `source` is only recorded on the table.
pub fn read_table<R: Read>(
    reader: R,
    source: impl Into<PathBuf>,
    columns: &ColumnConfig,
) -> Result<(Table, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let layout = Layout::resolve(&headers, columns)?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();

    for result in rdr.records() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Row {}: CSV parse error: {}", report.total_rows, e);
                report.skipped_rows += 1;
                continue;
            }
        };

        let Some(year) = parse_i32_safe(row.get(layout.year)) else {
            log::warn!(
                "Row {}: invalid {}: {:?}",
                report.total_rows,
                columns.year,
                row.get(layout.year)
            );
            report.skipped_rows += 1;
            continue;
        };

        let counts: Vec<Option<f64>> = layout
            .categories
            .iter()
            .map(|&idx| parse_count_safe(row.get(idx)))
            .collect();
        report.null_cells += counts.iter().filter(|c| c.is_none()).count();

        let total = parse_f64_safe(row.get(layout.total));
        if total.is_none() {
            report.null_totals += 1;
        }

        records.push(Record {
            region: normalize_name(row.get(layout.region).unwrap_or_default()),
            subregion: normalize_name(row.get(layout.subregion).unwrap_or_default()),
            year,
            counts,
            total,
        });
    }

    report.loaded_rows = records.len();
    let categories = layout
        .categories
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or_default().to_string())
        .collect();
    Ok((Table::new(source, categories, records), report))
}

/// Column positions resolved against a header row.
struct Layout {
    region: usize,
    subregion: usize,
    year: usize,
    total: usize,
    categories: Vec<usize>,
}

impl Layout {
    fn resolve(headers: &StringRecord, columns: &ColumnConfig) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
                .ok_or_else(|| LoadError::MissingColumn {
                    column: name.to_string(),
                })
        };
        let region = find(&columns.region)?;
        let subregion = find(&columns.subregion)?;
        let year = find(&columns.year)?;
        let total = find(&columns.total)?;

        let fixed = [region, subregion, year, total];
        let categories: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(idx, name)| !fixed.contains(idx) && !name.trim().is_empty())
            .map(|(idx, _)| idx)
            .collect();
        if categories.is_empty() {
            return Err(LoadError::NoCategories);
        }

        Ok(Layout {
            region,
            subregion,
            year,
            total,
            categories,
        })
    }
}

fn cache_key(path: &Path, columns: &ColumnConfig) -> Result<CacheKey, LoadError> {
    let path = std::fs::canonicalize(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(CacheKey {
        path,
        columns: columns.clone(),
    })
}

fn lock_cache() -> std::sync::MutexGuard<'static, HashMap<CacheKey, Arc<Table>>> {
    // The cache only ever holds fully built tables, so a poisoned lock is
    // still consistent.
    TABLE_CACHE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn log_report(path: &Path, report: &LoadReport) {
    log::info!(
        "Loaded {} ({} rows read, {} kept)",
        path.display(),
        report.total_rows,
        report.loaded_rows
    );
    if report.skipped_rows > 0 {
        log::warn!("{} rows skipped due to parse errors", report.skipped_rows);
    }
    if report.null_totals > 0 {
        log::warn!("{} rows have a non-numeric total", report.null_totals);
    }
    if report.null_cells > 0 {
        log::debug!("{} category cells coerced to null", report.null_cells);
    }
}
