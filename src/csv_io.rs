// 📂 CSV I/O - daily sales in, summary tables out
//
// Loading is all-or-nothing: the first malformed row fails the whole load.

use crate::error::EtlError;
use crate::records::{DailyRecord, PeriodSummary, ServiceLevelRecord};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub const DAILY_COLUMNS: [&str; 7] = [
    "date",
    "store_id",
    "product_id",
    "units_sold",
    "unit_price",
    "revenue",
    "inventory_level",
];

pub const SUMMARY_COLUMNS: [&str; 7] = [
    "period_start",
    "store_id",
    "product_id",
    "total_units_sold",
    "total_revenue",
    "avg_unit_price",
    "avg_inventory_level",
];

pub const SERVICE_LEVEL_COLUMNS: [&str; 3] = ["period_start", "store_id", "service_level"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Row as it sits in the file, before the date is parsed
#[derive(Debug, Deserialize)]
struct RawDailyRecord {
    date: String,
    store_id: String,
    product_id: String,
    units_sold: i64,
    unit_price: f64,
    revenue: f64,
    inventory_level: f64,
}

impl RawDailyRecord {
    fn into_record(self, line: u64) -> Result<DailyRecord, EtlError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).map_err(|_| {
            EtlError::InvalidDate {
                line,
                value: self.date.clone(),
            }
        })?;

        Ok(DailyRecord {
            date,
            store_id: self.store_id,
            product_id: self.product_id,
            units_sold: self.units_sold,
            unit_price: self.unit_price,
            revenue: self.revenue,
            inventory_level: self.inventory_level,
        })
    }
}

// ============================================================================
// READING
// ============================================================================

fn check_columns(headers: &csv::StringRecord, required: &[&str]) -> Result<(), EtlError> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(EtlError::MissingColumn {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Read daily records from any CSV source with a header row.
pub fn read_daily_records<R: Read>(reader: R) -> Result<Vec<DailyRecord>, EtlError> {
    read_rows::<R, RawDailyRecord>(reader, &DAILY_COLUMNS)?
        .into_iter()
        .map(|(line, raw)| raw.into_record(line))
        .collect()
}

/// Load daily records from a CSV file.
pub fn load_daily_records(path: &Path) -> Result<Vec<DailyRecord>, EtlError> {
    read_daily_records(File::open(path)?)
}

/// Load a previously written weekly or monthly summary table.
pub fn load_period_summaries(path: &Path) -> Result<Vec<PeriodSummary>, EtlError> {
    let rows = read_rows::<_, PeriodSummary>(File::open(path)?, &SUMMARY_COLUMNS)?;
    Ok(rows.into_iter().map(|(_, row)| row).collect())
}

/// Load a previously written service level table.
pub fn load_service_levels(path: &Path) -> Result<Vec<ServiceLevelRecord>, EtlError> {
    let rows = read_rows::<_, ServiceLevelRecord>(File::open(path)?, &SERVICE_LEVEL_COLUMNS)?;
    Ok(rows.into_iter().map(|(_, row)| row).collect())
}

/// Decode every row, tagged with its 1-based line number in the file.
fn read_rows<R: Read, T: DeserializeOwned>(
    reader: R,
    required: &[&str],
) -> Result<Vec<(u64, T)>, EtlError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    check_columns(&headers, required)?;

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: T = record
            .deserialize(Some(&headers))
            .map_err(|e| EtlError::InvalidRecord {
                line,
                message: e.to_string(),
            })?;
        rows.push((line, row));
    }

    Ok(rows)
}

// ============================================================================
// WRITING
// ============================================================================

/// Write a header row followed by one row per item.
///
/// The header is written explicitly so empty tables still carry it.
pub fn write_table<W: Write, T: Serialize>(
    writer: W,
    columns: &[&str],
    rows: &[T],
) -> Result<(), EtlError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(columns)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(())
}

pub fn save_period_summaries(path: &Path, rows: &[PeriodSummary]) -> Result<(), EtlError> {
    write_table(File::create(path)?, &SUMMARY_COLUMNS, rows)
}

pub fn save_service_levels(path: &Path, rows: &[ServiceLevelRecord]) -> Result<(), EtlError> {
    write_table(File::create(path)?, &SERVICE_LEVEL_COLUMNS, rows)
}

// ============================================================================
// TESTS
// ============================================================================
