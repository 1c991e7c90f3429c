// 🏭 ETL Pipeline - load → weekly / monthly / service level → save
//
// Pure transforms live in `aggregation` and `service_level`; this module
// only wires paths around them.

use crate::aggregation::PeriodAggregator;
use crate::csv_io::{load_daily_records, save_period_summaries, save_service_levels};
use crate::error::EtlError;
use crate::records::{DailyRecord, PeriodSummary, ServiceLevelRecord};
use crate::service_level::ServiceLevelCalculator;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "data/raw/sales_data.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "data/processed";

pub const WEEKLY_FILE: &str = "weekly_sales.csv";
pub const MONTHLY_FILE: &str = "monthly_sales.csv";
pub const SERVICE_LEVEL_FILE: &str = "monthly_service_level.csv";

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtlConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
}

impl EtlConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        EtlConfig {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn weekly_path(&self) -> PathBuf {
        self.output_dir.join(WEEKLY_FILE)
    }

    pub fn monthly_path(&self) -> PathBuf {
        self.output_dir.join(MONTHLY_FILE)
    }

    pub fn service_level_path(&self) -> PathBuf {
        self.output_dir.join(SERVICE_LEVEL_FILE)
    }
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_DIR)
    }
}

// ============================================================================
// OUTPUTS
// ============================================================================

/// The three result tables of one run
#[derive(Debug, Clone, PartialEq)]
pub struct EtlOutputs {
    pub weekly: Vec<PeriodSummary>,
    pub monthly: Vec<PeriodSummary>,
    pub service_level: Vec<ServiceLevelRecord>,
}

/// Compute every output table from one immutable batch.
pub fn transform(records: &[DailyRecord]) -> EtlOutputs {
    EtlOutputs {
        weekly: PeriodAggregator::weekly().aggregate(records),
        monthly: PeriodAggregator::monthly().aggregate(records),
        service_level: ServiceLevelCalculator::new().compute(records),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub input_rows: usize,
    pub weekly_rows: usize,
    pub monthly_rows: usize,
    pub service_level_rows: usize,
    pub weekly_path: PathBuf,
    pub monthly_path: PathBuf,
    pub service_level_path: PathBuf,
}

impl RunReport {
    pub fn summary(&self) -> String {
        format!(
            "{} input rows → {} weekly, {} monthly, {} service level rows",
            self.input_rows, self.weekly_rows, self.monthly_rows, self.service_level_rows
        )
    }
}

// ============================================================================
// RUN
// ============================================================================

/// Write the three tables into `config.output_dir`, creating it if needed.
pub fn save_outputs(config: &EtlConfig, outputs: &EtlOutputs) -> Result<()> {
    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.output_dir.display())
    })?;

    save_table(&config.weekly_path(), |p| save_period_summaries(p, &outputs.weekly))?;
    save_table(&config.monthly_path(), |p| save_period_summaries(p, &outputs.monthly))?;
    save_table(&config.service_level_path(), |p| {
        save_service_levels(p, &outputs.service_level)
    })?;

    Ok(())
}

fn save_table<F>(path: &Path, save: F) -> Result<()>
where
    F: FnOnce(&Path) -> std::result::Result<(), EtlError>,
{
    save(path).with_context(|| format!("Failed to write {}", path.display()))
}

/// Full batch: load input, compute all tables, save them.
///
/// Nothing is written when the input fails to load.
pub fn run_etl(config: &EtlConfig) -> Result<RunReport> {
    let records = load_daily_records(&config.input_path)
        .with_context(|| format!("Failed to load {}", config.input_path.display()))?;

    let outputs = transform(&records);
    save_outputs(config, &outputs)?;

    Ok(RunReport {
        input_rows: records.len(),
        weekly_rows: outputs.weekly.len(),
        monthly_rows: outputs.monthly.len(),
        service_level_rows: outputs.service_level.len(),
        weekly_path: config.weekly_path(),
        monthly_path: config.monthly_path(),
        service_level_path: config.service_level_path(),
    })
}

// ============================================================================
// TESTS
// ============================================================================
