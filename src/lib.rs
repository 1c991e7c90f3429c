// Retail ETL - Core Library
// Exposes the transforms and CSV plumbing for the CLI and tests

pub mod records;
pub mod period;
pub mod aggregation;
pub mod service_level;
pub mod error;
pub mod csv_io;
pub mod pipeline;

// Re-export commonly used types
pub use records::{DailyRecord, PeriodSummary, ServiceLevelRecord};
pub use period::{period_start, PeriodKind};
pub use aggregation::{aggregate, PeriodAggregator};
pub use service_level::{compute_service_level, ServiceLevelCalculator};
pub use error::EtlError;
pub use csv_io::{
    load_daily_records, read_daily_records,
    load_period_summaries, load_service_levels,
    save_period_summaries, save_service_levels,
};
pub use pipeline::{
    EtlConfig, EtlOutputs, RunReport,
    run_etl, save_outputs, transform,
    WEEKLY_FILE, MONTHLY_FILE, SERVICE_LEVEL_FILE,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
