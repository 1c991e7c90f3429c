// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use std::env;
use std::path::PathBuf;

use retail_etl::{run_etl, EtlConfig, RunReport};
use retail_etl::pipeline::DEFAULT_OUTPUT_DIR;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let positional: Vec<&str> = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(String::as_str)
        .collect();

    match positional.first() {
        Some(&"view") => {
            let output_dir = positional.get(1).copied().unwrap_or(DEFAULT_OUTPUT_DIR);
            run_ui_mode(PathBuf::from(output_dir))?;
        }
        Some(&"run") => run_batch(config_from_args(&positional[1..]), json)?,
        _ => run_batch(config_from_args(&positional), json)?,
    }

    Ok(())
}

/// `[INPUT] [OUTPUT_DIR]`, each falling back to the default
fn config_from_args(args: &[&str]) -> EtlConfig {
    let mut config = EtlConfig::default();
    if let Some(input) = args.first() {
        config.input_path = PathBuf::from(input);
    }
    if let Some(output_dir) = args.get(1) {
        config.output_dir = PathBuf::from(output_dir);
    }
    config
}

fn run_batch(config: EtlConfig, json: bool) -> Result<()> {
    if json {
        let report = run_etl(&config)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📦 Retail ETL - daily sales → weekly / monthly / service level");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("\n📂 Loading raw data from {}", config.input_path.display());

    let report = match run_etl(&config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("❌ ETL run failed: {:#}", err);
            std::process::exit(1);
        }
    };

    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    println!("✓ Loaded {} daily records", report.input_rows);
    println!("\n💾 Saved weekly data to {} ({} rows)", report.weekly_path.display(), report.weekly_rows);
    println!("💾 Saved monthly data to {} ({} rows)", report.monthly_path.display(), report.monthly_rows);
    println!(
        "💾 Saved monthly service level to {} ({} rows)",
        report.service_level_path.display(),
        report.service_level_rows
    );
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ {}", report.summary());
}

#[cfg(feature = "tui")]
fn run_ui_mode(output_dir: PathBuf) -> Result<()> {
    use anyhow::Context;
    use retail_etl::pipeline::DEFAULT_INPUT_PATH;
    use retail_etl::{load_period_summaries, load_service_levels};

    let config = EtlConfig::new(DEFAULT_INPUT_PATH, output_dir);

    if !config.weekly_path().exists() {
        eprintln!("❌ No results found in {}", config.output_dir.display());
        eprintln!("   Run: cargo run -- run");
        eprintln!("   to produce the summary tables first.");
        std::process::exit(1);
    }

    println!("📊 Loading result tables...");
    let weekly = load_period_summaries(&config.weekly_path())
        .with_context(|| format!("Failed to read {}", config.weekly_path().display()))?;
    let monthly = load_period_summaries(&config.monthly_path())
        .with_context(|| format!("Failed to read {}", config.monthly_path().display()))?;
    let service_level = load_service_levels(&config.service_level_path())
        .with_context(|| format!("Failed to read {}", config.service_level_path().display()))?;

    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(weekly, monthly, service_level);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_output_dir: PathBuf) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
