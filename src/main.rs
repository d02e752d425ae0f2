// Yard Access Monitor - Main Entry Point
//
// You can run it via Cargo:
//
// ```console
// $ cargo build --release
// $ ./target/release/yard-access-monitor
// ```
//
// Or with custom configuration:
//
// ```console
// $ ./target/release/yard-access-monitor --duration-minutes 120 --seed 7 --output-format text --verbose
// ```

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::process;
use tracing::{error, info};
use yard_access_monitor::feed::{FeedOrchestrator, FeedStatistics};
use yard_access_monitor::logging::LoggingConfig;
use yard_access_monitor::timing::DashboardReport;
use yard_access_monitor::types::config::CliArgs;
use yard_access_monitor::types::{OutputFormat, YardConfig};

/// Everything printed at the end of a run
#[derive(Debug, Serialize)]
struct RunOutput<'a> {
    dashboard: &'a DashboardReport,
    statistics: &'a FeedStatistics,
}

fn main() {
    // Parse CLI arguments first to check for special flags
    let args = CliArgs::parse();

    // Handle special CLI flags that don't require full initialization
    if args.print_config {
        match YardConfig::default().print_json() {
            Ok(json) => {
                println!("{}", json);
                return;
            }
            Err(e) => {
                eprintln!("Failed to serialize default configuration: {}", e);
                process::exit(1);
            }
        }
    }

    // Initialize logging based on CLI flags
    let logging_result = if args.debug {
        LoggingConfig::init_debug()
    } else if args.verbose {
        LoggingConfig::init_verbose()
    } else {
        // Default: minimal logging for normal users
        LoggingConfig::new().with_level(tracing::Level::WARN).init()
    };

    let _log_guard = match logging_result {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    info!("Starting Yard Access Monitor");

    let dry_run = args.dry_run;

    // Load configuration from CLI arguments and optional config file
    let config = match YardConfig::from_cli_args(args) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        process::exit(1);
    }

    info!("Configuration loaded and validated successfully");

    if dry_run {
        eprintln!("Configuration validation successful!");
        eprintln!("Dry run mode - the feed will not be executed.");
        print_configuration_summary(&config);
        return;
    }

    print_configuration_summary(&config);

    if let Err(e) = run(config) {
        error!("Run failed: {:#}", e);
        eprintln!("Run failed: {:#}", e);
        process::exit(1);
    }

    info!("Yard Access Monitor completed successfully");
}

/// Run the feed, then print the report and write the record snapshot
fn run(config: YardConfig) -> Result<()> {
    let format = config
        .get_output_format()
        .map_err(anyhow::Error::msg)
        .context("Invalid output format")?;

    let mut feed = FeedOrchestrator::new(config.clone()).context("Failed to start the feed")?;

    eprintln!("Running feed for {} minutes...", config.duration_minutes);
    let statistics = feed.run().context("Feed run failed")?;

    let snapshot = feed.store().snapshot();
    let dashboard = DashboardReport::build(&snapshot.access_records, feed.alerts(), feed.now());

    match format {
        OutputFormat::Json => {
            let output = RunOutput { dashboard: &dashboard, statistics: &statistics };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("{}", dashboard.generate_summary_report());
            println!("{}", statistics.generate_summary_report());
        }
    }

    if let Some(path) = &config.records_output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create records output file '{}'", path))?;
        let written = snapshot
            .write_records_jsonl(BufWriter::new(file))
            .with_context(|| format!("Failed to write records to '{}'", path))?;
        info!("Wrote {} access records to {}", written, path);
        eprintln!("Access records written to: {}", path);
    }

    Ok(())
}

/// Print configuration summary
fn print_configuration_summary(config: &YardConfig) {
    eprintln!("Configuration:");
    eprintln!("  Duration: {} min ({})", config.duration_minutes, clock_label(config));
    eprintln!(
        "  Intervals: arrivals {}s, progression {}s, alerts {}s",
        config.arrival_interval_secs, config.progression_interval_secs, config.alert_interval_secs
    );
    eprintln!("  Advance Probability: {:.0}%", config.progression_probability * 100.0);
    eprintln!(
        "  Vehicle Mix: {:.0}% normal, {:.0}% service, {:.0}% car-carrier",
        config.normal_vehicle_weight * 100.0,
        config.service_vehicle_weight * 100.0,
        config.cegonha_vehicle_weight * 100.0
    );
    eprintln!(
        "  Alert Thresholds: stuck after {} min, low speed below {} km/h",
        config.stuck_in_transit_minutes, config.low_speed_threshold_kmh
    );
    eprintln!("  Output Format: {}", config.output_format);
    if let Some(seed) = config.seed {
        eprintln!("  Random Seed: {}", seed);
    }
    eprintln!();
}

fn clock_label(config: &YardConfig) -> &'static str {
    if config.realtime {
        "real time"
    } else {
        "simulated"
    }
}
