//! # Garage Runner
//!
//! Command-line demo that runs one task group against a freshly seeded
//! garage, walks a small bicycle catalog through service, and drives a ride
//! state machine. Every lifecycle step is logged; a summary follows.
//!
//! A cancelled run still exits with status 0.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use garage_core::config::ConfigManager;
use garage_core::logging::init_tracing;
use garage_core::models::{Bicycle, BicycleCapability};
use garage_core::orchestration::{RunOutcome, RunReport, TaskGroupRunner};
use garage_core::services::BicycleService;
use garage_core::state_machine::RideStateMachine;

#[derive(Parser)]
#[command(name = "garage-runner")]
#[command(about = "Run the bicycle garage task group demo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Configuration directory path (default: $GARAGE_CONFIG_DIR or ./config)
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Environment overlay to apply (development, test, production)
    #[arg(short, long)]
    environment: Option<String>,

    /// Disable the timed cancellation trigger
    #[arg(long)]
    no_cancel: bool,

    /// Also run the save_report job
    #[arg(long)]
    with_report: bool,

    /// Verbose output level (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if std::env::var("RUST_LOG").is_err() {
        let level = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }
    init_tracing();

    let environment = cli
        .environment
        .clone()
        .unwrap_or_else(garage_core::logging::get_environment);
    let manager = ConfigManager::load_from_directory_with_env(cli.config_dir.clone(), &environment)
        .context("failed to load garage configuration")?;

    let mut config = manager.config().clone();
    if cli.no_cancel {
        config.runner.cancel_enabled = false;
    }
    if cli.with_report {
        config.runner.save_report_enabled = true;
    }

    let runner = TaskGroupRunner::new(config);
    let shutdown = runner.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling long-running jobs");
            shutdown.cancel();
        }
    });

    let report = runner.run().await.context("task group run failed")?;

    run_catalog_demo(runner.publisher().clone());
    run_ride_demo(&manager).await;

    print_summary(&report);
    Ok(())
}

fn run_catalog_demo(publisher: garage_core::EventPublisher) {
    let service = BicycleService::new(publisher);
    service.add(Bicycle::mountain("Trek", 2023, 120));
    service.add(Bicycle::road("Giant", 2022, 8.5));
    service.add(Bicycle::electric("Cube", 2024, 400));
    service.add(Bicycle::electric("Budget", 2021, 60));

    for line in service.describe_all() {
        tracing::info!("{line}");
    }
    service.for_each(|bike| tracing::info!("{}", bike.ride()));

    let report = service.service_all();
    tracing::info!(
        serviced = report.serviced.len(),
        failures = report.failures.len(),
        "Catalog service pass finished"
    );

    if let Err(e) = service.rename("Giant", "Giant TCR") {
        tracing::warn!(error = %e, "Rename failed");
    }
    service.remove("Budget");

    let newer: Vec<String> = service.newer_than(2022).map(|b| b.brand).collect();
    tracing::info!(?newer, average_year = ?service.average_year(), "Catalog queries");
}

async fn run_ride_demo(manager: &ConfigManager) {
    let mut bike = RideStateMachine::new("SpecialBike", &manager.config().ride);

    if let Err(e) = bike.start_riding().await {
        tracing::warn!(error = %e, "Ride request rejected");
    }
    if let Err(e) = bike.service().await {
        tracing::warn!(error = %e, "Ride request rejected");
    }
    // Already idle after service, so this one is rejected
    if let Err(e) = bike.stop().await {
        tracing::warn!(error = %e, "Ride request rejected");
    }
    tracing::info!(brand = bike.brand(), state = %bike.current_state(), "Ride demo finished");
}

fn print_summary(report: &RunReport) {
    println!();
    println!("Run {} finished as {}", report.run_id, report.state);
    match &report.outcome {
        RunOutcome::Completed => println!("All long-running jobs completed"),
        RunOutcome::Cancelled {
            cancelled,
            completed,
        } => {
            println!("Cancelled: {}", cancelled.join(", "));
            println!("Completed: {}", completed.join(", "));
        }
    }
    if let Some(average) = report.average_speed {
        println!("Average speed: {average:.2} km/h");
    }
    println!("Final garage:");
    for record in &report.records {
        println!("  {record}");
    }
    println!("Elapsed: {} ms", report.elapsed.as_millis());
}
