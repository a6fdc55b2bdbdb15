#![deny(warnings)]

//! Headless CLI: load parameters, run the feedback simulation, print the report.

mod config;
mod report;

use anyhow::Result;
use config::{parse_args, resolve_parameters, OutputFormat};
use sim_runtime::SimulationEngine;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Logging goes to stderr; stdout carries only the report.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    info!(config = ?args.config, steps = ?args.steps, format = ?args.format, "starting CLI");

    let params = resolve_parameters(&args)?;
    let mut engine = SimulationEngine::new(params)?;
    engine.run_to_end()?;
    let summary = engine.summary();
    info!(
        periods = summary.periods,
        total_revenue = summary.total_revenue,
        final_budget = summary.final_budget,
        "run finished"
    );

    let history = engine.history();
    match args.format {
        OutputFormat::Table => print!("{}", report::render_table(history)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(history)?),
        OutputFormat::Series => println!("{}", serde_json::to_string_pretty(&history.series())?),
    }
    if args.summary {
        println!("{}", report::render_summary(&summary)?);
    }
    Ok(())
}
