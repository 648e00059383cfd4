/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use rosarch::config::ModelLoader;
use rosarch::lowering::LoweringOptions;
use rosarch::model::DEFAULT_QOS_DEPTH;
use rosarch::pipeline::{self, PipelineOutcome};
use rosarch::validate::WELL_FORMED;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Validate an architecture model and lower it to the timed-automaton target
/// model.
///
/// Example:
///   rosarch --model pipeline.yaml --output pipeline.target.yaml \
///           --monitor-actuator ACT --monitor-period 200
#[derive(Debug, Parser)]
#[command(
    name = "rosarch",
    about = "Architecture model validation and lowering",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML architecture model.
    #[arg(short = 'm', long = "model")]
    model: PathBuf,

    /// Where to write the lowered target model (stdout if absent).
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Buffer depth assumed by the target model.
    #[arg(short = 'b', long = "buffer-depth", default_value_t = DEFAULT_QOS_DEPTH)]
    buffer_depth: i64,

    /// Node whose output the analysis monitors.
    #[arg(long = "monitor-actuator")]
    monitor_actuator: Option<String>,

    /// Period of the monitor.
    #[arg(long = "monitor-period", default_value_t = 0)]
    monitor_period: u64,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        model        = %cli.model.display(),
        output       = ?cli.output,
        buffer_depth = cli.buffer_depth,
        monitor      = ?cli.monitor_actuator,
        "Configuration"
    );

    match execute(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}

/// `Ok(false)` when the model was rejected; every diagnostic has been logged.
fn execute(cli: &Cli) -> Result<bool> {
    let system = ModelLoader::load_from_file(&cli.model)?;

    let options = LoweringOptions {
        buffer_depth: cli.buffer_depth,
        monitor_actuator: cli.monitor_actuator.clone(),
        monitor_period: cli.monitor_period,
    };

    let outcome = pipeline::run(&system, &options).context("Lowering failed")?;

    for d in outcome.errors() {
        error!("{d}");
    }
    for d in outcome.warnings() {
        warn!("{d}");
    }

    let PipelineOutcome::Lowered(lowered) = outcome else {
        return Ok(false);
    };
    info!("{WELL_FORMED}");

    if let Some(hp) = &lowered.hyperperiod {
        info!(
            hyperperiod = hp.hyperperiod,
            periods = ?hp.unique_periods,
            "analysis horizon"
        );
    }

    let yaml = lowered
        .target
        .to_yaml()
        .context("Failed to serialise target model")?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, yaml)
                .with_context(|| format!("Cannot write target model: {}", path.display()))?;
            info!("Target model written to: {}", path.display());
        }
        None => print!("{yaml}"),
    }
    Ok(true)
}
