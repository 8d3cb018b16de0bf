//! Circuit breaker engine demo driver.
//!
//! Loads (or defaults) the policy configuration, builds the registry,
//! runs a concurrent load simulation through the execution gate, and
//! prints the aggregated report plus each policy's status snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use circuit_gate::breaker::machine::StateObserver;
use circuit_gate::config::{self, EngineConfig};
use circuit_gate::observability::{logging, metrics, TelemetryObserver};
use circuit_gate::simulator;
use circuit_gate::{ExecutionGate, PolicyRegistry};

#[derive(Parser)]
#[command(name = "circuit-gate")]
#[command(about = "Circuit breaker policy engine with concurrent load simulation", long_about = None)]
struct Cli {
    /// Path to a TOML config file; built-in demo policies when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Policy to drive load through
    #[arg(short, long, default_value = "database")]
    policy: String,

    /// Number of concurrent requests to issue
    #[arg(short, long, default_value_t = 10)]
    requests: u32,

    /// Probability in [0, 1] that each request fails
    #[arg(short, long, default_value_t = 0.5)]
    failure_rate: f64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config: EngineConfig = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => EngineConfig::with_default_policies(),
    };

    logging::init(&config.observability.log_filter);

    tracing::info!(
        policies = config.policies.len(),
        policy = %cli.policy,
        requests = cli.requests,
        failure_rate = cli.failure_rate,
        "circuit-gate v0.1.0 starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let observers: Vec<Arc<dyn StateObserver>> = vec![Arc::new(TelemetryObserver)];
    let registry = Arc::new(PolicyRegistry::new(&config.policies, observers));
    let gate = ExecutionGate::new(registry.clone());

    let report = simulator::simulate(&gate, &cli.policy, cli.requests, cli.failure_rate).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    println!(
        "{}",
        serde_json::to_string_pretty(&registry.statuses())?
    );

    Ok(())
}
