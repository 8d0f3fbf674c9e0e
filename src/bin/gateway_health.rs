//! One-shot health sweep across the configured partner services.
//!
//! Reads service endpoints from the environment (`INVENTORY_SERVICE_URL`,
//! `REGION_SERVICE_URL`, `ADDRESS_SERVICE_URL` plus optional per-service
//! overrides), probes each one over its real call path and exits nonzero
//! when the gateway would run degraded.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use option_gateway::models::OverallStatus;
use option_gateway::{GatewayConfig, IntegrationManager};

#[derive(Parser)]
#[command(
    name = "gateway-health",
    about = "Probe the configured partner services and report their health"
)]
struct Args {
    /// Emit the sweep result as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = GatewayConfig::from_env();
    let manager = IntegrationManager::from_config(&config)?;

    let result = manager.health_check().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let mut names: Vec<&String> = result.services.keys().collect();
        names.sort();
        for name in names {
            let service = &result.services[name];
            match &service.error {
                Some(error) => println!("{name}: {} ({error})", service.status),
                None => println!("{name}: {}", service.status),
            }
        }
        println!("overall: {}", result.overall);
    }

    if result.overall == OverallStatus::Degraded {
        std::process::exit(1);
    }
    Ok(())
}
