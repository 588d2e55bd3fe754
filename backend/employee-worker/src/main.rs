//! employee-worker - fetch employees and compute salary averages concurrently

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use employee_worker::client::DEFAULT_EMPLOYEE_API_URL;
use employee_worker::pool::{DEFAULT_WORKERS, PoolConfig};
use employee_worker::{run_pool, EmployeeClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "employee-worker", author, version, about = "Concurrent employee salary report")]
struct Cli {
    /// Employee list endpoint
    #[arg(long, env = "EMPLOYEE_API_URL", default_value = DEFAULT_EMPLOYEE_API_URL)]
    url: String,

    /// Number of concurrent workers
    #[arg(long, env = "EMPLOYEE_WORKERS", default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Simulated processing time per employee, in milliseconds
    #[arg(long, env = "EMPLOYEE_DELAY_MS", default_value_t = 1000)]
    delay_ms: u64,

    /// HTTP request timeout, in seconds
    #[arg(long, env = "EMPLOYEE_HTTP_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("employee_worker=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let client = EmployeeClient::new(&cli.url, Duration::from_secs(cli.timeout_secs))
        .context("Failed to build HTTP client")?;

    tracing::info!(url = %client.url(), "Fetching employees");
    let employees = client
        .fetch_employees()
        .await
        .with_context(|| format!("Failed to fetch employees from {}", cli.url))?;
    tracing::info!(count = employees.len(), "Fetched employees");

    let config = PoolConfig {
        workers: cli.workers,
        delay: Duration::from_millis(cli.delay_ms),
    };
    let reports = run_pool(employees, &config).await;

    let skipped = reports.iter().filter(|r| r.average_salary.is_none()).count();
    tracing::info!(
        processed = reports.len(),
        skipped,
        "Finished processing employees"
    );

    Ok(())
}
