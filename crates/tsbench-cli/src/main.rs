//! tsbench — query-latency benchmark CLI for TimescaleDB.
//!
//! Reads query parameters from a CSV file, runs them serially against
//! the database through the three-stage pipeline in `tsbench-core`,
//! and prints latency statistics.

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use tsbench_core::RunSummary;
use tsbench_pg::{PgConfig, PgExecutor};

/// Benchmarks min/max query latency against a TimescaleDB instance.
#[derive(Parser, Debug)]
#[command(name = "tsbench", version, about)]
struct Cli {
    /// Input CSV file (subject,range-start,range-end).
    input: PathBuf,

    /// Database connection URL (overrides the individual options).
    #[arg(short = 'u', long)]
    db_url: Option<String>,

    /// Database name.
    #[arg(short = 'd', long, env = "PGDATABASE", default_value = "homework")]
    dbname: String,

    /// Database host name.
    #[arg(long, env = "PGHOST", default_value = "localhost")]
    host: String,

    /// Database TCP port.
    #[arg(short = 'p', long, env = "PGPORT", default_value_t = 5432)]
    port: u16,

    /// Database username.
    #[arg(short = 'U', long, env = "PGUSER", default_value = "postgres")]
    user: String,

    /// Database user password.
    #[arg(long, env = "PGPASSWORD")]
    password: Option<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = try_main().await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

async fn try_main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = PgConfig {
        url: cli.db_url,
        host: cli.host,
        port: cli.port,
        dbname: cli.dbname,
        user: cli.user,
        password: cli.password,
    };

    let input = File::open(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?;
    let executor = PgExecutor::connect(&config)
        .await
        .context("connecting to database")?;

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling run");
            interrupt.cancel();
        }
    });

    let summary = tsbench_core::run(input, executor, &cancel).await?;
    print_summary(&summary);
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("Number of queries: {}", summary.count);
    println!(
        "Total processing time: {:?}",
        truncate_micros(summary.total_latency)
    );
    println!(
        "Min / max processing time: {:?} / {:?}",
        truncate_micros(summary.min_latency),
        truncate_micros(summary.max_latency)
    );
    println!(
        "Mean / median processing time: {:?} / {:?}",
        truncate_micros(summary.mean_latency),
        truncate_micros(summary.median_latency)
    );
}

/// Drops sub-microsecond noise from a reported duration.
fn truncate_micros(duration: Duration) -> Duration {
    Duration::from_micros(u64::try_from(duration.as_micros()).unwrap_or(u64::MAX))
}
