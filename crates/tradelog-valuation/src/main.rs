/*
[INPUT]:  CLI arguments and YAML configuration file
[OUTPUT]: One valuation of the configured portfolio on stdout
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or the output format
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tradelog_valuation::{AppConfig, PortfolioService, to_cents};

#[derive(Parser, Debug)]
#[command(
    name = "tradelog-valuation",
    version,
    about = "Portfolio valuation over live cached prices"
)]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    /// Validate the configuration and exit
    #[arg(long = "dry-run")]
    dry_run: bool,
    /// Emit the valuation as JSON instead of text
    #[arg(long = "json")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(
        config_path = %args.config_path.display(),
        dry_run = args.dry_run,
        "starting tradelog-valuation"
    );

    let config = load_config(&args.config_path)?;
    info!(holdings = config.holdings.len(), "configuration loaded");

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let service = PortfolioService::from_config(&config).context("build portfolio service")?;
    let holdings = config.to_holdings().context("parse holdings")?;

    let valuation = service.value_portfolio(&holdings).await;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&valuation).context("encode valuation")?
        );
        return Ok(());
    }

    for line in &valuation.lines {
        println!(
            "{:<44} {:>16}",
            line.holding.to_string(),
            to_cents(line.value_usd)
        );
    }
    println!("{:<44} {:>16}", "total", valuation.total_cents());

    if let Some(entry) = service.price_snapshot().await.first() {
        println!(
            "prices as of {}",
            entry.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<AppConfig> {
    let path_str = path.to_str().context("config path must be valid utf-8")?;
    AppConfig::from_file(path_str).context("load config")
}
