use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use market_data_loader::{CachedLoader, providers::yahoo::YahooProvider};
use stock_dashboard::{
    cli::Cli,
    config::DashboardConfig,
    export::{DataSink, JsonFileSink},
    pipeline::{self, PipelineError},
    render::render_dashboard,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config =
        DashboardConfig::load_or_default(cli.config.clone()).context("loading configuration")?;

    let params = cli.params(&config.dashboard, Local::now().date_naive());
    let preview_rows = cli.preview_rows(&config.dashboard);

    let provider = YahooProvider::with_config(config.provider.clone())
        .context("building the Yahoo provider")?;
    let loader = CachedLoader::new(provider);

    let view = match pipeline::run(&loader, &params).await {
        Ok(view) => view,
        Err(err @ (PipelineError::NoData { .. } | PipelineError::MetricsUnavailable(_))) => {
            eprintln!("{err}");
            return Ok(ExitCode::from(2));
        }
        Err(err) => return Err(err).context("invalid parameters"),
    };

    print!("{}", render_dashboard(&view, preview_rows));

    if let Some(path) = &cli.export {
        let written = JsonFileSink::new(path)
            .write(&view)
            .await
            .context("exporting dashboard")?;
        eprintln!("Exported {}", written.display());
    }

    Ok(ExitCode::SUCCESS)
}
