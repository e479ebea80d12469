//! College ROI - prepare the processed tables, then serve the dashboard.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use college_roi::charts::DashboardData;
use college_roi::data::{DataLoader, DataProcessor};
use college_roi::stats::SummaryReport;
use college_roi::{build_router, AppState, Settings};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "college_roi", version, about = "College ROI data preparation and dashboard")]
struct Cli {
    /// TOML config file (defaults to ./college_roi.toml when present)
    #[arg(long, global = true, env = "COLLEGE_ROI_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the raw and processed CSV files
    #[arg(long, global = true, env = "COLLEGE_ROI_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Clean the raw CSVs and write the processed tables
    Prepare,
    /// Serve the dashboard over the processed tables
    Serve(ServeArgs),
}

#[derive(Args)]
struct ServeArgs {
    #[arg(long, env = "COLLEGE_ROI_HOST")]
    host: Option<String>,
    #[arg(long, env = "COLLEGE_ROI_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(data_dir) = cli.data_dir {
        settings.data_dir = data_dir;
    }

    match cli.command {
        Command::Prepare => prepare(&settings),
        Command::Serve(args) => {
            if let Some(host) = args.host {
                settings.host = host;
            }
            if let Some(port) = args.port {
                settings.port = port;
            }
            serve(&settings).await
        }
    }
}

fn prepare(settings: &Settings) -> Result<()> {
    info!("College ROI data preparation v{}", env!("CARGO_PKG_VERSION"));
    let loader = DataLoader::new(&settings.data_dir);

    let (prepared, written) = DataProcessor::run(
        &loader,
        &settings.salary_file,
        &settings.tuition_file,
        &settings.processed_salary_file,
        &settings.processed_tuition_file,
    )
    .with_context(|| format!("Data preparation failed in {}", settings.data_dir.display()))?;

    SummaryReport::from_prepared(&prepared).log();
    info!("Saved processed salary data to {}", written.salary_path.display());
    info!("Saved tuition trend data to {}", written.tuition_path.display());
    Ok(())
}

async fn serve(settings: &Settings) -> Result<()> {
    info!("College ROI dashboard v{}", env!("CARGO_PKG_VERSION"));
    let loader = DataLoader::new(&settings.data_dir);

    let data = DashboardData::load(
        &loader,
        &settings.processed_salary_file,
        &settings.processed_tuition_file,
    )
    .context("Failed to load processed data; run `college_roi prepare` first")?;

    let app = build_router(AppState::new(data));

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Dashboard listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
