//! PlantSeg batch client binary.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use plantseg_batch::{
    load_images, render_report, select_images, BatchConfig, BatchError, BatchOrchestrator,
};
use plantseg_ml_client::PredictClient;

/// Analyze root, stem and leaf length and area in plant photos.
#[derive(Debug, Parser)]
#[command(name = "plantseg", version)]
struct Cli {
    /// Images to analyze (jpg, jpeg, png; at most 10 are submitted)
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Scale in pixels per centimetre; the service defaults to 93.8 when omitted
    #[arg(short, long)]
    scale: Option<String>,

    /// Inference service base URL
    #[arg(long, env = "PLANTSEG_API_URL")]
    api_url: Option<String>,

    /// Directory for the xlsx report
    #[arg(short, long, env = "PLANTSEG_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Print the summary only, do not write the xlsx report
    #[arg(long)]
    no_export: bool,

    /// Probe the service health endpoint before submitting
    #[arg(long)]
    check_health: bool,
}

fn init_tracing() -> anyhow::Result<()> {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("plantseg=info"))
        .context("invalid log filter")?;

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(std::io::stderr),
            )
            .with(env_filter)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing()?;

    let mut config = BatchConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.client.base_url = api_url;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    info!("Batch config: {:?}", config);

    let selection = select_images(&cli.images);
    if selection.accepted.is_empty() {
        return Err(BatchError::EmptySelection.into());
    }
    let images = load_images(&selection.accepted).await?;

    let client = PredictClient::new(config.client.clone()).context("failed to create ML client")?;
    if cli.check_health && !client.health_check().await? {
        return Err(BatchError::unhealthy(config.client.base_url.clone()).into());
    }

    let orchestrator = BatchOrchestrator::new(client).with_max_in_flight(config.max_in_flight);
    let report = orchestrator.run_batch(&images, cli.scale.as_deref()).await?;

    print!("{}", render_report(&report));

    if cli.no_export {
        return Ok(());
    }

    match plantseg_report::export(&report)? {
        Some(artifact) => {
            let path = artifact.write_to_dir(&config.output_dir)?;
            println!("\nОтчёт сохранён: {}", path.display());
        }
        None => warn!("No detections in any image, report not written"),
    }

    Ok(())
}
