use anyhow::{Context, Result};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use buzz_collector::config::Config;
use buzz_collector::forum::HttpPageFetcher;
use buzz_collector::pipeline::{self, Sources};
use buzz_collector::youtube::YtDlp;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Fatal error: {e:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        data_dir = %config.data_dir.display(),
        channels = config.channels.len(),
        forum_url = %config.forum_list_url,
        "Configuration loaded"
    );

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create data directory: {}",
                config.data_dir.display()
            )
        })?;

    let ytdlp = YtDlp::from_config(&config);
    let pages = HttpPageFetcher::new().context("Failed to build HTTP client")?;
    let sources = Sources {
        listing: &ytdlp,
        comments: &ytdlp,
        pages: &pages,
    };

    let summary = pipeline::run(&config, sources).await;

    if summary.is_degraded() {
        warn!(?summary, "Run finished degraded");
        if config.strict_exit {
            return Ok(1);
        }
    }
    Ok(0)
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,buzz_collector=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
