use anyhow::Context;
use spam_rs::api::ApiServer;
use spam_rs::config::Config;
use spam_rs::logging::init_tracing;
use spam_rs::service::AnalysisService;
use tracing::info;

const CONFIG_ENV: &str = "SPAM_RS_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config path: env var, then first argument, then ./config.toml if present
    let path = std::env::var(CONFIG_ENV)
        .ok()
        .or_else(|| std::env::args().nth(1))
        .or_else(|| {
            std::path::Path::new("config.toml")
                .exists()
                .then(|| "config.toml".to_string())
        });

    let config = match &path {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => Config::default(),
    };

    init_tracing(&config.logging);

    info!("Starting spam-rs server");
    match &path {
        Some(path) => info!("Configuration loaded from {}", path),
        None => info!("No config file found, using defaults"),
    }
    info!("  API listening on: {}", config.server.listen_addr);
    info!("  History backend: {:?}", config.storage.backend);
    info!("  Batch workers: {}", config.batch.workers);

    let service = AnalysisService::from_config(&config)
        .await
        .context("failed to initialize analysis service")?;

    let server = ApiServer::new(service, config.server.listen_addr.clone());

    tokio::select! {
        result = server.run() => {
            result.context("API server error")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
