use clap::Parser;
use log::info;
use xplogd_web::cli::Cli;
use xplogd_web::config::ApplicationConfig;
use xplogd_web::logging::setup_logging;
use xplogd_web::server::{build_router, serve, AppState};
use xplogd_web::service::IngestionService;
use xplogd_web::store::SqliteStore;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.logging_level);

    let mut config = match &cli.config_file {
        Some(path) => ApplicationConfig::construct_from_path(path).unwrap_or_else(|e| {
            log::error!("{e}");
            std::process::exit(1);
        }),
        None => ApplicationConfig::default(),
    };
    if let Some(address) = cli.address {
        config.server.address = address;
    }
    info!("Main: Application started.");

    let store = SqliteStore::connect(&config.storage.database_url)
        .await
        .unwrap_or_else(|e| {
            log::error!("Failed to open {}: {e}", config.storage.database_url);
            std::process::exit(1);
        });
    match (store.aircraft_count().await, store.position_count().await) {
        (Ok(aircraft), Ok(positions)) => info!(
            "Main: Opened {} with {aircraft} aircraft and {positions} positions.",
            config.storage.database_url
        ),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to read {}: {e}", config.storage.database_url);
            std::process::exit(1);
        }
    }

    let service = IngestionService::new(
        config.tracking.aircraft_seen_gap(),
        std::sync::Arc::new(store.clone()),
        std::sync::Arc::new(store),
    );
    info!(
        "Main: Aircraft seen gap is {}s.",
        config.tracking.aircraft_seen_gap_seconds
    );

    let router = build_router(
        AppState::new(service, config.auth),
        config.server.static_dir.as_deref(),
    );

    if let Err(e) = serve(&config.server, router).await {
        log::error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Main: Program finished.");
}
