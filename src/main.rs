use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use campus_courier::adapters::inbound::build_router;
use campus_courier::adapters::outbound::{init_domain_logger, load_location_table};
use campus_courier::application::{DeliveryService, ServiceSettings};
use campus_courier::domains::location::LocationLookup;
use campus_courier::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CAMPUS_CONFIG").ok())
        .unwrap_or_else(|| "config.toml".to_string());
    let config = Config::load(Some(&config_path)).context("loading configuration")?;

    // `log` records belong to fast_log when a delivery log file is configured, so
    // the tracing subscriber is installed without the log bridge.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))
        .context("parsing log filter")?;
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("installing tracing subscriber")?;

    info!("Starting Campus Courier");
    let logger = init_domain_logger(config.logging.domain_log_file.as_deref());

    let locations = load_location_table(config.locations.file.as_deref())
        .context("loading campus locations")?;
    info!("Loaded {} campus locations", locations.len());
    let locations: Arc<dyn LocationLookup> = Arc::new(locations);

    let service = Arc::new(DeliveryService::new(
        ServiceSettings::from(&config),
        locations,
        logger,
    ));
    let app = build_router(service);

    let bind_addr = config.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;
    info!("Campus Courier listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    info!("Shutting down Campus Courier");
    Ok(())
}
