use lab_core::constants::ENV_REST_ADDR;
use lab_core::{LabConfig, DEFAULT_REST_ADDR};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the LabDesk application
///
/// Loads `.env` if present, resolves configuration once, then serves the REST API
/// (default `0.0.0.0:3000`, configurable via `LABDESK_REST_ADDR`).
///
/// # Environment Variables
/// - `LABDESK_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `LABDESK_DEFAULT_GST`: default GST percentage (default: 0)
/// - `LABDESK_DISCOUNT_PERCENT`: default discount percentage (default: 0)
/// - `LABDESK_ADDITIONAL_CHARGES`: default additional charges (default: 0)
/// - `LABDESK_RANGE_LABELS`: `full` or `abbreviated` fallback labels (default: full)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("labdesk_run=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var(ENV_REST_ADDR).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let cfg = Arc::new(LabConfig::from_lookup(|key| std::env::var(key).ok())?);

    tracing::info!("++ Starting LabDesk REST on {}", rest_addr);
    tracing::info!(
        "++ Billing defaults: GST {}%, discount {}%, additional charges {}",
        cfg.billing().gst_percent,
        cfg.billing().discount_percent,
        cfg.billing().additional_charges
    );

    api_rest::serve(&rest_addr, cfg).await
}
