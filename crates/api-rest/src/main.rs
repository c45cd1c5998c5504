//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development when only the REST server (with OpenAPI/Swagger UI) is wanted. The
//! workspace's main `labdesk-run` binary additionally loads a `.env` file before starting.

use lab_core::constants::ENV_REST_ADDR;
use lab_core::{LabConfig, DEFAULT_REST_ADDR};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the LabDesk REST API server
///
/// # Environment Variables
/// - `LABDESK_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `LABDESK_DEFAULT_GST`, `LABDESK_DISCOUNT_PERCENT`, `LABDESK_ADDITIONAL_CHARGES`: billing
///   defaults
/// - `LABDESK_RANGE_LABELS`: `full` or `abbreviated`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a configuration value is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var(ENV_REST_ADDR).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let cfg = Arc::new(LabConfig::from_lookup(|key| std::env::var(key).ok())?);

    tracing::info!(
        labels = %cfg.label_style(),
        gst = cfg.billing().gst_percent,
        "-- Starting LabDesk REST API on {}",
        addr
    );

    api_rest::serve(&addr, cfg).await
}
