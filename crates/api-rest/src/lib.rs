//! # API REST
//!
//! REST API implementation for LabDesk.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! The router is exposed as a library so both the standalone `labdesk-api-rest` binary and the
//! workspace's `labdesk-run` binary serve the same routes.

#![warn(rust_2018_idioms)]

pub mod types;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use lab_core::{
    select_group, InvoiceAdjustments, InvoiceTotalsCalculator, LabConfig, LabReport,
    ReferenceRangeResolver,
};
use lab_types::NonEmptyText;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::types::{
    BillingDefaultsRes, HealthRes, InvoiceDisplayRes, InvoiceTotalsReq, InvoiceTotalsRes,
    ReportPreviewReq, ReportRes, ReportRowRes, ResolveRangeReq, ResolveRangeRes,
};

/// Application state shared across REST API handlers.
#[derive(Clone)]
struct AppState {
    cfg: Arc<LabConfig>,
    calculator: InvoiceTotalsCalculator,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        billing_defaults,
        resolve_range,
        invoice_totals,
        report_preview,
    ),
    components(schemas(
        HealthRes,
        BillingDefaultsRes,
        ResolveRangeReq,
        ResolveRangeRes,
        InvoiceTotalsReq,
        InvoiceTotalsRes,
        InvoiceDisplayRes,
        ReportPreviewReq,
        ReportRes,
        ReportRowRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router over the given configuration.
pub fn router(cfg: Arc<LabConfig>) -> Router {
    let state = AppState {
        calculator: InvoiceTotalsCalculator::new(cfg.billing()),
        cfg,
    };

    Router::new()
        .route("/health", get(health))
        .route("/billing/defaults", get(billing_defaults))
        .route("/reference-ranges/resolve", post(resolve_range))
        .route("/invoices/totals", post(invoice_totals))
        .route("/reports/preview", post(report_preview))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind `addr` and serve the REST router until the process stops.
///
/// # Errors
/// Returns an error if the address cannot be bound or the HTTP server fails while running.
pub async fn serve(addr: &str, cfg: Arc<LabConfig>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- LabDesk REST API listening on {}", listener.local_addr()?);
    axum::serve(listener, router(cfg)).await?;
    Ok(())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "LabDesk REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/billing/defaults",
    responses(
        (status = 200, description = "Configured billing defaults", body = BillingDefaultsRes)
    )
)]
/// Billing defaults used to seed invoice forms
#[axum::debug_handler]
async fn billing_defaults(State(state): State<AppState>) -> Json<BillingDefaultsRes> {
    Json(state.cfg.billing().into())
}

#[utoipa::path(
    post,
    path = "/reference-ranges/resolve",
    request_body = ResolveRangeReq,
    responses(
        (status = 200, description = "Resolved range", body = ResolveRangeRes),
        (status = 422, description = "Unsupported range shape")
    )
)]
/// Resolve a reference range for a patient
///
/// Unsupported range shapes are rejected during JSON extraction; anything that parses resolves
/// to a string, possibly empty.
#[axum::debug_handler]
async fn resolve_range(
    State(state): State<AppState>,
    Json(req): Json<ResolveRangeReq>,
) -> Json<ResolveRangeRes> {
    let resolver = ReferenceRangeResolver::new(req.labels.unwrap_or(state.cfg.label_style()));
    let range = resolver.resolve(req.range.as_ref(), &req.patient);

    Json(ResolveRangeRes {
        range,
        group: select_group(&req.patient).key().to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/invoices/totals",
    request_body = InvoiceTotalsReq,
    responses(
        (status = 200, description = "Invoice totals", body = InvoiceTotalsRes)
    )
)]
/// Calculate invoice totals
///
/// Omitted percentages and charges take the configured billing defaults.
#[axum::debug_handler]
async fn invoice_totals(
    State(state): State<AppState>,
    Json(req): Json<InvoiceTotalsReq>,
) -> Json<InvoiceTotalsRes> {
    let adjustments = InvoiceAdjustments {
        discount_percent: req.discount_percent,
        gst_percent: req.gst_percent,
        additional_charges: req.additional_charges,
    };
    let effective = adjustments.with_defaults(state.calculator.defaults());
    let totals = state.calculator.calculate(&req.items, &adjustments);

    Json(InvoiceTotalsRes::new(effective, totals))
}

#[utoipa::path(
    post,
    path = "/reports/preview",
    request_body = ReportPreviewReq,
    responses(
        (status = 200, description = "Lab report", body = ReportRes),
        (status = 400, description = "Bad request")
    )
)]
/// Assemble a lab report preview
///
/// # Errors
/// Returns `400 Bad Request` if `patient_name` is blank.
#[axum::debug_handler]
async fn report_preview(
    State(state): State<AppState>,
    Json(req): Json<ReportPreviewReq>,
) -> Result<Json<ReportRes>, (StatusCode, &'static str)> {
    let patient_name = match NonEmptyText::new(&req.patient_name) {
        Ok(name) => name,
        Err(e) => {
            tracing::error!("Invalid report request: {:?}", e);
            return Err((StatusCode::BAD_REQUEST, "patient_name is required"));
        }
    };

    let report = LabReport::build(
        patient_name.as_str(),
        &req.patient,
        &req.results,
        req.labels.unwrap_or(state.cfg.label_style()),
        Utc::now(),
    );

    Ok(Json(report.into()))
}
