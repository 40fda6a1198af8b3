use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::compliance::{ExportFormat, ExportOptions};
use super::domain::VendorId;
use super::repository::VendorRepository;
use super::trust::TrustScoreError;
use super::VendorIntelligence;

/// Router builder exposing the scoring endpoints over a shared engine.
pub fn vendor_router<R>(engine: Arc<VendorIntelligence<R>>) -> Router
where
    R: VendorRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/vendors/trust-scores",
            post(recompute_all_handler::<R>),
        )
        .route(
            "/api/v1/vendors/:vendor_id/trust-score",
            post(recompute_handler::<R>),
        )
        .route("/api/v1/vendors/risk", get(risk_handler::<R>))
        .route("/api/v1/vendors/risk/forecast", get(forecast_handler::<R>))
        .route("/api/v1/vendors/compliance", get(compliance_handler::<R>))
        .with_state(engine)
}

pub(crate) async fn recompute_handler<R>(
    State(engine): State<Arc<VendorIntelligence<R>>>,
    Path(vendor_id): Path<i64>,
) -> Response
where
    R: VendorRepository + 'static,
{
    let id = VendorId(vendor_id);
    let today = Local::now().date_naive();
    match engine.trust.recompute_vendor_score(id, today) {
        Ok(score) => (
            StatusCode::OK,
            axum::Json(json!({ "vendor_id": id, "trust_score": score })),
        )
            .into_response(),
        Err(err @ TrustScoreError::VendorNotFound(_)) => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
        Err(other) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": other.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn recompute_all_handler<R>(
    State(engine): State<Arc<VendorIntelligence<R>>>,
) -> Response
where
    R: VendorRepository + 'static,
{
    let today = Local::now().date_naive();
    match engine.trust.recompute_all(today) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn risk_handler<R>(State(engine): State<Arc<VendorIntelligence<R>>>) -> Response
where
    R: VendorRepository + 'static,
{
    let today = Local::now().date_naive();
    match engine.risk.assess_vendors(today) {
        Ok(assessed) => (StatusCode::OK, axum::Json(assessed)).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn forecast_handler<R>(
    State(engine): State<Arc<VendorIntelligence<R>>>,
) -> Response
where
    R: VendorRepository + 'static,
{
    let today = Local::now().date_naive();
    match engine.risk.predict_next_month(today) {
        Ok(forecast) => (StatusCode::OK, axum::Json(forecast)).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ComplianceQuery {
    days_ahead: Option<i64>,
    format: Option<ExportFormat>,
}

pub(crate) async fn compliance_handler<R>(
    State(engine): State<Arc<VendorIntelligence<R>>>,
    Query(query): Query<ComplianceQuery>,
) -> Response
where
    R: VendorRepository + 'static,
{
    let options = ExportOptions {
        days_ahead: query.days_ahead,
        format: query.format.unwrap_or_default(),
    };
    let today = Local::now().date_naive();

    match engine.compliance.generate(&options, today) {
        Ok(export) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, export.mime),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", export.filename),
                ),
            ],
            export.body,
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}
