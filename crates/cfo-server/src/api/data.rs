use crate::api::success_response;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cfo_finance::dataset::{sample_dataset, validate, DatasetRecords, FinancialDataset, ValidationReport};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Built-in sample budget, cash-flow and KPI data.
#[utoipa::path(
    get,
    path = "/v1/data/sample",
    tag = "Data",
    responses(
        (status = 200, description = "Sample dataset", body = FinancialDataset)
    )
)]
async fn sample_data(Extension(trace_id): Extension<TraceId>) -> impl IntoResponse {
    success_response(StatusCode::OK, &trace_id, sample_dataset())
}

/// Check a dataset for missing or inconsistent fields.
#[utoipa::path(
    post,
    path = "/v1/data/validate",
    tag = "Data",
    request_body = DatasetRecords,
    responses(
        (status = 200, description = "Validation errors and warnings", body = ValidationReport)
    )
)]
async fn validate_data(
    Extension(trace_id): Extension<TraceId>,
    Json(records): Json<DatasetRecords>,
) -> impl IntoResponse {
    let report = validate(&records);
    if !report.is_valid() {
        tracing::debug!(errors = report.errors.len(), "Dataset failed validation");
    }
    success_response(StatusCode::OK, &trace_id, report)
}

pub fn data_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(sample_data))
        .routes(routes!(validate_data))
}
