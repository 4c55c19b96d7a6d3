use crate::api::pagination::PaginationParams;
use crate::api::success_paginated_response;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use cfo_notify::manager::DeliveryRecord;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Recent notification deliveries, newest first. The log is bounded by
/// `notification.delivery_log_capacity`.
#[utoipa::path(
    get,
    path = "/v1/notifications/logs",
    tag = "Notifications",
    params(PaginationParams),
    responses(
        (status = 200, description = "Delivery log", body = Vec<DeliveryRecord>)
    )
)]
async fn list_notification_logs(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let items: Vec<DeliveryRecord> = state
        .engine()
        .notifier()
        .deliveries()
        .rev()
        .cloned()
        .collect();
    success_paginated_response(
        StatusCode::OK,
        &trace_id,
        items,
        pagination.limit(),
        pagination.offset(),
    )
}

pub fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_notification_logs))
}
