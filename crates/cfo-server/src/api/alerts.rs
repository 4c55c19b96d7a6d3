use crate::api::pagination::{deserialize_optional_u64, PaginationParams};
use crate::api::{
    alert_error_response, bad_request, success_paginated_response, success_response,
};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cfo_common::types::{
    AlertEvent, AlertExport, AlertRule, AlertSummary, CheckMetricsRequest, SetRuleEnabledRequest,
    Severity,
};
use cfo_finance::snapshot::FinancialSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

// ---- Evaluation ----

#[derive(Serialize, ToSchema)]
pub struct CheckAlertsResponse {
    /// Events fired by this pass, in rule order
    pub triggered_alerts: Vec<AlertEvent>,
    pub alert_summary: AlertSummary,
    pub checked_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct SnapshotCheckResponse {
    /// Metrics derived from the snapshot and evaluated
    pub metrics: HashMap<String, f64>,
    pub triggered_alerts: Vec<AlertEvent>,
    pub alert_summary: AlertSummary,
    pub checked_at: DateTime<Utc>,
}

/// Evaluate every enabled rule against the supplied metrics.
#[utoipa::path(
    post,
    path = "/v1/alerts/check",
    tag = "Alerts",
    request_body = CheckMetricsRequest,
    responses(
        (status = 200, description = "Evaluation result", body = CheckAlertsResponse)
    )
)]
async fn check_alerts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(req): Json<CheckMetricsRequest>,
) -> impl IntoResponse {
    let (triggered_alerts, alert_summary) = {
        let mut engine = state.engine();
        let fired = engine.evaluate(&req.current_metrics, req.historical_metrics.as_ref());
        (fired, engine.summary())
    };
    tracing::info!(
        metrics = req.current_metrics.len(),
        fired = triggered_alerts.len(),
        "Alert check completed"
    );
    success_response(
        StatusCode::OK,
        &trace_id,
        CheckAlertsResponse {
            triggered_alerts,
            alert_summary,
            checked_at: Utc::now(),
        },
    )
}

/// Derive alert metrics from raw financial inputs, then evaluate them.
#[utoipa::path(
    post,
    path = "/v1/alerts/check/snapshot",
    tag = "Alerts",
    request_body = FinancialSnapshot,
    responses(
        (status = 200, description = "Derived metrics and evaluation result", body = SnapshotCheckResponse)
    )
)]
async fn check_snapshot(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(snapshot): Json<FinancialSnapshot>,
) -> impl IntoResponse {
    let metrics = snapshot.alert_metrics();
    let (triggered_alerts, alert_summary) = {
        let mut engine = state.engine();
        let fired = engine.evaluate(&metrics, None);
        (fired, engine.summary())
    };
    success_response(
        StatusCode::OK,
        &trace_id,
        SnapshotCheckResponse {
            metrics,
            triggered_alerts,
            alert_summary,
            checked_at: Utc::now(),
        },
    )
}

// ---- Summary & events ----

/// Alert system summary.
#[utoipa::path(
    get,
    path = "/v1/alerts/summary",
    tag = "Alerts",
    responses(
        (status = 200, description = "Rule and event counts", body = AlertSummary)
    )
)]
async fn alert_summary(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let summary = state.engine().summary();
    success_response(StatusCode::OK, &trace_id, summary)
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct ActiveAlertsParams {
    /// Exact severity (low / medium / high / critical)
    #[param(required = false, rename = "severity__eq")]
    #[serde(rename = "severity__eq")]
    severity_eq: Option<String>,
    /// Exact rule id
    #[param(required = false, rename = "rule_id__eq")]
    #[serde(rename = "rule_id__eq")]
    rule_id_eq: Option<String>,
    #[param(required = false)]
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    limit: Option<u64>,
    #[param(required = false)]
    #[serde(default, deserialize_with = "deserialize_optional_u64")]
    offset: Option<u64>,
}

/// Unresolved events in firing order.
#[utoipa::path(
    get,
    path = "/v1/alerts/active",
    tag = "Alerts",
    params(ActiveAlertsParams),
    responses(
        (status = 200, description = "Active events", body = Vec<AlertEvent>),
        (status = 400, description = "Unknown severity", body = crate::api::ApiError)
    )
)]
async fn active_alerts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<ActiveAlertsParams>,
) -> impl IntoResponse {
    let severity = match params.severity_eq.as_deref().map(str::parse::<Severity>) {
        Some(Ok(s)) => Some(s),
        Some(Err(e)) => return bad_request(&trace_id, &e),
        None => None,
    };

    let items: Vec<AlertEvent> = state
        .engine()
        .active_events()
        .into_iter()
        .filter(|e| severity.map_or(true, |s| e.severity == s))
        .filter(|e| {
            params
                .rule_id_eq
                .as_deref()
                .map_or(true, |id| e.rule_id == id)
        })
        .cloned()
        .collect();

    success_paginated_response(
        StatusCode::OK,
        &trace_id,
        items,
        PaginationParams::resolve_limit(params.limit),
        PaginationParams::resolve_offset(params.offset),
    )
}

/// Every logged event, newest first.
#[utoipa::path(
    get,
    path = "/v1/alerts/events",
    tag = "Alerts",
    params(PaginationParams),
    responses(
        (status = 200, description = "Event history", body = Vec<AlertEvent>)
    )
)]
async fn list_events(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
    let items: Vec<AlertEvent> = state.engine().events().all().iter().rev().cloned().collect();
    success_paginated_response(
        StatusCode::OK,
        &trace_id,
        items,
        pagination.limit(),
        pagination.offset(),
    )
}

#[utoipa::path(
    get,
    path = "/v1/alerts/events/{id}",
    tag = "Alerts",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = AlertEvent),
        (status = 404, description = "Event not found", body = crate::api::ApiError)
    )
)]
async fn get_event(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.engine().get_event(&id) {
        Ok(event) => success_response(StatusCode::OK, &trace_id, event.clone()),
        Err(e) => alert_error_response(&trace_id, &e),
    }
}

/// Mark an event as acknowledged.
#[utoipa::path(
    post,
    path = "/v1/alerts/events/{id}/acknowledge",
    tag = "Alerts",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Updated event", body = AlertEvent),
        (status = 404, description = "Event not found", body = crate::api::ApiError)
    )
)]
async fn acknowledge_event(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.engine().acknowledge(&id) {
        Ok(event) => success_response(StatusCode::OK, &trace_id, event.clone()),
        Err(e) => alert_error_response(&trace_id, &e),
    }
}

/// Mark an event as resolved (also acknowledges it).
#[utoipa::path(
    post,
    path = "/v1/alerts/events/{id}/resolve",
    tag = "Alerts",
    params(("id" = String, Path, description = "Event id")),
    responses(
        (status = 200, description = "Updated event", body = AlertEvent),
        (status = 404, description = "Event not found", body = crate::api::ApiError)
    )
)]
async fn resolve_event(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.engine().resolve(&id) {
        Ok(event) => success_response(StatusCode::OK, &trace_id, event.clone()),
        Err(e) => alert_error_response(&trace_id, &e),
    }
}

// ---- Rules ----

/// All rules in evaluation order.
#[utoipa::path(
    get,
    path = "/v1/alerts/rules",
    tag = "Rules",
    responses(
        (status = 200, description = "Rules", body = Vec<AlertRule>)
    )
)]
async fn list_rules(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let rules = state.engine().rules().rules().to_vec();
    success_response(StatusCode::OK, &trace_id, rules)
}

#[derive(Serialize, ToSchema)]
pub struct AddRuleResponse {
    pub rule: AlertRule,
    /// True when a rule with the same id was replaced
    pub replaced: bool,
}

/// Add a rule. A rule with the same id is replaced and moves to the end of
/// the evaluation order.
#[utoipa::path(
    post,
    path = "/v1/alerts/rules",
    tag = "Rules",
    request_body = AlertRule,
    responses(
        (status = 201, description = "Rule added", body = AddRuleResponse),
        (status = 200, description = "Existing rule replaced", body = AddRuleResponse),
        (status = 400, description = "Invalid rule", body = crate::api::ApiError)
    )
)]
async fn add_rule(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(mut rule): Json<AlertRule>,
) -> impl IntoResponse {
    // A posted rule always starts a fresh cooldown, even when copied from an export.
    rule.last_triggered = None;
    let stored = rule.clone();
    match state.engine().add_rule(rule) {
        Ok(replaced) => {
            let status = if replaced.is_some() {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            success_response(
                status,
                &trace_id,
                AddRuleResponse {
                    rule: stored,
                    replaced: replaced.is_some(),
                },
            )
        }
        Err(e) => alert_error_response(&trace_id, &e),
    }
}

#[utoipa::path(
    get,
    path = "/v1/alerts/rules/{id}",
    tag = "Rules",
    params(("id" = String, Path, description = "Rule id")),
    responses(
        (status = 200, description = "Rule", body = AlertRule),
        (status = 404, description = "Rule not found", body = crate::api::ApiError)
    )
)]
async fn get_rule(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.engine().get_rule(&id) {
        Ok(rule) => success_response(StatusCode::OK, &trace_id, rule.clone()),
        Err(e) => alert_error_response(&trace_id, &e),
    }
}

/// Remove a rule. Its past events stay in the log.
#[utoipa::path(
    delete,
    path = "/v1/alerts/rules/{id}",
    tag = "Rules",
    params(("id" = String, Path, description = "Rule id")),
    responses(
        (status = 200, description = "Removed rule", body = AlertRule),
        (status = 404, description = "Rule not found", body = crate::api::ApiError)
    )
)]
async fn delete_rule(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.engine().remove_rule(&id) {
        Ok(rule) => success_response(StatusCode::OK, &trace_id, rule),
        Err(e) => alert_error_response(&trace_id, &e),
    }
}

#[utoipa::path(
    put,
    path = "/v1/alerts/rules/{id}/enable",
    tag = "Rules",
    params(("id" = String, Path, description = "Rule id")),
    request_body = SetRuleEnabledRequest,
    responses(
        (status = 200, description = "Updated rule", body = AlertRule),
        (status = 404, description = "Rule not found", body = crate::api::ApiError)
    )
)]
async fn set_rule_enabled(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SetRuleEnabledRequest>,
) -> impl IntoResponse {
    match state.engine().set_rule_enabled(&id, req.enabled) {
        Ok(rule) => success_response(StatusCode::OK, &trace_id, rule.clone()),
        Err(e) => alert_error_response(&trace_id, &e),
    }
}

// ---- Export ----

/// Full dump of rules, events and the summary.
#[utoipa::path(
    get,
    path = "/v1/alerts/export",
    tag = "Alerts",
    responses(
        (status = 200, description = "Export document", body = AlertExport)
    )
)]
async fn export_alerts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let export = state.engine().export();
    success_response(StatusCode::OK, &trace_id, export)
}

pub fn alert_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(check_alerts))
        .routes(routes!(check_snapshot))
        .routes(routes!(alert_summary))
        .routes(routes!(active_alerts))
        .routes(routes!(list_events))
        .routes(routes!(get_event))
        .routes(routes!(acknowledge_event))
        .routes(routes!(resolve_event))
        .routes(routes!(list_rules, add_rule))
        .routes(routes!(get_rule, delete_rule))
        .routes(routes!(set_rule_enabled))
        .routes(routes!(export_alerts))
}
