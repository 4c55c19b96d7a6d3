use crate::api::{bad_request, success_response};
use crate::logging::TraceId;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use cfo_finance::budget::{analyze_budget, BudgetAnalysis, BudgetItem};
use cfo_finance::forecast::{
    forecast_cash_flow, scenario_analysis, ForecastRow, ScenarioAnalysis,
    DEFAULT_OPTIMISTIC_MULTIPLIER, DEFAULT_PESSIMISTIC_MULTIPLIER,
};
use cfo_finance::kpi::{calculate_trend, Kpi, Trend};
use cfo_finance::metrics::{CashFlowItem, RunwayEstimate};
use cfo_finance::report::{financial_report, FinancialReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RunwayRequest {
    #[serde(default)]
    pub cash_balance: f64,
    #[serde(default)]
    pub monthly_burn: f64,
}

#[derive(Serialize, ToSchema)]
pub struct RunwayResponse {
    #[serde(flatten)]
    pub estimate: RunwayEstimate,
    pub calculated_at: DateTime<Utc>,
}

/// Cash runway in months; `runway_months` is null when burn is not positive.
#[utoipa::path(
    post,
    path = "/v1/finance/runway",
    tag = "Finance",
    request_body = RunwayRequest,
    responses(
        (status = 200, description = "Runway", body = RunwayResponse)
    )
)]
async fn calculate_runway(
    Extension(trace_id): Extension<TraceId>,
    Json(req): Json<RunwayRequest>,
) -> impl IntoResponse {
    success_response(
        StatusCode::OK,
        &trace_id,
        RunwayResponse {
            estimate: RunwayEstimate::new(req.cash_balance, req.monthly_burn),
            calculated_at: Utc::now(),
        },
    )
}

fn default_optimistic() -> f64 {
    DEFAULT_OPTIMISTIC_MULTIPLIER
}

fn default_pessimistic() -> f64 {
    DEFAULT_PESSIMISTIC_MULTIPLIER
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ScenarioRequest {
    #[serde(default)]
    pub base_case: BTreeMap<String, f64>,
    #[serde(default = "default_optimistic")]
    pub optimistic_multiplier: f64,
    #[serde(default = "default_pessimistic")]
    pub pessimistic_multiplier: f64,
}

#[derive(Serialize, ToSchema)]
pub struct ScenarioResponse {
    pub scenarios: ScenarioAnalysis,
    pub calculated_at: DateTime<Utc>,
}

/// Base, optimistic and pessimistic variants of a set of figures.
#[utoipa::path(
    post,
    path = "/v1/finance/scenarios",
    tag = "Finance",
    request_body = ScenarioRequest,
    responses(
        (status = 200, description = "Scenario analysis", body = ScenarioResponse),
        (status = 400, description = "Invalid multiplier", body = crate::api::ApiError)
    )
)]
async fn run_scenarios(
    Extension(trace_id): Extension<TraceId>,
    Json(req): Json<ScenarioRequest>,
) -> impl IntoResponse {
    match scenario_analysis(
        &req.base_case,
        req.optimistic_multiplier,
        req.pessimistic_multiplier,
    ) {
        Ok(scenarios) => success_response(
            StatusCode::OK,
            &trace_id,
            ScenarioResponse {
                scenarios,
                calculated_at: Utc::now(),
            },
        ),
        Err(e) => bad_request(&trace_id, &e.to_string()),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BudgetAnalyzeRequest {
    #[serde(default)]
    pub budget_items: Vec<BudgetItem>,
}

#[derive(Serialize, ToSchema)]
pub struct BudgetAnalyzeResponse {
    pub analysis: BudgetAnalysis,
    pub calculated_at: DateTime<Utc>,
}

/// Budget variance per category and overall.
#[utoipa::path(
    post,
    path = "/v1/finance/budget/analyze",
    tag = "Finance",
    request_body = BudgetAnalyzeRequest,
    responses(
        (status = 200, description = "Budget analysis", body = BudgetAnalyzeResponse)
    )
)]
async fn analyze_budget_handler(
    Extension(trace_id): Extension<TraceId>,
    Json(req): Json<BudgetAnalyzeRequest>,
) -> impl IntoResponse {
    success_response(
        StatusCode::OK,
        &trace_id,
        BudgetAnalyzeResponse {
            analysis: analyze_budget(&req.budget_items),
            calculated_at: Utc::now(),
        },
    )
}

fn default_forecast_months() -> u32 {
    12
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ForecastRequest {
    #[serde(default)]
    pub current_balance: f64,
    #[serde(default)]
    pub monthly_inflow: f64,
    #[serde(default)]
    pub monthly_outflow: f64,
    #[serde(default = "default_forecast_months")]
    pub months: u32,
}

#[derive(Serialize, ToSchema)]
pub struct ForecastResponse {
    pub forecast: Vec<ForecastRow>,
    pub parameters: ForecastRequest,
    pub calculated_at: DateTime<Utc>,
}

/// Month-by-month balance projection with constant flows.
#[utoipa::path(
    post,
    path = "/v1/finance/cash-flow/forecast",
    tag = "Finance",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "Forecast", body = ForecastResponse),
        (status = 400, description = "Horizon too long", body = crate::api::ApiError)
    )
)]
async fn forecast(
    Extension(trace_id): Extension<TraceId>,
    Json(req): Json<ForecastRequest>,
) -> impl IntoResponse {
    match forecast_cash_flow(
        req.current_balance,
        req.monthly_inflow,
        req.monthly_outflow,
        req.months,
    ) {
        Ok(rows) => success_response(
            StatusCode::OK,
            &trace_id,
            ForecastResponse {
                forecast: rows,
                parameters: req,
                calculated_at: Utc::now(),
            },
        ),
        Err(e) => bad_request(&trace_id, &e.to_string()),
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TrendRequest {
    /// Historical values, oldest first
    #[serde(default)]
    pub values: Vec<f64>,
}

/// Trend of the last value against the previous one.
#[utoipa::path(
    post,
    path = "/v1/finance/kpi/trend",
    tag = "Finance",
    request_body = TrendRequest,
    responses(
        (status = 200, description = "Trend", body = Trend)
    )
)]
async fn kpi_trend(
    Extension(trace_id): Extension<TraceId>,
    Json(req): Json<TrendRequest>,
) -> impl IntoResponse {
    success_response(StatusCode::OK, &trace_id, calculate_trend(&req.values))
}

fn default_report_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportRequest {
    /// Only `json` is produced
    #[serde(default = "default_report_format")]
    pub format: String,
    #[serde(default)]
    pub budget_items: Vec<BudgetItem>,
    #[serde(default)]
    pub cash_flow_items: Vec<CashFlowItem>,
    #[serde(default)]
    pub kpis: Vec<Kpi>,
}

#[derive(Serialize, ToSchema)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub report: FinancialReport,
    /// Unresolved alert events at generation time
    pub active_alerts: usize,
    pub generated_at: DateTime<Utc>,
}

/// Budget analysis, KPI list and cash-flow totals in one document.
#[utoipa::path(
    post,
    path = "/v1/finance/report",
    tag = "Finance",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Financial report", body = ReportResponse),
        (status = 400, description = "Unsupported format", body = crate::api::ApiError)
    )
)]
async fn export_report(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(req): Json<ReportRequest>,
) -> impl IntoResponse {
    if !req.format.eq_ignore_ascii_case("json") {
        return bad_request(
            &trace_id,
            &format!("Unsupported report format '{}'", req.format),
        );
    }

    let report = financial_report(&req.budget_items, &req.cash_flow_items, &req.kpis);
    let active_alerts = state.engine().active_events().len();
    tracing::info!(
        budget_items = req.budget_items.len(),
        cash_flow_items = req.cash_flow_items.len(),
        active_alerts,
        "Financial report generated"
    );
    success_response(
        StatusCode::OK,
        &trace_id,
        ReportResponse {
            report,
            active_alerts,
            generated_at: Utc::now(),
        },
    )
}

pub fn finance_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(calculate_runway))
        .routes(routes!(run_scenarios))
        .routes(routes!(analyze_budget_handler))
        .routes(routes!(forecast))
        .routes(routes!(kpi_trend))
        .routes(routes!(export_report))
}
