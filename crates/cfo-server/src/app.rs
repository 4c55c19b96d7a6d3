use crate::state::AppState;
use crate::{api, logging};
use axum::http::HeaderValue;
use axum::middleware;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CFO Helper API",
        description = "Financial metric alerts and CFO dashboard calculations",
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Alerts", description = "Metric evaluation, alert events and summaries"),
        (name = "Rules", description = "Alert rule management"),
        (name = "Notifications", description = "Notification delivery log"),
        (name = "Finance", description = "Financial calculations"),
        (name = "Data", description = "Sample data and validation")
    )
)]
struct ApiDoc;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

pub fn build_http_app(state: AppState) -> Router {
    let (router, spec) = api::routes().split_for_parts();

    let mut doc = ApiDoc::openapi();
    doc.merge(spec);

    let cors = cors_layer(&state.config.cors_allowed_origins);

    router
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/v1/openapi.json", doc))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}
