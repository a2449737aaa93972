//! API router. Routes are nested under `/api/`.

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the API router.
///
/// Responses carry patient data, so every response is marked `no-store`.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/triage", post(endpoints::triage::assess))
        .route("/hospitals/ranking", get(endpoints::hospitals::ranking))
        .route("/emergency", post(endpoints::emergency::trigger))
        .route("/incidents", get(endpoints::incidents::list))
        .route("/incidents/:id", get(endpoints::incidents::detail))
        .with_state(ctx)
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new().nest("/api", api)
}
