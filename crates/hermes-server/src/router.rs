use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use hermes_protocol::endpoints;
use tower::Layer;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all Hermes endpoints.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(
            endpoints::INBOX,
            get(handler::get_inbox_handler).post(handler::create_notification_handler),
        )
        .route(endpoints::NOTIFICATION, get(handler::get_notification_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}

/// Wrap the router so `/v1/api/mailbox/alice/` and `/v1/api/mailbox/alice`
/// reach the same route. Path rewriting has to happen before routing, hence
/// outside the router.
pub fn build_app(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}
