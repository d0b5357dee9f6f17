use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Json, Response};
use hermes_inbox::{InboxResult, InboxService};
use hermes_protocol::{media_types, HealthResponse};
use serde::{Deserialize, Serialize};

use crate::context::ContextPolicy;
use crate::error::{ServerError, ServerResult};

/// State shared by every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: Arc<InboxService>,
    pub policy: ContextPolicy,
    pub request_timeout: Duration,
}

impl AppState {
    /// Run a service call on the blocking pool, bounded by the request
    /// deadline. A call that outlives the deadline keeps running to
    /// completion but its result is discarded.
    async fn run_blocking<T, F>(&self, f: F) -> ServerResult<T>
    where
        F: FnOnce(&InboxService) -> InboxResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let task = tokio::task::spawn_blocking(move || f(&service));
        match tokio::time::timeout(self.request_timeout, task).await {
            Err(_) => Err(ServerError::Timeout(self.request_timeout)),
            Ok(Err(e)) => Err(ServerError::Internal(format!("inbox task failed: {e}"))),
            Ok(Ok(result)) => result.map_err(ServerError::from),
        }
    }
}

/// A JSON body served as `application/ld+json`.
#[derive(Debug)]
pub struct LdJson<T>(pub T);

impl<T: Serialize> IntoResponse for LdJson<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(media_types::LD_JSON))],
                body,
            )
                .into_response(),
            Err(e) => ServerError::Internal(format!("cannot encode document: {e}")).into_response(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct InboxQuery {
    /// Resume the listing after this notification id.
    pub after: Option<String>,
}

/// Health check handler.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// `POST /v1/api/mailbox/:inbox_id`
pub async fn create_notification_handler(
    State(state): State<AppState>,
    Path(inbox_id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    body: Bytes,
) -> ServerResult<Response> {
    let ctx = state.policy.resolve(&headers, &uri)?;
    let location = state
        .run_blocking(move |svc| svc.create_notification(&inbox_id, &body, &ctx))
        .await?;
    let location = HeaderValue::try_from(location)
        .map_err(|e| ServerError::Internal(format!("location is not a valid header: {e}")))?;

    Ok((
        StatusCode::CREATED,
        [
            (header::LOCATION, location),
            (header::CONTENT_TYPE, HeaderValue::from_static(media_types::LD_JSON)),
        ],
    )
        .into_response())
}

/// `GET /v1/api/mailbox/:inbox_id`
pub async fn get_inbox_handler(
    State(state): State<AppState>,
    Path(inbox_id): Path<String>,
    Query(query): Query<InboxQuery>,
    headers: HeaderMap,
    uri: Uri,
) -> ServerResult<Response> {
    let ctx = state.policy.resolve(&headers, &uri)?;
    let doc = state
        .run_blocking(move |svc| svc.get_inbox(&inbox_id, query.after.as_deref(), &ctx))
        .await?;
    Ok(LdJson(doc).into_response())
}

/// `GET /v1/api/mailbox/:inbox_id/:notification_id`
pub async fn get_notification_handler(
    State(state): State<AppState>,
    Path((inbox_id, notification_id)): Path<(String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> ServerResult<Response> {
    let ctx = state.policy.resolve(&headers, &uri)?;
    let doc = state
        .run_blocking(move |svc| svc.get_notification(&inbox_id, &notification_id, &ctx))
        .await?;
    Ok(LdJson(doc).into_response())
}
