//! HTTP boundary: the logging client posts positions to `/tracking/`, the map page polls
//! `/live/` for the current flight.
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use headers::{authorization::Basic, Authorization, HeaderMapExt};

use crate::config::{AuthConfig, ServerConfig};
use crate::parser;
use crate::service::{IngestError, IngestionService};

pub const REALM: &str = "xplogd-web";

#[derive(Clone)]
pub struct AppState {
    service: std::sync::Arc<IngestionService>,
    auth: std::sync::Arc<AuthConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(service: IngestionService, auth: AuthConfig) -> Self {
        AppState {
            service: std::sync::Arc::new(service),
            auth: std::sync::Arc::new(auth),
        }
    }

    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .typed_get::<Authorization<Basic>>()
            .is_some_and(|credentials| {
                credentials.username() == self.auth.username
                    && credentials.password() == self.auth.password
            })
    }
}

pub fn build_router(state: AppState, static_dir: Option<&std::path::Path>) -> Router {
    let mut router = Router::new()
        .route("/tracking/", post(tracking_handler))
        .route("/live/", get(live_handler))
        .with_state(state);

    if let Some(dir) = static_dir {
        router = router.nest_service("/static", tower_http::services::ServeDir::new(dir));
    }
    router
}

pub async fn serve(config: &ServerConfig, router: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.address).await?;
    log::info!("Serving http://{}", listener.local_addr()?);
    axum::serve(listener, router).await
}

async fn tracking_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if !state.is_authorized(&headers) {
        log::warn!("Rejected unauthorized tracking request");
        return (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, format!("Basic realm=\"{REALM}\""))],
        )
            .into_response();
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    if content_type != Some(parser::CONTENT_TYPE) {
        log::warn!("Rejected tracking request with content type {content_type:?}");
        return StatusCode::BAD_REQUEST.into_response();
    }

    match state.service.ingest(&body).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(IngestError::Decode(err)) => {
            log::warn!("Rejected payload: {err}");
            StatusCode::BAD_REQUEST.into_response()
        }
        Err(IngestError::Store(err)) => {
            log::error!("Failed to store position: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn live_handler(State(state): State<AppState>) -> Response {
    match state.service.query_active(chrono::Utc::now()).await {
        Ok(Some(position)) => Json(position).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(err) => {
            log::error!("Failed to query active position: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
