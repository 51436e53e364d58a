//! HTTP surface.
//!
//! - `GET /cal/{id}` renders the agenda for one user as `text/plain`
//! - `GET /healthz` returns `ok`

use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Deserializer, de};
use termcal_core::RenderRequest;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::error::{CredentialError, ServerError};
use crate::handler::RenderService;

/// Query options accepted by the render route. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    pub limit: Option<i64>,
    pub tz: Option<String>,
    #[serde(rename = "allDay", default, deserialize_with = "lenient_bool")]
    pub all_day: Option<bool>,
    pub highlights: Option<String>,
    pub exclude: Option<String>,
    pub width: Option<i64>,
    #[serde(rename = "noColor", default, deserialize_with = "lenient_bool")]
    pub no_color: Option<bool>,
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse_bool(&raw)
                .ok_or_else(|| de::Error::invalid_value(de::Unexpected::Str(&raw), &"a boolean"))
        })
        .transpose()
}

impl RenderQuery {
    /// Merges the supplied options over the request defaults.
    pub fn into_request(self, user_id: impl Into<String>) -> RenderRequest {
        let mut request = RenderRequest::new(user_id);
        if let Some(limit) = self.limit {
            request = request.with_max_results(limit);
        }
        if let Some(tz) = self.tz {
            request = request.with_time_zone(tz);
        }
        if let Some(all_day) = self.all_day {
            request = request.with_all_day(all_day);
        }
        if let Some(highlights) = self.highlights {
            request = request.with_highlights(highlights);
        }
        if let Some(exclude) = self.exclude {
            request = request.with_exclude(exclude);
        }
        if let Some(width) = self.width {
            request = request.with_max_width(width);
        }
        if let Some(no_color) = self.no_color {
            request = request.with_color(!no_color);
        }
        request
    }
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Render(_) => StatusCode::BAD_REQUEST,
            Self::Credential(CredentialError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Credential(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamFetch(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Store(_) | Self::Config { .. } | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "render failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "render rejected");
        }
        (status, format!("{}\n", self)).into_response()
    }
}

async fn render_agenda(
    State(service): State<Arc<RenderService>>,
    Path(id): Path<String>,
    Query(query): Query<RenderQuery>,
) -> Result<String, ServerError> {
    service.render(query.into_request(id)).await
}

async fn healthz() -> &'static str {
    "ok"
}

/// Builds the application router.
pub fn app(service: Arc<RenderService>) -> Router {
    Router::new()
        .route("/cal/{id}", get(render_agenda))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
