use std::sync::Arc;
use axum::{routing::post, Router, Json};
use axum::body::Bytes;
use tower_http::cors::{CorsLayer, Any};
use serde::{Deserialize, Serialize};
use axum::http::StatusCode;
use tracing::{info, warn};
use crate::binding::{lenient_rows, ResultRow, Results};
use crate::error::{Result, SparqlineError};
use crate::settings::Settings;
use crate::view::{merge_options, Display, TimelineMount, TimelineOptions, VisItem, VisRenderer, FALLBACK_TEXT};

/// Either a whole SPARQL results document or a bare `bindings` array,
/// optionally with widget options.
#[derive(Debug, Default, Deserialize)]
pub struct TimelineRequest {
    #[serde(default)]
    pub results: Option<Results>,
    #[serde(default, deserialize_with = "lenient_rows")]
    pub bindings: Option<Vec<ResultRow>>,
    #[serde(default)]
    pub options: Option<TimelineOptions>,
}

impl TimelineRequest {
    pub fn into_parts(self) -> (Option<Vec<ResultRow>>, Option<TimelineOptions>) {
        let rows = self.bindings.or_else(|| self.results.and_then(|r| r.bindings));
        (rows, self.options)
    }
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub status: String,
    pub elapsed_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<VisItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<TimelineOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of rendering one batch with the vis-timeline renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Fallback,
    Timeline { items: Vec<VisItem>, options: TimelineOptions },
}

/// Runs `rows` through a fresh mount. Configured options sit between the
/// defaults and the request options.
pub fn render(settings: &Settings, rows: Option<&[ResultRow]>, options: Option<&TimelineOptions>) -> Result<Rendered> {
    let options = settings.timeline_options_with(options);
    let mut mount = TimelineMount::new(VisRenderer);
    let rendered = match mount.update(rows, Some(&options))? {
        Display::Fallback(_) => Rendered::Fallback,
        Display::Blank => Rendered::Timeline { items: Vec::new(), options: merge_options(Some(&options)) },
        Display::Timeline { .. } => match mount.widget() {
            Some(widget) => {
                let payload = widget.payload();
                Rendered::Timeline { items: payload.items.clone(), options: payload.options.clone() }
            }
            None => Rendered::Fallback,
        },
    };
    Ok(rendered)
}

/// Decodes a request body and renders it.
pub fn respond(settings: &Settings, body: &[u8]) -> (StatusCode, TimelineResponse) {
    let started = std::time::Instant::now();
    let outcome = serde_json::from_slice::<TimelineRequest>(body)
        .map_err(SparqlineError::from)
        .and_then(|req| {
            let (rows, options) = req.into_parts();
            render(settings, rows.as_deref(), options.as_ref())
        });
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    match outcome {
        Ok(Rendered::Timeline { items, options }) => {
            info!(ms=elapsed_ms, items=items.len(), "timeline rendered");
            (StatusCode::OK, TimelineResponse { status: "ok".into(), elapsed_ms, items: Some(items), options: Some(options), message: None, error: None })
        }
        Ok(Rendered::Fallback) => {
            info!(ms=elapsed_ms, "no timeline data");
            (StatusCode::OK, TimelineResponse { status: "empty".into(), elapsed_ms, items: None, options: None, message: Some(FALLBACK_TEXT.into()), error: None })
        }
        Err(e) => {
            let msg = format!("{e}");
            warn!(%msg, "rejected request");
            (StatusCode::BAD_REQUEST, TimelineResponse { status: "error".into(), elapsed_ms, items: None, options: None, message: None, error: Some(msg) })
        }
    }
}

pub fn router(settings: Arc<Settings>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::POST])
        .allow_headers(Any);
    Router::new()
        .route("/v1/timeline", post(move |body: Bytes| {
            let settings = Arc::clone(&settings);
            async move {
                let (status, response) = respond(&settings, &body);
                (status, Json(response))
            }
        }))
        .layer(cors)
}

pub async fn serve(settings: Settings) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(settings.listen.as_str()).await?;
    info!(listen=%settings.listen, "serving timelines");
    axum::serve(listener, router(Arc::new(settings))).await?;
    Ok(())
}
