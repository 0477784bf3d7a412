//! HTTP server: document, event stream, JSON tree and static assets

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response, Sse};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use futures_util::StreamExt;
use serde_json::json;
use tokio::net::TcpListener;

use logtree_app::{Settings, ViewState, ViewerSession};
use logtree_core::prelude::*;

use crate::assets::{CLIENT_JS, STYLE_CSS};
use crate::render::{render_document, render_no_source_page, PageContext};
use crate::sse::{live_events, to_sse_event};

pub const EVENTS_PATH: &str = "/events";

/// Shared by every handler
#[derive(Debug, Clone)]
pub struct WebState {
    session: Arc<ViewerSession>,
    title: Arc<str>,
    storage_key: Arc<str>,
    keepalive: Duration,
}

impl WebState {
    pub fn new(session: Arc<ViewerSession>, settings: &Settings) -> Self {
        let source = session
            .source()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let storage_key = ViewState::storage_key(&settings.ui.storage_key, &source);
        Self {
            session,
            title: Arc::from(settings.ui.title.as_str()),
            storage_key: Arc::from(storage_key.as_str()),
            keepalive: Duration::from_secs(settings.server.keepalive_secs),
        }
    }

    /// Override the keep-alive interval
    pub fn with_keepalive(mut self, keepalive: Duration) -> Self {
        self.keepalive = keepalive;
        self
    }

    pub fn session(&self) -> &Arc<ViewerSession> {
        &self.session
    }
}

pub fn build_router(state: WebState) -> Router {
    Router::new()
        .route("/", get(document_handler))
        .route(EVENTS_PATH, get(events_handler))
        .route("/api/tree", get(tree_handler))
        .route("/static/style.css", get(stylesheet_handler))
        .route("/static/client.js", get(client_script_handler))
        .with_state(state)
}

/// Serve until the listener fails
pub async fn serve(listener: TcpListener, state: WebState) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Serving on http://{}", addr);
    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| Error::server(format!("Server failed: {}", e)))
}

fn error_response(error: &Error) -> Response {
    if error.is_recoverable() {
        warn!("Request failed: {}", error);
    } else {
        error!("Request failed: {:?}", error);
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        error.to_string(),
    )
        .into_response()
}

async fn document_handler(State(state): State<WebState>) -> Response {
    let snapshot = match state.session.snapshot(Utc::now()).await {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            return match render_no_source_page(&state.title) {
                Ok(html) => Html(html).into_response(),
                Err(e) => error_response(&e),
            };
        }
        Err(e) => return error_response(&e),
    };

    let source_label = state
        .session
        .source()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let page = PageContext {
        title: &state.title,
        storage_key: &state.storage_key,
        source_label: &source_label,
        events_url: EVENTS_PATH,
    };

    match render_document(&snapshot, &page) {
        Ok(html) => {
            debug!(
                "Rendered generation {} ({} bytes)",
                snapshot.generation,
                html.len()
            );
            Html(html).into_response()
        }
        Err(e) => error_response(&e),
    }
}

async fn events_handler(State(state): State<WebState>) -> impl IntoResponse {
    debug!("Viewer connected ({} total)", state.session.viewer_count() + 1);
    let stream = live_events(Arc::clone(&state.session), state.keepalive).map(to_sse_event);
    Sse::new(stream)
}

async fn tree_handler(State(state): State<WebState>) -> Response {
    match state.session.snapshot(Utc::now()).await {
        Ok(Some(snapshot)) => Json(json!({
            "generation": snapshot.generation,
            "windowMinutes": snapshot.window.minutes(),
            "stats": snapshot.stats,
            "entries": &snapshot.forest,
        }))
        .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "No log file configured",
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn stylesheet_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

async fn client_script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        CLIENT_JS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use logtree_core::TimeWindow;

    #[test]
    fn test_web_state_storage_key_per_source() {
        let settings = Settings::default();
        let session = Arc::new(ViewerSession::new(
            Some("/var/log/app.log".into()),
            TimeWindow::default(),
        ));
        let state = WebState::new(session, &settings);
        assert_eq!(&*state.storage_key, "logtree.viewState:/var/log/app.log");
        assert_eq!(state.keepalive, Duration::from_secs(30));
    }

    #[test]
    fn test_with_keepalive_override() {
        let session = Arc::new(ViewerSession::new(None, TimeWindow::default()));
        let state = WebState::new(session, &Settings::default())
            .with_keepalive(Duration::from_millis(50));
        assert_eq!(state.keepalive, Duration::from_millis(50));
    }

    #[test]
    fn test_error_response_is_plain_text_500() {
        let response = error_response(&Error::source_unavailable("/nope.log", "not found"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_error_response_for_unexpected_failure() {
        let response = error_response(&Error::server("listener gone"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
