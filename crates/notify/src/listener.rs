//! HTTP endpoint receiving problem notifications.
//!
//! Every request is handled on its own; the only shared state is the
//! immutable [`ListenerState`].

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use tracing::{info, warn};

use crate::problems::DefaultNotification;
use crate::traits::{Handler, ProblemEvent, ProblemSource};

pub struct ListenerState {
    pub source: Arc<dyn ProblemSource>,
    pub handler: Arc<dyn Handler>,
    /// Log rejected requests and full payloads.
    pub verbose: bool,
}

/// Build the listener router: a single `/` route accepting any method.
pub fn router(state: Arc<ListenerState>) -> Router {
    Router::new().route("/", any(receive)).with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: &str, state: Arc<ListenerState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening for incoming problem notifications");
    axum::serve(listener, router(state)).await
}

fn reject(state: &ListenerState, status: StatusCode, reason: &str) -> Response {
    if state.verbose {
        warn!(%status, reason, "rejecting notification");
    }
    let text = status.canonical_reason().unwrap_or("Error");
    (status, format!("{text}: {reason}")).into_response()
}

/// `application/json`, optionally followed by parameters such as a charset.
fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"))
}

async fn receive(
    State(state): State<Arc<ListenerState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method != Method::POST {
        return reject(&state, StatusCode::METHOD_NOT_ALLOWED, "only POST is accepted");
    }
    if body.is_empty() {
        return reject(&state, StatusCode::BAD_REQUEST, "missing request body");
    }
    if !is_json(&headers) {
        return reject(
            &state,
            StatusCode::BAD_REQUEST,
            "expected content-type 'application/json'",
        );
    }

    let notification: DefaultNotification = match serde_json::from_slice(&body) {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "notification body is not valid JSON");
            return reject(&state, StatusCode::BAD_REQUEST, "malformed notification body");
        }
    };

    if notification.is_test_run() {
        info!("problem notification test run successful");
        return StatusCode::NO_CONTENT.into_response();
    }

    if state.verbose {
        info!(payload = ?notification, "received problem notification");
    }

    let Some(pid) = notification.pid().map(str::to_string) else {
        if state.verbose {
            warn!("received problem notification without PID");
        }
        return StatusCode::NO_CONTENT.into_response();
    };
    info!(%pid, "received problem notification");

    match state.source.problem(&pid).await {
        Ok(problem) => {
            let event = ProblemEvent {
                notification,
                problem,
            };
            state.handler.handle(event).await;
            tracing::debug!(%pid, handler = state.handler.name(), "problem event handled");
        }
        Err(e) => {
            warn!(%pid, error = %e, "querying for problem details failed");
        }
    }

    StatusCode::NO_CONTENT.into_response()
}
