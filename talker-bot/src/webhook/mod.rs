//! HTTP receiver: axum router with the Telegram webhook route and a health check.
//!
//! Each request runs the handler chain to completion before answering. Telegram retries non-2xx
//! answers, so only chain errors (storage, Bot API) produce a 500; malformed or uninteresting
//! updates are acknowledged with 200.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use handler_chain::HandlerChain;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::config::webhook::HEALTH_PATH;
use crate::telegram::{decode_update, to_core_message};

pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Shared by all requests.
pub struct WebhookState {
    pub chain: HandlerChain,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`; `None` disables the check.
    pub secret: Option<String>,
}

/// Router serving `webhook_path` (POST) and `/health` (GET).
pub fn router(state: Arc<WebhookState>, webhook_path: &str) -> Router {
    Router::new()
        .route(webhook_path, post(handle_update))
        .route(HEALTH_PATH, get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

fn secret_matches(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

async fn handle_update(
    State(state): State<Arc<WebhookState>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(expected) = state.secret.as_deref() {
        if !secret_matches(&headers, expected) {
            warn!("Webhook request with missing or wrong secret token");
            return StatusCode::UNAUTHORIZED;
        }
    }

    let update = match decode_update(&body) {
        Ok(update) => update,
        Err(e) => {
            warn!(error = %e, body_len = body.len(), "Ignoring malformed update");
            return StatusCode::OK;
        }
    };

    let Some(message) = to_core_message(&update) else {
        debug!(update_id = update.id.0, "Ignoring non-text update");
        return StatusCode::OK;
    };

    info!(
        update_id = update.id.0,
        chat_id = message.chat.id,
        user_id = message.user.id,
        message_id = %message.id,
        "step: processing update"
    );

    match state.chain.handle(&message).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            error!(error = %e, chat_id = message.chat.id, "Handler chain failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
