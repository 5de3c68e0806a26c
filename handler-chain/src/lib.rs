//! # Handler chain
//!
//! Runs the Talker handlers for each incoming message. Every handler has optional
//! before/handle/after hooks: all `before` run in order (any `false` stops the chain), then `handle`
//! runs until a handler answers Stop or Reply, then all `after` run in reverse order with the final
//! response. An error from any hook aborts the chain and is returned to the caller (the webhook
//! turns it into an HTTP 500).

use std::sync::Arc;
use talker_core::{Handler, HandlerResponse, Message, Result};
use tracing::{debug, error, info, instrument};

/// Ordered list of handlers driven per message.
#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

fn response_kind(response: &HandlerResponse) -> (&'static str, Option<usize>) {
    match response {
        HandlerResponse::Continue => ("Continue", None),
        HandlerResponse::Stop => ("Stop", None),
        HandlerResponse::Ignore => ("Ignore", None),
        HandlerResponse::Reply(text) => ("Reply", Some(text.len())),
    }
}

impl HandlerChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs before (all) → handle (until Stop/Reply) → after (reverse). Returns the final response,
    /// or Continue when no handler claimed the message.
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, user_id = message.user.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(message_id = %message.id, "step: handler_chain started");

        for h in &self.handlers {
            let name = h.name();
            let should_continue = h.before(message).await.map_err(|e| {
                error!(handler = %name, error = %e, "step: handler before failed");
                e
            })?;
            if !should_continue {
                info!(handler = %name, "step: before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for h in &self.handlers {
            let name = h.name();
            let response = h.handle(message).await.map_err(|e| {
                error!(handler = %name, error = %e, "step: handler handle failed");
                e
            })?;
            let (kind, reply_len) = response_kind(&response);
            debug!(handler = %name, response_type = %kind, reply_len = ?reply_len, "step: handler handle done");

            if matches!(response, HandlerResponse::Stop | HandlerResponse::Reply(_)) {
                info!(handler = %name, response_type = %kind, "step: handler chain claimed by handler");
                final_response = response;
                break;
            }
        }

        for h in self.handlers.iter().rev() {
            let name = h.name();
            h.after(message, &final_response).await.map_err(|e| {
                error!(handler = %name, error = %e, "step: handler after failed");
                e
            })?;
        }

        info!(message_id = %message.id, "step: handler_chain finished");
        Ok(final_response)
    }
}

// Tests live in tests/handler_chain_test.rs
