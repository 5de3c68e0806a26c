//! Logs each message in before() and the outcome in after(); always continues.

use async_trait::async_trait;
use talker_core::{Handler, HandlerResponse, Message, Result};
use tracing::{debug, info, instrument};

pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        info!(
            user_id = message.user.id,
            chat_id = message.chat.id,
            username = %message.user.username.as_deref().unwrap_or("unknown"),
            message_content = %message.content,
            "Received message"
        );
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        match response {
            HandlerResponse::Reply(text) => info!(
                chat_id = message.chat.id,
                reply_len = text.chars().count(),
                "Replied"
            ),
            other => debug!(chat_id = message.chat.id, response = ?other, "Processed message"),
        }
        Ok(())
    }
}
