//! Integration tests for [`handler_chain::HandlerChain`].
//!
//! Covers: before/handle/after ordering, before stopping the chain, Reply ending the handle phase and
//! reaching every after hook, Ignore/Continue falling through, and errors aborting the chain.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use handler_chain::HandlerChain;
use talker_core::{BotError, Chat, Handler, HandlerResponse, Message, User};

fn create_test_message(content: &str) -> Message {
    Message {
        id: "test_message_id".to_string(),
        content: content.to_string(),
        user: User {
            id: 123,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 456,
            chat_type: "private".to_string(),
        },
        created_at: Utc::now(),
    }
}

/// Records every hook call as "<hook>_<name>" and answers `handle` with a fixed response.
struct RecordingHandler {
    name: &'static str,
    response: HandlerResponse,
    log: Arc<Mutex<Vec<String>>>,
}

impl RecordingHandler {
    fn new(name: &'static str, response: HandlerResponse, log: Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self { name, response, log })
    }
}

#[async_trait]
impl Handler for RecordingHandler {
    async fn before(&self, _message: &Message) -> talker_core::Result<bool> {
        self.log.lock().unwrap().push(format!("before_{}", self.name));
        Ok(true)
    }

    async fn handle(&self, _message: &Message) -> talker_core::Result<HandlerResponse> {
        self.log.lock().unwrap().push(format!("handle_{}", self.name));
        Ok(self.response.clone())
    }

    async fn after(&self, _message: &Message, response: &HandlerResponse) -> talker_core::Result<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("after_{}:{:?}", self.name, response));
        Ok(())
    }
}

#[tokio::test]
async fn test_empty_chain_returns_continue() {
    let chain = HandlerChain::new();
    assert!(chain.is_empty());
    let result = chain.handle(&create_test_message("hi")).await.unwrap();
    assert_eq!(result, HandlerResponse::Continue);
}

/// **Test: before runs first→last, handle stops at the first Reply, after runs last→first with the reply.**
#[tokio::test]
async fn test_reply_ends_handle_phase_and_reaches_after_in_reverse() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(RecordingHandler::new("logging", HandlerResponse::Continue, log.clone()))
        .add_handler(RecordingHandler::new(
            "talk",
            HandlerResponse::Reply("Oink!".to_string()),
            log.clone(),
        ))
        .add_handler(RecordingHandler::new("never", HandlerResponse::Stop, log.clone()));
    assert_eq!(chain.len(), 3);

    let result = chain.handle(&create_test_message("hello")).await.unwrap();

    assert_eq!(result, HandlerResponse::Reply("Oink!".to_string()));
    let executed = log.lock().unwrap();
    assert_eq!(
        *executed,
        vec![
            "before_logging",
            "before_talk",
            "before_never",
            "handle_logging",
            "handle_talk",
            "after_never:Reply(\"Oink!\")",
            "after_talk:Reply(\"Oink!\")",
            "after_logging:Reply(\"Oink!\")",
        ]
    );
}

/// **Test: Ignore and Continue fall through to the next handler.**
#[tokio::test]
async fn test_ignore_and_continue_fall_through() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(RecordingHandler::new("a", HandlerResponse::Ignore, log.clone()))
        .add_handler(RecordingHandler::new("b", HandlerResponse::Continue, log.clone()))
        .add_handler(RecordingHandler::new("c", HandlerResponse::Stop, log.clone()));

    let result = chain.handle(&create_test_message("x")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    let handled: Vec<String> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|s| s.starts_with("handle_"))
        .cloned()
        .collect();
    assert_eq!(handled, vec!["handle_a", "handle_b", "handle_c"]);
}

/// **Test: before returning false stops the chain; handle and after are not run.**
#[tokio::test]
async fn test_before_false_stops_chain() {
    struct BlockingHandler;

    #[async_trait]
    impl Handler for BlockingHandler {
        async fn before(&self, _message: &Message) -> talker_core::Result<bool> {
            Ok(false)
        }
    }

    let log = Arc::new(Mutex::new(Vec::new()));
    let chain = HandlerChain::new()
        .add_handler(Arc::new(BlockingHandler))
        .add_handler(RecordingHandler::new("talk", HandlerResponse::Continue, log.clone()));

    let result = chain.handle(&create_test_message("test")).await.unwrap();

    assert_eq!(result, HandlerResponse::Stop);
    assert!(log.lock().unwrap().is_empty());
}

/// **Test: an error from handle aborts the chain and is returned; after hooks are skipped.**
#[tokio::test]
async fn test_handle_error_propagates() {
    struct FailingHandler;

    #[async_trait]
    impl Handler for FailingHandler {
        async fn handle(&self, _message: &Message) -> talker_core::Result<HandlerResponse> {
            Err(BotError::Database("write failed".to_string()))
        }
    }

    let after_count = Arc::new(AtomicUsize::new(0));

    struct CountingAfter(Arc<AtomicUsize>);

    #[async_trait]
    impl Handler for CountingAfter {
        async fn after(&self, _message: &Message, _response: &HandlerResponse) -> talker_core::Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    let chain = HandlerChain::new()
        .add_handler(Arc::new(CountingAfter(after_count.clone())))
        .add_handler(Arc::new(FailingHandler));

    let result = chain.handle(&create_test_message("boom")).await;

    assert!(matches!(result, Err(BotError::Database(_))));
    assert_eq!(after_count.load(Ordering::SeqCst), 0);
}
