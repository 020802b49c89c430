//! Unit tests for LoggingHandler and AuthHandler.

use super::{sample_callback, sample_message};
use crate::core::{BotError, Handler, HandlerError, HandlerResponse};
use crate::handlers::{AuthHandler, LoggingHandler};

#[tokio::test]
async fn test_logging_handler_before_continues() {
    let h = LoggingHandler;
    assert!(h.before(&sample_message(1, "dune")).await.unwrap());
    assert!(h.before(&sample_callback(1, "dl:abcd1234:0")).await.unwrap());
}

#[tokio::test]
async fn test_logging_handler_after_ok() {
    let h = LoggingHandler;
    let response = HandlerResponse::Reply("Dune.pdf".to_string());
    assert!(h.after(&sample_message(1, "dune"), &response).await.is_ok());
}

#[tokio::test]
async fn test_auth_handler_allowed_user_continues() {
    let h = AuthHandler::new(vec![100, 200]);
    assert!(h.before(&sample_message(100, "dune")).await.unwrap());
}

#[tokio::test]
async fn test_auth_handler_unauthorized_returns_err() {
    let h = AuthHandler::new(vec![100, 200]);
    let result = h.before(&sample_callback(999, "dl:abcd1234:0")).await;
    assert!(matches!(
        result.unwrap_err(),
        BotError::Handler(HandlerError::Unauthorized)
    ));
}
