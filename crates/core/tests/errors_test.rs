use std::error::Error;
use ppbot_core::errors::{BotError, BotResult};

#[test]
fn test_bot_error_display() {
    let not_found = BotError::NotFound("item Golden Banana".to_string());
    let validation = BotError::Validation("You don't have any Shrink Ray!".to_string());
    let database = BotError::Database(eyre::eyre!("connection refused"));
    let internal = BotError::Internal(Box::new(std::io::Error::other("gateway closed")));

    assert_eq!(not_found.to_string(), "Resource not found: item Golden Banana");
    // Validation messages are shown to users verbatim.
    assert_eq!(validation.to_string(), "You don't have any Shrink Ray!");
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal error:"));
}

#[test]
fn test_error_conversion() {
    let internal = BotError::Internal(Box::new(std::io::Error::other("io")));
    assert!(internal.source().is_some());

    let from_report: BotError = eyre::eyre!("query failed").into();
    assert!(matches!(from_report, BotError::Database(_)));
}

#[test]
fn test_bot_result() {
    let result: BotResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BotResult<i32> = Err(BotError::NotFound("size".to_string()));
    assert!(result.is_err());
}
