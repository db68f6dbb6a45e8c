//! Test: event manager fan-out

use crate::helpers::*;
use birbs::core::config::ManagerConfig;
use birbs::{BirbError, BirbOptions, EventManager, Procedure};

fn manager() -> EventManager<String> {
    let config = ManagerConfig::from_yaml(
        r#"
contexts:
  - identifier: Context
  - identifier: Other
procedures:
  counter:
    lifetime: DURABLE
"#,
    )
    .unwrap();

    let manager = EventManager::from_config(&config, |_| "text ".to_string());
    manager
        .add_procedure(
            Procedure::new("counter", config.options_for("counter"), TextCounter::new()),
            "Context",
        )
        .unwrap();
    manager
}

/// Targeted broadcast with payload, then broadcast to everyone
#[tokio::test]
async fn test_broadcast_with_payload_then_everywhere() {
    let manager = manager();

    manager.broadcast("counter", Some("Context"), Some(serde_json::json!(8)));
    manager.settle().await;
    assert_eq!(manager.context("Context").unwrap().snapshot(), "text 1");

    manager.broadcast("counter", None, None);
    let outcomes = manager.settle().await;

    // "Other" has nothing signed under this name, so only one dispatch ran.
    assert_eq!(outcomes.len(), 1);
    assert_eq!(manager.context("Context").unwrap().snapshot(), "text 19");
    assert_eq!(manager.context("Other").unwrap().snapshot(), "text ");
}

/// Unknown target degrades to triggering every context
#[tokio::test]
async fn test_unknown_target_triggers_everywhere() {
    let manager = manager();
    manager
        .add_procedure(prepend("hello", BirbOptions::durable(), "Hello!"), "Other")
        .unwrap()
        .add_procedure(prepend("hello", BirbOptions::durable(), "Hi!"), "Context")
        .unwrap();

    manager.broadcast("hello", Some("Nowhere"), None);
    assert_all_succeeded(&manager.settle().await);

    assert_eq!(manager.context("Context").unwrap().snapshot(), "Hi! text ");
    assert_eq!(manager.context("Other").unwrap().snapshot(), "Hello! text ");
}

/// Fan-out registration against a missing context is an explicit error
#[tokio::test]
async fn test_missing_context_registration_fails() {
    let mut manager = manager();
    manager.remove_context("Other");

    let err = manager
        .add_procedure(prepend("hello", BirbOptions::single(), "Hello!"), "Other")
        .err()
        .unwrap();
    assert!(matches!(err, BirbError::ContextNotFound(ref id) if id == "Other"));

    let err = manager.remove_birbable("counter", "Other").err().unwrap();
    assert_eq!(err.to_string(), "context not found: Other");

    manager.remove_birbable("counter", "Context").unwrap();
    assert!(manager.context("Context").unwrap().is_empty());
}
