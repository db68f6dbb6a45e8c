//! Test: group-exclusive discard

use crate::helpers::*;
use birbs::{BirbOptions, Group};
use std::sync::atomic::Ordering;

/// Triggering one member discards the rest; later triggers are no-ops
#[tokio::test]
async fn test_group_runs_only_first_triggered_member() {
    let context = text_context("aa", "i am a test text");
    let group = Group::anonymous();
    let options = BirbOptions::durable().with_group(group);

    context
        .sign(prepend("hello", options.clone(), "Hello!"))
        .sign(prepend("goodbye", options.clone(), "Goodbye!"))
        .sign(prepend("meh", options, "Meh!"));

    context.trigger("hello", None);
    context.settle().await;
    assert_eq!(context.snapshot(), "Hello! i am a test text");
    assert!(context.is_empty());

    context
        .trigger("goodbye", None)
        .trigger("hello", None)
        .trigger("meh", None);
    assert!(context.settle().await.is_empty());
    assert_eq!(context.snapshot(), "Hello! i am a test text");
}

/// Only members of the triggered group are discarded
#[tokio::test]
async fn test_other_groups_and_ungrouped_survive() {
    let context = text_context("aa", "");
    let (a, a_runs) = counting("a", BirbOptions::durable().with_group("left"));
    let (b, _) = counting("b", BirbOptions::durable().with_group("left"));
    let (c, c_runs) = counting("c", BirbOptions::durable().with_group("right"));
    let (d, d_runs) = counting("d", BirbOptions::durable());

    context.sign(a).sign(b).sign(c).sign(d);
    context.trigger("a", None);

    assert_eq!(context.signed_names(), vec!["c".to_string(), "d".to_string()]);

    context.trigger("c", None).trigger("d", None).trigger("d", None);
    assert_all_succeeded(&context.settle().await);

    assert_eq!(a_runs.load(Ordering::SeqCst), 1);
    assert_eq!(c_runs.load(Ordering::SeqCst), 1);
    assert_eq!(d_runs.load(Ordering::SeqCst), 2);
    assert_eq!(context.signed_names(), vec!["d".to_string()]);
}

/// A single-lifetime group member still discards its siblings
#[tokio::test]
async fn test_single_group_member_discards_siblings() {
    let context = text_context("aa", "");
    let (a, a_runs) = counting("a", BirbOptions::single().with_group("g"));
    let (b, b_runs) = counting("b", BirbOptions::durable().with_group("g"));

    context.sign(a).sign(b);
    context.trigger("b", None).trigger("a", None);
    context.settle().await;

    assert_eq!(b_runs.load(Ordering::SeqCst), 1);
    assert_eq!(a_runs.load(Ordering::SeqCst), 0);
}

/// Discard never cancels a sibling that is already running
#[tokio::test]
async fn test_discard_does_not_cancel_in_flight_sibling() {
    let context = text_context("aa", "");
    let (a, a_runs) = counting("a", BirbOptions::durable().with_group("g"));
    let (b, b_runs) = counting("b", BirbOptions::durable().with_group("g"));

    context.sign(a);
    context.trigger("a", None);
    // Re-signing a sibling after the group was discarded makes it triggerable again.
    context.sign(b);
    context.trigger("b", None);
    context.settle().await;

    assert_eq!(a_runs.load(Ordering::SeqCst), 1);
    assert_eq!(b_runs.load(Ordering::SeqCst), 1);
}
