use crate::event::Trigger;
use crate::merge::merge_sorted;
use crate::output::OutputId;
use crate::test_helpers::*;
use crate::timeline::{EntityComparer, TimelineEvent, TimelineEventKind};
use ahash::RandomState;
use chrono::TimeDelta;
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::Arc;

fn event(owner: &str, at_ms: i64, name: &str) -> Arc<TimelineEvent> {
    Arc::new(TimelineEvent {
        owner: OutputId::from(owner),
        time: ms(at_ms),
        display_name: name.to_string(),
        kind: TimelineEventKind::UserAction,
        trigger: Trigger::default(),
    })
}

fn names(events: &[Arc<TimelineEvent>]) -> Vec<&str> {
    events.iter().map(|e| e.display_name.as_str()).collect()
}

#[test]
fn interleaves_sorted_lists() {
    // Arrange
    let a = vec![
        event("a", 0, "a0"),
        event("a", 20, "a20"),
        event("a", 40, "a40"),
    ];
    let b = vec![event("b", 10, "b10"), event("b", 30, "b30")];
    let comparer = EntityComparer::default();

    // Act
    let merged = merge_sorted(&[a.as_slice(), b.as_slice()], |e| comparer.event_key(e));

    // Assert
    assert_eq!(names(&merged), vec!["a0", "b10", "a20", "b30", "a40"]);
}

#[test]
fn applies_owner_offsets_lazily() {
    // Arrange
    let a = vec![event("a", 0, "a0"), event("a", 50, "a50")];
    let b = vec![event("b", 0, "b0")];
    let offsets: HashMap<OutputId, TimeDelta, RandomState> =
        [(OutputId::from("b"), ms(25))].into_iter().collect();
    let comparer = EntityComparer::new(offsets);

    // Act
    let merged = merge_sorted(&[a.as_slice(), b.as_slice()], |e| comparer.event_key(e));

    // Assert
    assert_eq!(names(&merged), vec!["a0", "b0", "a50"]);
    assert_eq!(merged[1].time, ms(0));
}

#[test]
fn equal_times_fall_back_to_owner() {
    let a = vec![event("z", 10, "z")];
    let b = vec![event("m", 10, "m")];
    let comparer = EntityComparer::default();

    let merged = merge_sorted(&[a.as_slice(), b.as_slice()], |e| comparer.event_key(e));

    assert_eq!(names(&merged), vec!["m", "z"]);
}

#[test]
fn empty_lists_are_skipped() {
    let a: Vec<Arc<TimelineEvent>> = Vec::new();
    let b = vec![event("b", 1, "b1")];
    let comparer = EntityComparer::default();

    let merged = merge_sorted(&[a.as_slice(), b.as_slice(), a.as_slice()], |e| {
        comparer.event_key(e)
    });

    assert_eq!(names(&merged), vec!["b1"]);
}
