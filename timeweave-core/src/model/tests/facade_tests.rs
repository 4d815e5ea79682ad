use super::{catalog_of, model_of};
use crate::output::OutputId;
use crate::test_helpers::*;
use crate::timeline::{Activity, ActivityKind};
use chrono::TimeDelta;
use pretty_assertions::assert_eq;
use std::cmp::Ordering;
use std::sync::Arc;

/// Owner-independent view of an activity.
fn shape(activity: &Activity) -> (String, TimeDelta, TimeDelta, bool) {
    (
        activity.display_name.clone(),
        activity.begin,
        activity.end,
        activity.is_ended_forcefully,
    )
}

#[test]
fn end_to_end_two_sources() {
    // Arrange
    let catalog = catalog_of(vec![
        output("a", vec![begin("1", "fetch", 0), end("1", 100)]),
        output("b", vec![end_of_timeline(0)]),
    ]);

    // Act
    let model = model_of(&catalog);
    let snapshot = model.snapshot();

    // Assert
    assert_eq!(snapshot.origin, Some(at(0)));
    assert_eq!(snapshot.activities.len(), 1);
    let fetch = &snapshot.activities[0];
    assert_eq!(fetch.display_name, "fetch");
    assert_eq!(fetch.begin, ms(0));
    assert_eq!(fetch.end, ms(100));
    assert!(!fetch.is_ended_forcefully);
    assert!(
        snapshot
            .activities
            .iter()
            .all(|a| a.begin_owner != OutputId::from("b") && a.end_owner != OutputId::from("b"))
    );
    let range = snapshot.available_range.unwrap();
    assert_eq!(range.duration(), ms(100));
}

#[test]
fn rebuilding_unchanged_input_is_idempotent() {
    // Arrange
    let catalog = catalog_of(vec![
        output("a", vec![begin("1", "x", 0), user_action("u", 5), end("1", 10)]),
        output("b", vec![api_call("call", 3), end_of_timeline(20)]),
    ]);

    // Act
    let first = model_of(&catalog).snapshot();
    let second = model_of(&catalog).snapshot();

    // Assert
    let activities = |s: &crate::model::TimelineSnapshot| {
        s.activities.iter().map(|a| Activity::clone(a)).collect::<Vec<_>>()
    };
    let events = |s: &crate::model::TimelineSnapshot| {
        s.events.iter().map(|e| e.as_ref().clone()).collect::<Vec<_>>()
    };
    assert_eq!(activities(&first), activities(&second));
    assert_eq!(events(&first), events(&second));
    assert_eq!(first.origin, second.origin);
}

#[test]
fn merged_lists_follow_the_comparer() {
    // Arrange
    let catalog = catalog_of(vec![
        output(
            "a",
            vec![
                positional(begin("1", "a1", 0), 1),
                positional(begin("2", "a2", 30), 2),
                user_action("ua", 30),
                end("1", 40),
                end("2", 50),
            ],
        ),
        output(
            "b",
            vec![
                begin("1", "b1", 10),
                begin("2", "b2", 30),
                user_action("ub", 30),
                end("1", 35),
                end("2", 60),
            ],
        ),
        output("c", vec![begin("9", "c9", 30), end("9", 31)]),
    ]);

    // Act
    let snapshot = model_of(&catalog).snapshot();

    // Assert
    let comparer = &snapshot.comparer;
    assert_eq!(snapshot.activities.len(), 5);
    for pair in snapshot.activities.windows(2) {
        assert_ne!(
            comparer.compare_activities(&pair[0], &pair[1]),
            Ordering::Greater
        );
    }
    for pair in snapshot.events.windows(2) {
        assert_ne!(comparer.compare_events(&pair[0], &pair[1]), Ordering::Greater);
    }
    for a in &snapshot.activities {
        for b in &snapshot.activities {
            assert_eq!(
                comparer.compare_activities(a, b),
                comparer.compare_activities(b, a).reverse()
            );
        }
    }
}

#[test]
fn rotated_parts_build_the_same_activities_as_one_file() {
    // Arrange
    let whole = catalog_of(vec![output(
        "log",
        vec![
            begin("1", "span", 0),
            user_action("click", 10),
            begin("2", "dangling", 20),
            end("1", 50),
            end_of_timeline(60),
        ],
    )]);
    let split = catalog_of(vec![
        rotated(
            "log.2",
            "log",
            "2",
            vec![end("1", 50), end_of_timeline(60)],
        ),
        rotated(
            "log.1",
            "log",
            "1",
            vec![
                begin("1", "span", 0),
                user_action("click", 10),
                begin("2", "dangling", 20),
            ],
        ),
    ]);

    // Act
    let whole = model_of(&whole).snapshot();
    let split = model_of(&split).snapshot();

    // Assert
    let shapes = |s: &crate::model::TimelineSnapshot| {
        s.activities.iter().map(|a| shape(a)).collect::<Vec<_>>()
    };
    assert_eq!(shapes(&whole), shapes(&split));
    assert_eq!(split.activities.len(), 2);
    let span = &split.activities[0];
    assert_eq!(span.begin_owner, OutputId::from("log.1"));
    assert_eq!(span.end_owner, OutputId::from("log.2"));
    assert_eq!(whole.events.len(), split.events.len());
}

#[test]
fn open_begin_is_closed_by_end_of_timeline() {
    let catalog = catalog_of(vec![output(
        "a",
        vec![begin("1", "open", 0), end_of_timeline(100)],
    )]);

    let snapshot = model_of(&catalog).snapshot();

    assert_eq!(snapshot.activities.len(), 1);
    assert_eq!(
        shape(&snapshot.activities[0]),
        ("open".to_string(), ms(0), ms(100), true)
    );
}

#[test]
fn unanswered_potential_begin_is_dropped() {
    let catalog = catalog_of(vec![output(
        "a",
        vec![potential_begin("1", "maybe", 0), end_of_timeline(100)],
    )]);

    let snapshot = model_of(&catalog).snapshot();

    assert!(snapshot.activities.is_empty());
    assert_eq!(snapshot.origin, Some(at(0)));
}

#[test]
fn network_activities_are_paired_across_sources() {
    // Arrange
    let catalog = catalog_of(vec![
        output("client", outgoing("X", 0, 100)),
        output("server", incoming("X", 10, 90)),
        output("replay", incoming("X", 20, 80)),
    ]);

    // Act
    let snapshot = model_of(&catalog).snapshot();

    // Assert
    let by_owner = |owner: &str| {
        snapshot
            .activities
            .iter()
            .find(|a| a.begin_owner == OutputId::from(owner))
            .unwrap()
            .clone()
    };
    let out = by_owner("client");
    let inc = by_owner("server");
    let extra = by_owner("replay");

    assert_eq!(out.kind, ActivityKind::OutgoingNetworking);
    assert_eq!(inc.kind, ActivityKind::IncomingNetworking);
    let from_out = snapshot.paired_activities(&out).unwrap();
    let from_in = snapshot.paired_activities(&inc).unwrap();
    assert!(Arc::ptr_eq(&from_out.outgoing, &out));
    assert!(Arc::ptr_eq(&from_out.incoming, &inc));
    assert!(Arc::ptr_eq(&from_in.outgoing, &out));
    assert!(snapshot.paired_activities(&extra).is_none());
    assert_eq!(snapshot.pairing.len(), 1);
}

#[test]
fn later_group_gets_offset_from_the_global_origin() {
    // Arrange
    let early = output("early", vec![user_action("u", 0)]);
    let late = output("late", vec![user_action("v", 250), user_action("w", 300)]);
    let catalog = catalog_of(vec![late.clone(), early.clone()]);

    // Act
    let snapshot = model_of(&catalog).snapshot();

    // Assert
    assert_eq!(snapshot.origin, Some(at(0)));
    assert_eq!(early.timeline_offset(), ms(0));
    assert_eq!(late.timeline_offset(), ms(250));
    assert_eq!(snapshot.comparer.offset_of(late.id()), ms(250));
    let aligned: Vec<TimeDelta> = snapshot
        .events
        .iter()
        .map(|e| snapshot.comparer.align(e.time, &e.owner))
        .collect();
    assert_eq!(aligned, vec![ms(0), ms(250), ms(300)]);
    assert_eq!(snapshot.absolute(ms(300)), Some(at(300)));
}

#[test]
fn groups_without_records_get_no_offset() {
    let empty = output("empty", vec![]);
    let catalog = catalog_of(vec![output("a", vec![user_action("u", 40)]), empty.clone()]);

    let snapshot = model_of(&catalog).snapshot();

    assert_eq!(snapshot.origin, Some(at(40)));
    assert_eq!(empty.timeline_offset(), TimeDelta::zero());
    assert_eq!(snapshot.outputs.len(), 2);
}

#[test]
fn empty_catalog_publishes_an_empty_snapshot() {
    let catalog = catalog_of(vec![]);

    let snapshot = model_of(&catalog).snapshot();

    assert_eq!(snapshot.origin, None);
    assert!(snapshot.activities.is_empty());
    assert!(snapshot.events.is_empty());
    assert_eq!(snapshot.available_range, None);
}
