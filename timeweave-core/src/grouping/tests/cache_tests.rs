use crate::grouping::{GroupCache, NaturalRotationComparer, group_outputs};
use crate::output::{OutputId, TimelineOutput};
use crate::test_helpers::*;
use std::sync::Arc;

#[test]
fn second_resolve_reuses_cached_groups() {
    // Arrange
    let outputs = vec![
        output("a", vec![begin("1", "x", 0), end("1", 10)]),
        output("b", vec![user_action("u", 5)]),
    ];
    let mut cache = GroupCache::new();

    // Act
    let first = cache.resolve(group_outputs(&outputs, &NaturalRotationComparer).unwrap());
    let second = cache.resolve(group_outputs(&outputs, &NaturalRotationComparer).unwrap());

    // Assert
    assert_eq!(first.rebuilt, 2);
    assert_eq!(second.rebuilt, 0);
    assert_eq!(second.reused, 2);
    assert_eq!(first.keys, second.keys);
}

#[test]
fn revision_change_invalidates_only_the_affected_group() {
    // Arrange
    let a = output("a", vec![begin("1", "x", 0), end("1", 10)]);
    let b = output("b", vec![user_action("u", 5)]);
    let mut cache = GroupCache::new();
    cache.resolve(group_outputs(&[a.clone(), b.clone()], &NaturalRotationComparer).unwrap());

    let b2 = Arc::new(TimelineOutput::new("b", vec![user_action("v", 6)]).with_revision(1));
    let outputs = vec![a, b2];

    // Act
    let stale = cache.invalidate_changed(&outputs);
    let outcome = cache.resolve(group_outputs(&outputs, &NaturalRotationComparer).unwrap());

    // Assert
    assert_eq!(stale, 1);
    assert_eq!(outcome.rebuilt, 1);
    assert_eq!(outcome.reused, 1);
    let rebuilt = cache.get(&outcome.keys[1]).unwrap();
    assert_eq!(rebuilt.built.events[0].display_name, "v");
}

#[test]
fn retain_live_drops_groups_no_longer_formed() {
    // Arrange
    let outputs = vec![output("a", vec![]), output("b", vec![])];
    let mut cache = GroupCache::new();
    let outcome = cache.resolve(group_outputs(&outputs, &NaturalRotationComparer).unwrap());

    // Act
    let evicted = cache.retain_live(|key| key.0.contains(&OutputId::from("a")));

    // Assert
    assert_eq!(evicted, 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.get(&outcome.keys[0]).is_some());
}

#[test]
fn invalidate_all_forces_a_rebuild() {
    let outputs = vec![output("a", vec![user_action("u", 0)])];
    let mut cache = GroupCache::new();
    let first = cache.resolve(group_outputs(&outputs, &NaturalRotationComparer).unwrap());

    cache.invalidate_all();
    assert!(!cache.get(&first.keys[0]).unwrap().is_valid());
    let second = cache.resolve(group_outputs(&outputs, &NaturalRotationComparer).unwrap());

    assert_eq!(second.rebuilt, 1);
}

#[test]
fn rotated_group_is_built_as_one_timeline() {
    let outputs = vec![
        rotated("log.2", "log", "2", vec![end("1", 50), end_of_timeline(60)]),
        rotated("log.1", "log", "1", vec![begin("1", "span", 0)]),
    ];
    let mut cache = GroupCache::new();

    let outcome = cache.resolve(group_outputs(&outputs, &NaturalRotationComparer).unwrap());

    let group = cache.get(&outcome.keys[0]).unwrap();
    assert_eq!(group.built.activities.len(), 1);
    assert_eq!(group.built.activities[0].end, ms(50));
    assert!(!group.built.activities[0].is_ended_forcefully);
}
