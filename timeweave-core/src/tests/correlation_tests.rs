use crate::correlation::PairingIndex;
use crate::event::Event;
use crate::output::OutputId;
use crate::test_helpers::*;
use crate::timeline::{Activity, TimelineBuilder};
use std::sync::Arc;

fn activities_of(owner: &str, events: Vec<Event>) -> Vec<Arc<Activity>> {
    let mut builder = TimelineBuilder::new();
    builder.add_output(&OutputId::from(owner), &events, true);
    builder.finalize().activities
}

#[test]
fn outgoing_and_incoming_with_one_id_are_paired() {
    // Arrange
    let out = activities_of("client", outgoing("X", 0, 100)).remove(0);
    let inc = activities_of("server", incoming("X", 10, 90)).remove(0);
    let activities = vec![out.clone(), inc.clone()];

    // Act
    let index = PairingIndex::build(&activities);

    // Assert
    assert_eq!(index.len(), 1);
    let pair = index.paired(&out).unwrap();
    assert!(Arc::ptr_eq(&pair.outgoing, &out));
    assert!(Arc::ptr_eq(&pair.incoming, &inc));
    assert!(index.paired(&inc).is_some());
}

#[test]
fn incoming_without_outgoing_stays_unpaired() {
    let activities = activities_of("server", incoming("Y", 0, 10));

    let index = PairingIndex::build(&activities);

    assert!(index.is_empty());
    assert!(index.paired(&activities[0]).is_none());
}

#[test]
fn later_outgoing_replaces_an_unanswered_one() {
    // Arrange
    let mut client = outgoing("X", 0, 5);
    client.extend(outgoing("X", 10, 40));
    let mut activities = activities_of("client", client);
    activities.extend(activities_of("server", incoming("X", 20, 30)));

    // Act
    let index = PairingIndex::build(&activities);

    // Assert
    let pair = index.pairs().next().unwrap();
    assert!(Arc::ptr_eq(&pair.outgoing, &activities[1]));
    assert!(Arc::ptr_eq(&pair.incoming, &activities[2]));
    assert!(index.paired(&activities[0]).is_none());
}

#[test]
fn non_network_activities_are_ignored() {
    let activities = activities_of("a", vec![begin("X", "proc", 0), end("X", 10)]);

    let index = PairingIndex::build(&activities);

    assert!(index.is_empty());
}
