//! Builders for records and outputs shared by the unit tests.

use crate::event::{
    ActivityRecord, ActivityStatus, ActivitySubtype, Event, EventKind, NetworkDirection,
    Timestamp, Trigger,
};
use crate::output::{RotationToken, TimelineOutput};
use chrono::{TimeDelta, TimeZone, Utc};
use std::sync::Arc;

/// Base instant plus `ms` milliseconds.
pub fn at(ms: i64) -> Timestamp {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + TimeDelta::milliseconds(ms)
}

pub fn ms(ms: i64) -> TimeDelta {
    TimeDelta::milliseconds(ms)
}

pub fn begin(id: &str, name: &str, t: i64) -> Event {
    Event::new(at(t), EventKind::ActivityBegin(ActivityRecord::new(id))).with_display_name(name)
}

pub fn potential_begin(id: &str, name: &str, t: i64) -> Event {
    Event::new(
        at(t),
        EventKind::ActivityPotentialBegin(ActivityRecord::new(id)),
    )
    .with_display_name(name)
}

pub fn end(id: &str, t: i64) -> Event {
    Event::new(at(t), EventKind::ActivityEnd(ActivityRecord::new(id)))
}

pub fn failed_end(id: &str, t: i64) -> Event {
    Event::new(
        at(t),
        EventKind::ActivityEnd(ActivityRecord::new(id).status(ActivityStatus::Error)),
    )
}

pub fn milestone(id: &str, name: &str, t: i64) -> Event {
    Event::new(at(t), EventKind::ActivityMilestone(ActivityRecord::new(id)))
        .with_display_name(name)
}

pub fn network(
    kind: fn(ActivityRecord) -> EventKind,
    id: &str,
    direction: NetworkDirection,
    t: i64,
) -> Event {
    let record = ActivityRecord::new(id).subtype(ActivitySubtype::NetworkMessage { direction });
    Event::new(at(t), kind(record)).with_display_name(format!("net {id}"))
}

pub fn outgoing(id: &str, begin_ms: i64, end_ms: i64) -> Vec<Event> {
    vec![
        network(EventKind::ActivityBegin, id, NetworkDirection::Outgoing, begin_ms),
        network(EventKind::ActivityEnd, id, NetworkDirection::Outgoing, end_ms),
    ]
}

pub fn incoming(id: &str, begin_ms: i64, end_ms: i64) -> Vec<Event> {
    vec![
        network(EventKind::ActivityBegin, id, NetworkDirection::Incoming, begin_ms),
        network(EventKind::ActivityEnd, id, NetworkDirection::Incoming, end_ms),
    ]
}

pub fn user_action(name: &str, t: i64) -> Event {
    Event::new(at(t), EventKind::UserAction).with_display_name(name)
}

pub fn api_call(name: &str, t: i64) -> Event {
    Event::new(at(t), EventKind::ApiCall).with_display_name(name)
}

pub fn end_of_timeline(t: i64) -> Event {
    Event::new(at(t), EventKind::EndOfTimeline)
}

pub fn positional(event: Event, pos: u64) -> Event {
    event.with_trigger(Trigger::Positional(pos))
}

pub fn output(id: &str, events: Vec<Event>) -> Arc<TimelineOutput> {
    Arc::new(TimelineOutput::new(id, events))
}

pub fn rotated(id: &str, log: &str, part: &str, events: Vec<Event>) -> Arc<TimelineOutput> {
    Arc::new(TimelineOutput::new(id, events).with_rotation(RotationToken::new(log, part)))
}
