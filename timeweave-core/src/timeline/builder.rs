use crate::event::{
    ActivityRecord, ActivityStatus, ActivitySubtype, Event, EventKind, NetworkDirection, Phase,
    Timestamp, Trigger,
};
use crate::output::OutputId;
use crate::timeline::{
    Activity, ActivityKind, EntityComparer, Milestone, TimelineEvent, TimelineEventKind,
};
use ahash::RandomState;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Result of replaying one rotation group.
#[derive(Debug, Clone, Default)]
pub struct BuiltGroup {
    /// Sorted by [`EntityComparer`].
    pub activities: Vec<Arc<Activity>>,
    /// Sorted by [`EntityComparer`].
    pub events: Vec<Arc<TimelineEvent>>,
    /// First timestamp that anchored the group. `None` if nothing was seen.
    pub origin: Option<Timestamp>,
    /// Display name of the terminal end-of-timeline record, if any.
    pub display_name: Option<String>,
}

struct OpenActivity {
    seq: u64,
    begin: Timestamp,
    begin_owner: OutputId,
    begin_trigger: Trigger,
    display_name: String,
    kind: ActivityKind,
    matching_id: Option<String>,
    milestones: Vec<(Timestamp, String, Trigger)>,
    phases: Option<Vec<Phase>>,
    tags: BTreeSet<String>,
    is_error: bool,
    may_lack_end: bool,
}

impl OpenActivity {
    fn merge(&mut self, event: &Event, record: &ActivityRecord) {
        if self.phases.is_none() {
            self.phases = record.phases.clone();
        }
        self.is_error |= record.status == ActivityStatus::Error;
        self.tags.extend(event.tags.iter().cloned());
    }
}

struct ClosedActivity {
    open: OpenActivity,
    end: Timestamp,
    end_owner: OutputId,
    end_trigger: Trigger,
    forced: bool,
}

struct PendingEndOfTimeline {
    /// Activities begun at or after this sequence number opened after the
    /// sentinel and are not closed by it.
    open_before: u64,
    owner: OutputId,
    timestamp: Timestamp,
    trigger: Trigger,
    display_name: String,
}

/// State machine that turns one group's ordered records into activities and
/// events.
///
/// Feed every member output with [`add_output`](Self::add_output) in rotation
/// order, flagging the last one, then call [`finalize`](Self::finalize).
#[derive(Default)]
pub struct TimelineBuilder {
    open: HashMap<String, OpenActivity, RandomState>,
    origin: Option<Timestamp>,
    end_of_timeline: Option<PendingEndOfTimeline>,
    closed: Vec<ClosedActivity>,
    events: Vec<(Timestamp, OutputId, TimelineEventKind, String, Trigger)>,
    next_seq: u64,
}

impl TimelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_output(&mut self, owner: &OutputId, events: &[Event], is_last: bool) {
        for event in events {
            self.add_event(owner, event, is_last);
        }
    }

    fn add_event(&mut self, owner: &OutputId, event: &Event, is_last: bool) {
        match &event.kind {
            EventKind::ActivityBegin(record) => self.begin(owner, event, record, false),
            EventKind::ActivityPotentialBegin(record) => self.begin(owner, event, record, true),
            EventKind::ActivityEnd(record) => self.end(owner, event, record),
            EventKind::ActivityMilestone(record) => self.milestone(event, record),
            EventKind::UserAction => self.instant(owner, event, TimelineEventKind::UserAction),
            EventKind::ApiCall => self.instant(owner, event, TimelineEventKind::ApiCall),
            EventKind::EndOfTimeline => {
                self.touch_origin(event.timestamp);
                if is_last {
                    self.end_of_timeline = Some(PendingEndOfTimeline {
                        open_before: self.next_seq,
                        owner: owner.clone(),
                        timestamp: event.timestamp,
                        trigger: event.trigger.clone(),
                        display_name: event.display_name.clone(),
                    });
                }
            }
            EventKind::Unknown => {}
        }
    }

    fn touch_origin(&mut self, timestamp: Timestamp) {
        if self.origin.is_none() {
            self.origin = Some(timestamp);
        }
    }

    fn begin(
        &mut self,
        owner: &OutputId,
        event: &Event,
        record: &ActivityRecord,
        may_lack_end: bool,
    ) {
        self.touch_origin(event.timestamp);

        let (kind, matching_id) = classify(record);
        let seq = self.next_seq;
        self.next_seq += 1;

        let fresh = OpenActivity {
            seq,
            begin: event.timestamp,
            begin_owner: owner.clone(),
            begin_trigger: event.trigger.clone(),
            display_name: event.display_name.clone(),
            kind,
            matching_id,
            milestones: Vec::new(),
            phases: record.phases.clone(),
            tags: event.tags.clone(),
            is_error: record.status == ActivityStatus::Error,
            may_lack_end,
        };

        // Last begin wins; the earlier open record is discarded.
        if let Some(previous) = self.open.insert(record.activity_id.clone(), fresh) {
            tracing::trace!(
                activity_id = %record.activity_id,
                discarded = %previous.display_name,
                "open activity replaced by a new begin"
            );
        }
    }

    fn end(&mut self, owner: &OutputId, event: &Event, record: &ActivityRecord) {
        let Some(mut open) = self.open.remove(&record.activity_id) else {
            return;
        };

        open.merge(event, record);
        self.closed.push(ClosedActivity {
            open,
            end: event.timestamp,
            end_owner: owner.clone(),
            end_trigger: event.trigger.clone(),
            forced: false,
        });
    }

    fn milestone(&mut self, event: &Event, record: &ActivityRecord) {
        let Some(open) = self.open.get_mut(&record.activity_id) else {
            return;
        };

        open.merge(event, record);
        open.milestones.push((
            event.timestamp,
            event.display_name.clone(),
            event.trigger.clone(),
        ));
    }

    fn instant(&mut self, owner: &OutputId, event: &Event, kind: TimelineEventKind) {
        self.touch_origin(event.timestamp);
        self.events.push((
            event.timestamp,
            owner.clone(),
            kind,
            event.display_name.clone(),
            event.trigger.clone(),
        ));
    }

    pub fn finalize(mut self) -> BuiltGroup {
        let mut still_open: Vec<OpenActivity> = self.open.into_values().collect();
        still_open.sort_by_key(|open| open.seq);

        let mut forced = 0usize;
        let mut dropped = 0usize;
        for open in still_open {
            match (&self.end_of_timeline, open.may_lack_end) {
                (Some(eot), false) if open.seq < eot.open_before => {
                    forced += 1;
                    self.closed.push(ClosedActivity {
                        open,
                        end: eot.timestamp,
                        end_owner: eot.owner.clone(),
                        end_trigger: eot.trigger.clone(),
                        forced: true,
                    });
                }
                _ => dropped += 1,
            }
        }

        let origin = self.origin;
        let relative = |ts: Timestamp| origin.map(|o| ts - o).unwrap_or_default();

        let mut activities: Vec<Arc<Activity>> = self
            .closed
            .into_iter()
            .map(|closed| {
                let open = closed.open;
                Arc::new(Activity {
                    begin: relative(open.begin),
                    begin_owner: open.begin_owner,
                    end: relative(closed.end),
                    end_owner: closed.end_owner,
                    display_name: open.display_name,
                    matching_id: open.matching_id,
                    kind: open.kind,
                    begin_trigger: open.begin_trigger,
                    end_trigger: closed.end_trigger,
                    milestones: open
                        .milestones
                        .into_iter()
                        .map(|(ts, name, trigger)| Milestone {
                            time: relative(ts),
                            name,
                            trigger,
                        })
                        .collect(),
                    phases: open.phases.unwrap_or_default(),
                    tags: open.tags,
                    is_error: open.is_error,
                    is_ended_forcefully: closed.forced,
                })
            })
            .collect();

        let mut events: Vec<Arc<TimelineEvent>> = self
            .events
            .into_iter()
            .map(|(ts, owner, kind, display_name, trigger)| {
                Arc::new(TimelineEvent {
                    owner,
                    time: relative(ts),
                    display_name,
                    kind,
                    trigger,
                })
            })
            .collect();

        let comparer = EntityComparer::default();
        activities.sort_by(|a, b| comparer.compare_activities(a, b));
        events.sort_by(|a, b| comparer.compare_events(a, b));

        tracing::debug!(
            activities = activities.len(),
            events = events.len(),
            forced,
            dropped,
            "timeline group finalized"
        );

        BuiltGroup {
            activities,
            events,
            origin,
            display_name: self
                .end_of_timeline
                .map(|eot| eot.display_name)
                .filter(|name| !name.is_empty()),
        }
    }
}

fn classify(record: &ActivityRecord) -> (ActivityKind, Option<String>) {
    match record.subtype {
        ActivitySubtype::Procedure => (ActivityKind::Procedure, None),
        ActivitySubtype::ObjectLifetime => (ActivityKind::Lifespan, None),
        ActivitySubtype::NetworkMessage { direction } => {
            let kind = match direction {
                NetworkDirection::Outgoing => ActivityKind::OutgoingNetworking,
                NetworkDirection::Incoming => ActivityKind::IncomingNetworking,
            };
            (kind, Some(record.activity_id.clone()))
        }
    }
}
