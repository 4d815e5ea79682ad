use crate::event::Trigger;
use crate::output::OutputId;
use crate::timeline::{Activity, TimelineEvent};
use ahash::RandomState;
use chrono::TimeDelta;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Sort key of an activity or event on the shared timeline.
///
/// Ordered by aligned time, then owner identity, then trigger position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityKey {
    pub aligned: TimeDelta,
    pub owner: OutputId,
    pub trigger: Trigger,
}

impl Ord for EntityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.aligned
            .cmp(&other.aligned)
            .then_with(|| self.owner.cmp(&other.owner))
            .then_with(|| self.trigger.order(&other.trigger))
    }
}

impl PartialOrd for EntityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders activities and events on the shared timeline.
///
/// Stored entity times are relative to their group's origin; the comparer
/// adds the owner's timeline offset when building a key. Owners without a
/// known offset are treated as offset zero. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct EntityComparer {
    offsets: Arc<HashMap<OutputId, TimeDelta, RandomState>>,
}

impl EntityComparer {
    pub fn new(offsets: HashMap<OutputId, TimeDelta, RandomState>) -> Self {
        Self {
            offsets: Arc::new(offsets),
        }
    }

    pub fn offset_of(&self, owner: &OutputId) -> TimeDelta {
        self.offsets.get(owner).copied().unwrap_or_default()
    }

    pub fn align(&self, time: TimeDelta, owner: &OutputId) -> TimeDelta {
        time + self.offset_of(owner)
    }

    pub fn activity_key(&self, activity: &Activity) -> EntityKey {
        EntityKey {
            aligned: self.align(activity.begin, &activity.begin_owner),
            owner: activity.begin_owner.clone(),
            trigger: activity.begin_trigger.clone(),
        }
    }

    pub fn event_key(&self, event: &TimelineEvent) -> EntityKey {
        EntityKey {
            aligned: self.align(event.time, &event.owner),
            owner: event.owner.clone(),
            trigger: event.trigger.clone(),
        }
    }

    pub fn compare_activities(&self, a: &Activity, b: &Activity) -> Ordering {
        self.activity_key(a).cmp(&self.activity_key(b))
    }

    pub fn compare_events(&self, a: &TimelineEvent, b: &TimelineEvent) -> Ordering {
        self.event_key(a).cmp(&self.event_key(b))
    }

    /// Aligned begin of an activity.
    pub fn activity_begin(&self, activity: &Activity) -> TimeDelta {
        self.align(activity.begin, &activity.begin_owner)
    }

    /// Aligned end of an activity.
    pub fn activity_end(&self, activity: &Activity) -> TimeDelta {
        self.align(activity.end, &activity.end_owner)
    }
}
