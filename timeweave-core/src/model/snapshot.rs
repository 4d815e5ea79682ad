use crate::correlation::{ActivityPair, PairingIndex};
use crate::event::Timestamp;
use crate::output::{OutputId, TimelineOutput};
use crate::timeline::{Activity, EntityComparer, TimelineEvent};
use ahash::RandomState;
use chrono::TimeDelta;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Aligned span covered by a snapshot, relative to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    #[serde(with = "crate::event::serde_helpers::ticks")]
    pub begin: TimeDelta,
    #[serde(with = "crate::event::serde_helpers::ticks")]
    pub end: TimeDelta,
}

impl TimeRange {
    fn covering(
        activities: &[Arc<Activity>],
        events: &[Arc<TimelineEvent>],
        comparer: &EntityComparer,
    ) -> Option<Self> {
        let begins = activities
            .iter()
            .map(|a| comparer.activity_begin(a))
            .chain(events.iter().map(|e| comparer.align(e.time, &e.owner)));
        let ends = activities
            .iter()
            .map(|a| comparer.activity_end(a))
            .chain(events.iter().map(|e| comparer.align(e.time, &e.owner)));

        Some(Self {
            begin: begins.min()?,
            end: ends.max()?,
        })
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.begin
    }
}

/// Immutable result of one rebuild. Replaced wholesale, never edited.
#[derive(Debug, Clone, Default)]
pub struct TimelineSnapshot {
    /// Visible outputs, grouped by rotated log and in rotation order.
    pub outputs: Vec<Arc<TimelineOutput>>,
    pub origin: Option<Timestamp>,
    /// Sorted by [`TimelineSnapshot::comparer`].
    pub activities: Vec<Arc<Activity>>,
    /// Sorted by [`TimelineSnapshot::comparer`].
    pub events: Vec<Arc<TimelineEvent>>,
    pub available_range: Option<TimeRange>,
    pub comparer: EntityComparer,
    pub pairing: PairingIndex,
    pub sequence_diagram_names: HashMap<OutputId, String, RandomState>,
}

impl TimelineSnapshot {
    pub(crate) fn new(
        outputs: Vec<Arc<TimelineOutput>>,
        origin: Option<Timestamp>,
        activities: Vec<Arc<Activity>>,
        events: Vec<Arc<TimelineEvent>>,
        comparer: EntityComparer,
        sequence_diagram_names: HashMap<OutputId, String, RandomState>,
    ) -> Self {
        let pairing = PairingIndex::build(&activities);
        let available_range = TimeRange::covering(&activities, &events, &comparer);

        Self {
            outputs,
            origin,
            activities,
            events,
            available_range,
            comparer,
            pairing,
            sequence_diagram_names,
        }
    }

    pub fn paired_activities(&self, activity: &Arc<Activity>) -> Option<&ActivityPair> {
        self.pairing.paired(activity)
    }

    pub fn sequence_diagram_name(&self, id: &OutputId) -> Option<&str> {
        self.sequence_diagram_names.get(id).map(String::as_str)
    }

    /// Absolute instant of an aligned time.
    pub fn absolute(&self, aligned: TimeDelta) -> Option<Timestamp> {
        self.origin.map(|origin| origin + aligned)
    }

    /// Whether `other` shows the same entities at the same aligned times.
    pub(crate) fn same_timeline(&self, other: &TimelineSnapshot) -> bool {
        self.origin == other.origin
            && same_entries(&self.activities, &other.activities)
            && same_entries(&self.events, &other.events)
            && self
                .outputs
                .iter()
                .map(|o| o.id())
                .eq(other.outputs.iter().map(|o| o.id()))
            && self.outputs.iter().all(|o| {
                self.comparer.offset_of(o.id()) == other.comparer.offset_of(o.id())
            })
    }
}

fn same_entries<T>(a: &[Arc<T>], b: &[Arc<T>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}
