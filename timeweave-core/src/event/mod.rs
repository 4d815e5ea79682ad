//! Structured Event Records
//!
//! These are the records a log parser extracts from a single log source. The
//! engine never parses raw text itself; it only consumes ordered lists of
//! these records, one list per [`TimelineOutput`](crate::output::TimelineOutput).
//!
//! The serialized shape (JSON) looks like:
//!
//! ```json
//! { "kind": "activity_begin", "timestamp": "2024-01-01T00:00:00Z",
//!   "display_name": "fetch", "activity_id": "1", "subtype": "procedure",
//!   "status": "unspecified", "tags": "net http", "trigger": { "positional": 17 } }
//! ```

pub(crate) mod serde_helpers;
mod trigger;


pub use trigger::Trigger;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Absolute point in time as recorded by a log source's own clock.
pub type Timestamp = DateTime<Utc>;

/// One structured record extracted from a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: Timestamp,

    #[serde(default)]
    pub trigger: Trigger,

    #[serde(default)]
    pub display_name: String,

    /// Serialized as a single space separated string.
    #[serde(default, with = "serde_helpers::tags")]
    pub tags: BTreeSet<String>,

    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKind {
    ActivityBegin(ActivityRecord),
    ActivityPotentialBegin(ActivityRecord),
    ActivityEnd(ActivityRecord),
    ActivityMilestone(ActivityRecord),
    UserAction,
    ApiCall,
    EndOfTimeline,
    /// Record kinds this engine does not know about. Always ignored.
    #[serde(other)]
    Unknown,
}

/// Payload shared by all activity related records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub activity_id: String,

    #[serde(default)]
    pub subtype: ActivitySubtype,

    #[serde(default)]
    pub status: ActivityStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<Vec<Phase>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySubtype {
    #[default]
    Procedure,
    ObjectLifetime,
    NetworkMessage { direction: NetworkDirection },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkDirection {
    Outgoing,
    Incoming,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityStatus {
    #[default]
    Unspecified,
    Error,
}

/// A sub-interval of an activity, relative to the activity's begin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(rename = "begin_ticks", with = "serde_helpers::ticks")]
    pub begin: TimeDelta,

    #[serde(rename = "end_ticks", with = "serde_helpers::ticks")]
    pub end: TimeDelta,

    #[serde(rename = "type")]
    pub phase_type: i32,

    pub name: String,
}

impl Event {
    pub fn new(timestamp: Timestamp, kind: EventKind) -> Self {
        Self {
            timestamp,
            trigger: Trigger::default(),
            display_name: String::new(),
            tags: BTreeSet::new(),
            kind,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The activity payload for activity-kind records.
    pub fn activity(&self) -> Option<&ActivityRecord> {
        match &self.kind {
            EventKind::ActivityBegin(r)
            | EventKind::ActivityPotentialBegin(r)
            | EventKind::ActivityEnd(r)
            | EventKind::ActivityMilestone(r) => Some(r),
            EventKind::UserAction
            | EventKind::ApiCall
            | EventKind::EndOfTimeline
            | EventKind::Unknown => None,
        }
    }
}

impl ActivityRecord {
    pub fn new(activity_id: impl Into<String>) -> Self {
        Self {
            activity_id: activity_id.into(),
            subtype: ActivitySubtype::default(),
            status: ActivityStatus::default(),
            phases: None,
        }
    }

    pub fn subtype(mut self, subtype: ActivitySubtype) -> Self {
        self.subtype = subtype;
        self
    }

    pub fn status(mut self, status: ActivityStatus) -> Self {
        self.status = status;
        self
    }

    pub fn phases(mut self, phases: Vec<Phase>) -> Self {
        self.phases = Some(phases);
        self
    }
}
