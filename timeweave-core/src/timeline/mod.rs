//! Reconstructed Timeline Entities
//!
//! A [`TimelineBuilder`] replays one rotation group's event lists and turns
//! begin/end/milestone records into [`Activity`] intervals and instant
//! records into [`TimelineEvent`]s. All times stored here are relative to the
//! group's own origin; the [`EntityComparer`] adds each owner's timeline
//! offset on the fly when ordering across groups.

mod builder;
mod comparer;


pub use builder::{BuiltGroup, TimelineBuilder};
pub use comparer::{EntityComparer, EntityKey};

use crate::event::{Phase, Trigger};
use crate::output::OutputId;
use chrono::TimeDelta;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Lifespan,
    Procedure,
    OutgoingNetworking,
    IncomingNetworking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEventKind {
    UserAction,
    ApiCall,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    #[serde(with = "crate::event::serde_helpers::ticks")]
    pub time: TimeDelta,
    pub name: String,
    pub trigger: Trigger,
}

/// A reconstructed begin to end interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    #[serde(with = "crate::event::serde_helpers::ticks")]
    pub begin: TimeDelta,
    pub begin_owner: OutputId,
    #[serde(with = "crate::event::serde_helpers::ticks")]
    pub end: TimeDelta,
    pub end_owner: OutputId,
    pub display_name: String,
    /// Shared by an outgoing request and the incoming side that answers it.
    pub matching_id: Option<String>,
    pub kind: ActivityKind,
    pub begin_trigger: Trigger,
    pub end_trigger: Trigger,
    pub milestones: Vec<Milestone>,
    pub phases: Vec<Phase>,
    pub tags: BTreeSet<String>,
    pub is_error: bool,
    pub is_ended_forcefully: bool,
}

/// A reconstructed instant (user action, API call).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    pub owner: OutputId,
    #[serde(with = "crate::event::serde_helpers::ticks")]
    pub time: TimeDelta,
    pub display_name: String,
    pub kind: TimelineEventKind,
    pub trigger: Trigger,
}
