use crate::event::Event;
use arc_swap::ArcSwap;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identity of one log source output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutputId(pub Arc<str>);

impl OutputId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OutputId {
    fn from(s: &str) -> Self {
        OutputId(Arc::from(s))
    }
}

impl From<String> for OutputId {
    fn from(s: String) -> Self {
        OutputId(Arc::from(s))
    }
}

impl fmt::Display for OutputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies which physical rotated log an output belongs to and where in
/// the rotation sequence it sits. Equality and order are decided by a
/// [`RotationComparer`](crate::grouping::RotationComparer).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RotationToken {
    pub log: String,
    pub part: String,
}

impl RotationToken {
    pub fn new(log: impl Into<String>, part: impl Into<String>) -> Self {
        Self {
            log: log.into(),
            part: part.into(),
        }
    }
}

/// The two fields the engine writes back onto an output after a rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputAnnotations {
    pub timeline_offset: TimeDelta,
    pub sequence_diagram_name: String,
}

/// One parsed log source: an ordered event list plus rotation identity.
///
/// Outputs are created and dropped by the host. The engine only reads them
/// and writes [`OutputAnnotations`] back after each rebuild.
#[derive(Debug)]
pub struct TimelineOutput {
    id: OutputId,
    events: Vec<Event>,
    rotated_log_part: Option<RotationToken>,
    revision: u64,
    annotations: ArcSwap<OutputAnnotations>,
}

impl TimelineOutput {
    pub fn new(id: impl Into<OutputId>, events: Vec<Event>) -> Self {
        Self {
            id: id.into(),
            events,
            rotated_log_part: None,
            revision: 0,
            annotations: ArcSwap::from_pointee(OutputAnnotations::default()),
        }
    }

    pub fn with_rotation(mut self, token: RotationToken) -> Self {
        self.rotated_log_part = Some(token);
        self
    }

    /// Hosts bump the revision whenever they replace the event list.
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn id(&self) -> &OutputId {
        &self.id
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn rotated_log_part(&self) -> Option<&RotationToken> {
        self.rotated_log_part.as_ref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn timeline_offset(&self) -> TimeDelta {
        self.annotations.load().timeline_offset
    }

    pub fn sequence_diagram_name(&self) -> String {
        self.annotations.load().sequence_diagram_name.clone()
    }

    pub fn annotations(&self) -> OutputAnnotations {
        OutputAnnotations::clone(&self.annotations.load())
    }

    pub(crate) fn set_timeline_offset(&self, offset: TimeDelta) {
        self.annotations.rcu(|current| OutputAnnotations {
            timeline_offset: offset,
            sequence_diagram_name: current.sequence_diagram_name.clone(),
        });
    }

    pub(crate) fn set_sequence_diagram_name(&self, name: &str) {
        self.annotations.rcu(|current| OutputAnnotations {
            timeline_offset: current.timeline_offset,
            sequence_diagram_name: name.to_string(),
        });
    }
}
