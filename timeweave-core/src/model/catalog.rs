use crate::error::CollaboratorError;
use crate::output::{OutputId, TimelineOutput};
use arc_swap::ArcSwap;
use chrono::TimeDelta;
use std::sync::Arc;

/// What the host knows about one log source.
#[derive(Debug, Clone)]
pub struct SourceEntry {
    pub output: Arc<TimelineOutput>,
    pub visible: bool,
    /// User supplied correction to this source's clock.
    pub clock_shift: TimeDelta,
    pub display_name: String,
    /// User supplied label, preferred over every other name.
    pub annotation: Option<String>,
}

impl SourceEntry {
    pub fn new(output: Arc<TimelineOutput>) -> Self {
        let display_name = output.id().to_string();
        Self {
            output,
            visible: true,
            clock_shift: TimeDelta::zero(),
            display_name,
            annotation: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn with_clock_shift(mut self, shift: TimeDelta) -> Self {
        self.clock_shift = shift;
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn id(&self) -> &OutputId {
        self.output.id()
    }
}

/// Enumerates the host's log sources.
pub trait SourceCatalog {
    fn sources(&self) -> Result<Vec<SourceEntry>, CollaboratorError>;
}

/// A catalog the host edits directly. Every setter returns whether the
/// source was found; the host then notifies the model of the matching
/// [`SourceChange`](crate::model::SourceChange).
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    entries: ArcSwap<Vec<SourceEntry>>,
}

impl InMemoryCatalog {
    pub fn new(entries: Vec<SourceEntry>) -> Self {
        Self {
            entries: ArcSwap::from_pointee(entries),
        }
    }

    /// Adds a source, replacing any source with the same id.
    pub fn upsert(&self, entry: SourceEntry) {
        self.entries.rcu(|current| {
            let mut next = Vec::clone(current);
            match next.iter_mut().find(|e| e.id() == entry.id()) {
                Some(slot) => *slot = entry.clone(),
                None => next.push(entry.clone()),
            }
            next
        });
    }

    pub fn remove(&self, id: &OutputId) -> bool {
        self.edit(id, |entries, index| {
            entries.remove(index);
        })
    }

    /// Swaps in a new output for an existing source, keeping its settings.
    pub fn replace_output(&self, output: Arc<TimelineOutput>) -> bool {
        let id = output.id().clone();
        self.edit(&id, |entries, index| entries[index].output = output.clone())
    }

    pub fn set_visible(&self, id: &OutputId, visible: bool) -> bool {
        self.edit(id, |entries, index| entries[index].visible = visible)
    }

    pub fn set_clock_shift(&self, id: &OutputId, shift: TimeDelta) -> bool {
        self.edit(id, |entries, index| entries[index].clock_shift = shift)
    }

    pub fn set_annotation(&self, id: &OutputId, annotation: Option<String>) -> bool {
        self.edit(id, |entries, index| {
            entries[index].annotation = annotation.clone()
        })
    }

    fn edit(&self, id: &OutputId, apply: impl Fn(&mut Vec<SourceEntry>, usize)) -> bool {
        let mut found = false;
        self.entries.rcu(|current| {
            let mut next = Vec::clone(current);
            found = match next.iter().position(|e| e.id() == id) {
                Some(index) => {
                    apply(&mut next, index);
                    true
                }
                None => false,
            };
            next
        });
        found
    }
}

impl SourceCatalog for InMemoryCatalog {
    fn sources(&self) -> Result<Vec<SourceEntry>, CollaboratorError> {
        Ok(Vec::clone(&self.entries.load()))
    }
}
