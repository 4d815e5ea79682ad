use crate::alignment::{align_groups, publish_offsets};
use crate::error::ModelError;
use crate::grouping::{
    CachedGroup, GroupCache, GroupKey, NaturalRotationComparer, RotationComparer, group_outputs,
};
use crate::merge::merge_sorted;
use crate::model::catalog::{SourceCatalog, SourceEntry};
use crate::model::names::{DisambiguatingNameAssigner, NameAssigner, NameRequest};
use crate::model::snapshot::TimelineSnapshot;
use crate::output::OutputId;
use crate::timeline::{Activity, EntityComparer, TimelineEvent};
use ahash::RandomState;
use arc_swap::ArcSwap;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::mpsc;

/// Notifications a host sends when its sources change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceChange {
    /// Sources were added or removed, or an output's events were replaced.
    Outputs,
    /// A source's clock shift changed.
    ClockOffset,
    /// A source was shown or hidden.
    Visibility,
    /// A source's annotation or display name changed.
    Annotation,
}

/// Published to subscribers after a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    EverythingChanged,
    SequenceDiagramNamesChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Full,
    Regroup,
    Realign,
    Rename,
}

impl Tier {
    fn as_str(self) -> &'static str {
        match self {
            Tier::Full => "full",
            Tier::Regroup => "regroup",
            Tier::Realign => "realign",
            Tier::Rename => "rename",
        }
    }
}

impl From<SourceChange> for Tier {
    fn from(change: SourceChange) -> Self {
        match change {
            SourceChange::Outputs => Tier::Full,
            SourceChange::Visibility => Tier::Regroup,
            SourceChange::ClockOffset => Tier::Realign,
            SourceChange::Annotation => Tier::Rename,
        }
    }
}

/// Reconstructs the unified timeline of a host's log sources and keeps it
/// current as the sources change.
///
/// Not meant for concurrent use: every mutating call takes `&mut self` and
/// runs to completion on the calling thread. Readers may hold on to a
/// [`TimelineSnapshot`] for as long as they like.
pub struct VisualizerModel {
    catalog: Arc<dyn SourceCatalog>,
    rotation: Arc<dyn RotationComparer>,
    names: Arc<dyn NameAssigner>,
    cache: GroupCache,
    /// Visible groups of the published snapshot, in merge order.
    group_keys: Vec<GroupKey>,
    snapshot: ArcSwap<TimelineSnapshot>,
    subscribers: Vec<mpsc::Sender<ModelEvent>>,
}

impl VisualizerModel {
    /// Creates the model and runs the initial full rebuild.
    pub fn new(
        catalog: Arc<dyn SourceCatalog>,
        rotation: Arc<dyn RotationComparer>,
        names: Arc<dyn NameAssigner>,
    ) -> Result<Self, ModelError> {
        let mut model = Self {
            catalog,
            rotation,
            names,
            cache: GroupCache::new(),
            group_keys: Vec::new(),
            snapshot: ArcSwap::from_pointee(TimelineSnapshot::default()),
            subscribers: Vec::new(),
        };
        model.rebuild(Tier::Full)?;
        Ok(model)
    }

    /// Model with natural rotation ordering and disambiguated names.
    pub fn with_defaults(catalog: Arc<dyn SourceCatalog>) -> Result<Self, ModelError> {
        Self::new(
            catalog,
            Arc::new(NaturalRotationComparer),
            Arc::new(DisambiguatingNameAssigner),
        )
    }

    pub fn snapshot(&self) -> Arc<TimelineSnapshot> {
        self.snapshot.load_full()
    }

    pub fn comparer(&self) -> EntityComparer {
        self.snapshot.load().comparer.clone()
    }

    /// Receives a [`ModelEvent`] after every rebuild that changed something.
    /// Dropped receivers are pruned on the next send.
    pub fn subscribe(&mut self) -> mpsc::Receiver<ModelEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Number of rotation groups currently held in the build cache.
    pub fn cached_groups(&self) -> usize {
        self.cache.len()
    }

    /// Applies a host notification. On error the previous snapshot stays
    /// published and no event fires.
    pub fn handle_change(&mut self, change: SourceChange) -> Result<(), ModelError> {
        self.rebuild(Tier::from(change))
    }

    fn rebuild(&mut self, tier: Tier) -> Result<(), ModelError> {
        let entries = self.catalog.sources().map_err(ModelError::Catalog)?;

        let (keys, rebuilt) = match tier {
            Tier::Full | Tier::Regroup => self.regroup(&entries, tier == Tier::Full)?,
            Tier::Realign | Tier::Rename => (self.group_keys.clone(), 0),
        };

        let previous = self.snapshot.load_full();
        let next = match tier {
            Tier::Rename => self.rename(&previous, &entries, &keys)?,
            _ => self.recombine(&entries, &keys)?,
        };

        // Point of no return: annotate outputs and publish.
        if tier != Tier::Rename {
            publish_offsets(&next.outputs, &next.comparer);
        }
        for output in &next.outputs {
            if let Some(name) = next.sequence_diagram_name(output.id()) {
                output.set_sequence_diagram_name(name);
            }
        }

        let timeline_changed = !previous.same_timeline(&next);
        let names_changed = previous.sequence_diagram_names != next.sequence_diagram_names;

        tracing::info!(
            tier = tier.as_str(),
            groups = keys.len(),
            rebuilt_groups = rebuilt,
            cached_groups = self.cache.len(),
            activities = next.activities.len(),
            events = next.events.len(),
            pairs = next.pairing.len(),
            timeline_changed,
            names_changed,
            "timeline rebuilt"
        );

        self.group_keys = keys;
        self.snapshot.store(Arc::new(next));

        if timeline_changed {
            self.notify(ModelEvent::EverythingChanged);
        } else if names_changed {
            self.notify(ModelEvent::SequenceDiagramNamesChanged);
        }

        Ok(())
    }

    /// Recomputes the visible groups, building the ones the cache lacks.
    fn regroup(
        &mut self,
        entries: &[SourceEntry],
        invalidate: bool,
    ) -> Result<(Vec<GroupKey>, usize), ModelError> {
        let (visible, hidden): (Vec<&SourceEntry>, Vec<&SourceEntry>) =
            entries.iter().partition(|e| e.visible);
        let visible: Vec<_> = visible.into_iter().map(|e| e.output.clone()).collect();
        let groups =
            group_outputs(&visible, self.rotation.as_ref()).map_err(ModelError::Rotation)?;

        if invalidate {
            let all: Vec<_> = entries.iter().map(|e| e.output.clone()).collect();
            let stale = self.cache.invalidate_changed(&all);

            // Hidden groups stay cached so showing them again is free.
            let hidden: Vec<_> = hidden.into_iter().map(|e| e.output.clone()).collect();
            let hidden_groups =
                group_outputs(&hidden, self.rotation.as_ref()).map_err(ModelError::Rotation)?;
            let live: HashSet<&GroupKey, RandomState> =
                groups.iter().chain(&hidden_groups).map(|g| &g.key).collect();
            let evicted = self.cache.retain_live(|key| live.contains(key));

            tracing::debug!(stale, evicted, "group cache invalidated");
        }

        let outcome = self.cache.resolve(groups);

        Ok((outcome.keys, outcome.rebuilt))
    }

    /// Aligns and merges the given cached groups into a new snapshot.
    fn recombine(
        &self,
        entries: &[SourceEntry],
        keys: &[GroupKey],
    ) -> Result<TimelineSnapshot, ModelError> {
        let groups: Vec<&CachedGroup> = keys.iter().filter_map(|k| self.cache.get(k)).collect();

        let shifts: HashMap<&OutputId, chrono::TimeDelta, RandomState> =
            entries.iter().map(|e| (e.id(), e.clock_shift)).collect();
        let alignment = align_groups(groups.iter().copied(), |id| {
            shifts.get(id).copied().unwrap_or_default()
        });
        let comparer = EntityComparer::new(alignment.offsets);

        let activity_lists: Vec<&[Arc<Activity>]> =
            groups.iter().map(|g| g.built.activities.as_slice()).collect();
        let event_lists: Vec<&[Arc<TimelineEvent>]> =
            groups.iter().map(|g| g.built.events.as_slice()).collect();
        let activities = merge_sorted(&activity_lists, |a| comparer.activity_key(a));
        let events = merge_sorted(&event_lists, |e| comparer.event_key(e));

        let names = self.assign_names(entries, &groups)?;
        let outputs = groups.iter().flat_map(|g| g.members.iter().cloned()).collect();

        Ok(TimelineSnapshot::new(
            outputs,
            alignment.origin,
            activities,
            events,
            comparer,
            names,
        ))
    }

    /// Copy of `previous` with freshly assigned names.
    fn rename(
        &self,
        previous: &TimelineSnapshot,
        entries: &[SourceEntry],
        keys: &[GroupKey],
    ) -> Result<TimelineSnapshot, ModelError> {
        let groups: Vec<&CachedGroup> = keys.iter().filter_map(|k| self.cache.get(k)).collect();
        let names = self.assign_names(entries, &groups)?;

        Ok(TimelineSnapshot {
            sequence_diagram_names: names,
            ..previous.clone()
        })
    }

    fn assign_names(
        &self,
        entries: &[SourceEntry],
        groups: &[&CachedGroup],
    ) -> Result<HashMap<OutputId, String, RandomState>, ModelError> {
        let by_id: HashMap<&OutputId, &SourceEntry, RandomState> =
            entries.iter().map(|e| (e.id(), e)).collect();

        let requests: Vec<NameRequest> = groups
            .iter()
            .enumerate()
            .flat_map(|(index, group)| {
                let by_id = &by_id;
                group.member_ids().map(move |id| {
                    let entry = by_id.get(id);
                    NameRequest {
                        source: id.clone(),
                        group: index,
                        suggested: group.built.display_name.clone(),
                        display_name: entry
                            .map(|e| e.display_name.clone())
                            .unwrap_or_else(|| id.to_string()),
                        annotation: entry.and_then(|e| e.annotation.clone()),
                    }
                })
            })
            .collect();

        self.names
            .assign_names(&requests)
            .map_err(ModelError::NameAssignment)
    }

    fn notify(&mut self, event: ModelEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}
