use crate::grouping::{GroupKey, RotationGroup};
use crate::output::{OutputId, TimelineOutput};
use crate::timeline::{BuiltGroup, TimelineBuilder};
use ahash::RandomState;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Built timeline of one rotation group plus what it was built from.
#[derive(Debug, Clone)]
pub struct CachedGroup {
    pub key: GroupKey,
    /// Sorted by rotation order.
    pub members: Vec<Arc<TimelineOutput>>,
    pub built: BuiltGroup,
    revisions: SmallVec<[u64; 2]>,
    valid: bool,
}

impl CachedGroup {
    fn build(group: RotationGroup) -> Self {
        let mut builder = TimelineBuilder::new();
        let last = group.members.len().saturating_sub(1);
        for (i, member) in group.members.iter().enumerate() {
            builder.add_output(member.id(), member.events(), i == last);
        }
        let built = builder.finalize();

        tracing::debug!(
            group = %group.key,
            members = group.members.len(),
            activities = built.activities.len(),
            events = built.events.len(),
            "rotation group built"
        );

        Self {
            key: group.key,
            revisions: group.members.iter().map(|m| m.revision()).collect(),
            members: group.members,
            built,
            valid: true,
        }
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &OutputId> {
        self.members.iter().map(|m| m.id())
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Per-group build cache keyed by [`GroupKey`].
///
/// Entries are reused across rebuilds until invalidated. Invalidation is all
/// or nothing per group; a stale group is rebuilt from scratch.
#[derive(Debug, Default)]
pub struct GroupCache {
    groups: HashMap<GroupKey, CachedGroup, RandomState>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// Keys of the resolved groups, in the order they were given.
    pub keys: Vec<GroupKey>,
    pub rebuilt: usize,
    pub reused: usize,
}

impl GroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, key: &GroupKey) -> Option<&CachedGroup> {
        self.groups.get(key)
    }

    /// Marks every group whose members changed revision or vanished from
    /// `outputs`. Returns how many groups went stale.
    pub fn invalidate_changed(&mut self, outputs: &[Arc<TimelineOutput>]) -> usize {
        let current: HashMap<&OutputId, u64, RandomState> =
            outputs.iter().map(|o| (o.id(), o.revision())).collect();

        let mut stale = 0;
        for group in self.groups.values_mut().filter(|g| g.valid) {
            let changed = group
                .member_ids()
                .zip(group.revisions.iter())
                .any(|(id, rev)| current.get(id) != Some(rev));
            if changed {
                group.valid = false;
                stale += 1;
            }
        }
        stale
    }

    pub fn invalidate_all(&mut self) {
        for group in self.groups.values_mut() {
            group.valid = false;
        }
    }

    /// Drops groups whose key `is_live` rejects, such as groups with a member
    /// the host no longer knows or a rotated log that has since gained a part.
    pub fn retain_live(&mut self, is_live: impl Fn(&GroupKey) -> bool) -> usize {
        let before = self.groups.len();
        self.groups.retain(|key, _| is_live(key));
        before - self.groups.len()
    }

    /// Makes sure every group in `groups` has a valid cached build, reusing
    /// entries where possible.
    pub fn resolve(&mut self, groups: Vec<RotationGroup>) -> ResolveOutcome {
        let mut outcome = ResolveOutcome::default();

        for group in groups {
            outcome.keys.push(group.key.clone());
            match self.groups.get_mut(&group.key) {
                Some(cached) if cached.valid => {
                    // Same ids and revisions; pick up the host's current handles.
                    cached.members = group.members;
                    outcome.reused += 1;
                }
                _ => {
                    let built = CachedGroup::build(group);
                    self.groups.insert(built.key.clone(), built);
                    outcome.rebuilt += 1;
                }
            }
        }

        outcome
    }
}
