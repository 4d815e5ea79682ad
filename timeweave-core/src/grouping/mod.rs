//! Rotated-log Grouping
//!
//! Outputs that are really sequential chunks of one rotated log are stitched
//! back together here: they are grouped by an external rotation-equality rule,
//! sorted by rotation order, and replayed through a single
//! [`TimelineBuilder`](crate::timeline::TimelineBuilder) so an activity that
//! begins in one file and ends in the next comes out as one interval.
//!
//! ```text
//! visible outputs
//!   group_outputs (RotationComparer)
//!   RotationGroup[]
//!   GroupCache::resolve (reuse or rebuild)
//!   CachedGroup[]
//! ```

mod cache;
mod rotation;

#[cfg(test)]
mod tests;

pub use cache::{CachedGroup, GroupCache, ResolveOutcome};
pub use rotation::{NaturalRotationComparer, RotationComparer};
pub(crate) use rotation::natural_cmp;

use crate::error::CollaboratorError;
use crate::output::{OutputId, TimelineOutput};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Structural cache key of a rotation group: member ids in rotation order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey(pub SmallVec<[OutputId; 2]>);

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<&str> = self.0.iter().map(OutputId::as_str).collect();
        write!(f, "[{}]", ids.join(", "))
    }
}

/// Outputs of one physical log, sorted ascending by rotation token.
#[derive(Debug, Clone)]
pub struct RotationGroup {
    pub key: GroupKey,
    pub members: Vec<Arc<TimelineOutput>>,
}

/// Partitions `outputs` into rotation groups.
///
/// Outputs without a rotation token form singleton groups. Groups are returned
/// ordered by key so downstream tie-breaking is reproducible.
pub fn group_outputs(
    outputs: &[Arc<TimelineOutput>],
    rotation: &dyn RotationComparer,
) -> Result<Vec<RotationGroup>, CollaboratorError> {
    let mut buckets: Vec<Vec<Arc<TimelineOutput>>> = Vec::new();

    for output in outputs {
        let Some(token) = output.rotated_log_part() else {
            buckets.push(vec![output.clone()]);
            continue;
        };

        let mut home = None;
        for (i, bucket) in buckets.iter().enumerate() {
            let Some(other) = bucket[0].rotated_log_part() else {
                continue;
            };
            if rotation.same_rotated_log(token, other)? {
                home = Some(i);
                break;
            }
        }

        match home {
            Some(i) => buckets[i].push(output.clone()),
            None => buckets.push(vec![output.clone()]),
        }
    }

    let mut groups = buckets
        .into_iter()
        .map(|members| sort_by_rotation(members, rotation))
        .map(|members| {
            members.map(|members| RotationGroup {
                key: GroupKey(members.iter().map(|m| m.id().clone()).collect()),
                members,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    groups.sort_by(|a, b| a.key.cmp(&b.key));
    Ok(groups)
}

/// Insertion sort by rotation token. The comparer is fallible, so the first
/// failure aborts the sort instead of leaving a half-consistent order.
fn sort_by_rotation(
    mut members: Vec<Arc<TimelineOutput>>,
    rotation: &dyn RotationComparer,
) -> Result<Vec<Arc<TimelineOutput>>, CollaboratorError> {
    for i in 1..members.len() {
        let mut j = i;
        while j > 0 && order(&members[j - 1], &members[j], rotation)? == Ordering::Greater {
            members.swap(j - 1, j);
            j -= 1;
        }
    }

    Ok(members)
}

fn order(
    a: &TimelineOutput,
    b: &TimelineOutput,
    rotation: &dyn RotationComparer,
) -> Result<Ordering, CollaboratorError> {
    match (a.rotated_log_part(), b.rotated_log_part()) {
        (Some(ta), Some(tb)) => rotation.compare_order(ta, tb),
        _ => Ok(Ordering::Equal),
    }
}
