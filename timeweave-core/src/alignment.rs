//! Cross-group Time Alignment
//!
//! Every rotation group keeps times relative to its own origin. Alignment picks
//! the earliest group origin as the shared one and gives every output of a
//! group the distance between the two.

use crate::event::Timestamp;
use crate::grouping::CachedGroup;
use crate::output::{OutputId, TimelineOutput};
use crate::timeline::EntityComparer;
use ahash::RandomState;
use chrono::TimeDelta;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Alignment {
    /// Earliest effective group origin. `None` if no group saw any record.
    pub origin: Option<Timestamp>,
    /// Offset of each output whose group has an origin.
    pub offsets: HashMap<OutputId, TimeDelta, RandomState>,
}

/// Computes the shared origin and per-output offsets.
///
/// `clock_shift` is the host's per-source clock correction; a group's
/// effective origin is its own origin shifted by its first member's value.
pub fn align_groups<'a>(
    groups: impl IntoIterator<Item = &'a CachedGroup>,
    clock_shift: impl Fn(&OutputId) -> TimeDelta,
) -> Alignment {
    let effective: Vec<(&CachedGroup, Timestamp)> = groups
        .into_iter()
        .filter_map(|group| {
            let origin = group.built.origin?;
            let shift = group
                .members
                .first()
                .map(|m| clock_shift(m.id()))
                .unwrap_or_default();
            Some((group, origin + shift))
        })
        .collect();

    let Some(origin) = effective.iter().map(|(_, o)| *o).min() else {
        return Alignment::default();
    };

    let mut offsets = HashMap::default();
    for (group, group_origin) in &effective {
        let offset = *group_origin - origin;
        for id in group.member_ids() {
            offsets.insert(id.clone(), offset);
        }
    }

    Alignment {
        origin: Some(origin),
        offsets,
    }
}

/// Writes each output's offset back onto it. Outputs of groups without an
/// origin are reset to zero.
pub fn publish_offsets(outputs: &[Arc<TimelineOutput>], comparer: &EntityComparer) {
    for output in outputs {
        output.set_timeline_offset(comparer.offset_of(output.id()));
    }
}
