//! Activity Correlation
//!
//! Pairs an outgoing network activity with the incoming activity that shares
//! its matching id, possibly recorded by a different source, so a sequence
//! diagram can draw the arrow between them.

use crate::timeline::{Activity, ActivityKind};
use ahash::RandomState;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ActivityPair {
    pub outgoing: Arc<Activity>,
    pub incoming: Arc<Activity>,
}

#[derive(Debug, Clone, Default)]
pub struct PairingIndex {
    pairs: HashMap<String, ActivityPair, RandomState>,
}

impl PairingIndex {
    /// Single pass over the globally sorted activity list.
    ///
    /// A later outgoing activity replaces an earlier unanswered one with the
    /// same id. Only the first incoming activity is paired; extra incoming
    /// activities stay unpaired.
    pub fn build(activities: &[Arc<Activity>]) -> Self {
        let mut pending: HashMap<&str, (Arc<Activity>, Option<Arc<Activity>>), RandomState> =
            HashMap::default();

        for activity in activities {
            let Some(matching_id) = activity.matching_id.as_deref() else {
                continue;
            };
            match activity.kind {
                ActivityKind::OutgoingNetworking => {
                    pending.insert(matching_id, (activity.clone(), None));
                }
                ActivityKind::IncomingNetworking => {
                    if let Some((_, incoming)) = pending.get_mut(matching_id) {
                        incoming.get_or_insert_with(|| activity.clone());
                    }
                }
                ActivityKind::Lifespan | ActivityKind::Procedure => {}
            }
        }

        let pairs = pending
            .into_iter()
            .filter_map(|(id, (outgoing, incoming))| {
                incoming.map(|incoming| (id.to_string(), ActivityPair { outgoing, incoming }))
            })
            .collect();

        Self { pairs }
    }

    /// The pair `activity` takes part in, if any. Lookup is by identity, so
    /// an unpaired activity sharing a matching id yields `None`.
    pub fn paired(&self, activity: &Arc<Activity>) -> Option<&ActivityPair> {
        let pair = self.pairs.get(activity.matching_id.as_deref()?)?;
        (Arc::ptr_eq(&pair.outgoing, activity) || Arc::ptr_eq(&pair.incoming, activity))
            .then_some(pair)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = &ActivityPair> {
        self.pairs.values()
    }
}
