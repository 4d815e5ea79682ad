use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Ties a reconstructed record back to where it came from in the raw log.
///
/// Only positional triggers take part in ordering; opaque ones are carried
/// through for cross-referencing and sort after every positional trigger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Position in the source stream (byte offset, line number, ...).
    Positional(u64),
    Opaque(String),
}

impl Default for Trigger {
    fn default() -> Self {
        Trigger::Opaque(String::new())
    }
}

impl Trigger {
    pub fn position(&self) -> Option<u64> {
        match self {
            Trigger::Positional(pos) => Some(*pos),
            Trigger::Opaque(_) => None,
        }
    }

    /// Tiebreak order: positions compare numerically, any position sorts
    /// before an opaque trigger, opaque triggers are all equal.
    pub fn order(&self, other: &Trigger) -> Ordering {
        match (self.position(), other.position()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}
