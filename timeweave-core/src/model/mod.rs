//! Visualizer Model
//!
//! The facade hosts talk to. It owns the per-group build cache, reacts to
//! change notifications from the host, and publishes an immutable
//! [`TimelineSnapshot`] after every successful rebuild.
//!
//! Each notification maps to the cheapest rebuild that keeps the snapshot
//! correct:
//!
//! | change                    | work done                                  | event fired                    |
//! |---------------------------|--------------------------------------------|--------------------------------|
//! | `SourceChange::Outputs`   | invalidate changed groups, regroup, merge  | `EverythingChanged`            |
//! | `SourceChange::Visibility`| regroup (cache reused), merge              | `EverythingChanged`            |
//! | `SourceChange::ClockOffset`| realign, merge                            | `EverythingChanged`            |
//! | `SourceChange::Annotation`| name assignment only                       | `SequenceDiagramNamesChanged`  |

mod catalog;
mod names;
mod snapshot;
mod visualizer;

#[cfg(test)]
mod tests;

pub use catalog::{InMemoryCatalog, SourceCatalog, SourceEntry};
pub use names::{DisambiguatingNameAssigner, NameAssigner, NameRequest};
pub use snapshot::{TimeRange, TimelineSnapshot};
pub use visualizer::{ModelEvent, SourceChange, VisualizerModel};
