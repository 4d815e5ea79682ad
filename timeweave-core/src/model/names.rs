use crate::error::CollaboratorError;
use crate::output::OutputId;
use ahash::RandomState;
use std::collections::HashMap;

/// Naming input for one visible source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRequest {
    pub source: OutputId,
    /// Index of the rotation group the source belongs to.
    pub group: usize,
    /// Name suggested by the group's terminal end-of-timeline record.
    pub suggested: Option<String>,
    pub display_name: String,
    pub annotation: Option<String>,
}

/// Assigns the names shown on sequence diagram lanes.
pub trait NameAssigner {
    fn assign_names(
        &self,
        requests: &[NameRequest],
    ) -> Result<HashMap<OutputId, String, RandomState>, CollaboratorError>;
}

/// One name per rotation group, preferring annotation, then the group's
/// suggestion, then the first member's display name. Later groups that
/// collide get a ` (2)`, ` (3)`, ... suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisambiguatingNameAssigner;

impl NameAssigner for DisambiguatingNameAssigner {
    fn assign_names(
        &self,
        requests: &[NameRequest],
    ) -> Result<HashMap<OutputId, String, RandomState>, CollaboratorError> {
        let mut groups: Vec<GroupName<'_>> = Vec::new();
        for request in requests {
            let annotation = request
                .annotation
                .as_deref()
                .filter(|a| !a.trim().is_empty());
            match groups.iter_mut().find(|g| g.group == request.group) {
                Some(existing) => {
                    existing.annotation = existing.annotation.or(annotation);
                }
                None => groups.push(GroupName {
                    group: request.group,
                    annotation,
                    suggested: request.suggested.as_deref(),
                    fallback: &request.display_name,
                }),
            }
        }

        let mut seen: HashMap<String, usize, RandomState> = HashMap::default();
        let mut group_names: HashMap<usize, String, RandomState> = HashMap::default();
        for group in groups {
            let base = group.base().to_string();
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            let name = match *count {
                1 => base,
                n => format!("{base} ({n})"),
            };
            group_names.insert(group.group, name);
        }

        Ok(requests
            .iter()
            .filter_map(|r| {
                group_names
                    .get(&r.group)
                    .map(|name| (r.source.clone(), name.clone()))
            })
            .collect())
    }
}

/// Naming facts of one rotation group, in order of first appearance.
struct GroupName<'a> {
    group: usize,
    /// First non-blank annotation among the group's members.
    annotation: Option<&'a str>,
    suggested: Option<&'a str>,
    fallback: &'a str,
}

impl GroupName<'_> {
    fn base(&self) -> &str {
        self.annotation.or(self.suggested).unwrap_or(self.fallback)
    }
}
