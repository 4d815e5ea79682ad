use crate::conf::discover::source_files;
use crate::conf::error::ConfigError;
use crate::conf::input::read_events;
use crate::conf::types::{SessionConfig, SourceConfig};
use crate::model::{InMemoryCatalog, SourceEntry};
use crate::output::{RotationToken, TimelineOutput};
use ahash::RandomState;
use chrono::TimeDelta;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const SESSION_FILE: &str = "timeweave.hcl";

/// Parsed configuration plus one catalog entry per input file.
#[derive(Debug)]
pub struct LoadedSession {
    pub config: SessionConfig,
    pub entries: Vec<SourceEntry>,
}

impl LoadedSession {
    pub fn into_catalog(self) -> InMemoryCatalog {
        InMemoryCatalog::new(self.entries)
    }
}

/// Reads and validates `timeweave.hcl` from `root`.
pub fn load_session_config(root: &Path) -> Result<SessionConfig, ConfigError> {
    let path = root.join(SESSION_FILE);
    let raw = fs::read_to_string(&path).map_err(|e| ConfigError::read_file(&path, e))?;
    let config: SessionConfig = hcl::from_str(&raw).map_err(|e| ConfigError::parse(&path, e))?;

    validate(&config)?;
    Ok(config)
}

fn validate(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.sources.is_empty() {
        return Err(ConfigError::NoSources);
    }

    let mut seen: HashSet<&str, RandomState> = HashSet::default();
    for source in &config.sources {
        if source.name.trim().is_empty() {
            return Err(ConfigError::EmptySourceName);
        }
        if !seen.insert(source.name.as_str()) {
            return Err(ConfigError::DuplicateSource {
                name: source.name.clone(),
            });
        }
    }

    Ok(())
}

/// Loads the session in `root`: config, file discovery and every input file.
pub fn load_session(root: &Path) -> Result<LoadedSession, ConfigError> {
    let config = load_session_config(root)?;

    let mut entries = Vec::new();
    for source in &config.sources {
        entries.extend(load_source(root, source)?);
    }

    tracing::debug!(
        sources = config.sources.len(),
        outputs = entries.len(),
        "session loaded"
    );

    Ok(LoadedSession { config, entries })
}

fn load_source(root: &Path, source: &SourceConfig) -> Result<Vec<SourceEntry>, ConfigError> {
    let files = source_files(root, source)?;

    files
        .iter()
        .map(|path| {
            let events = read_events(path)?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            if events.is_empty() {
                tracing::warn!(
                    source = %source.name,
                    file = %file_name,
                    "input file holds no records"
                );
            }

            let id = format!("{}/{}", source.name, file_name);
            let mut output = TimelineOutput::new(id, events);
            if source.rotated {
                output = output.with_rotation(RotationToken::new(&source.name, file_name));
            }

            let mut entry = SourceEntry::new(Arc::new(output))
                .with_display_name(&source.name)
                .with_clock_shift(TimeDelta::milliseconds(source.clock_shift_ms));
            if let Some(annotation) = &source.annotation {
                entry = entry.with_annotation(annotation);
            }
            if !source.visible {
                entry = entry.hidden();
            }
            Ok(entry)
        })
        .collect()
}
