use crate::conf::error::ConfigError;
use crate::conf::types::SourceConfig;
use crate::grouping::natural_cmp;
use std::path::{Path, PathBuf};

/// Input files of one source, in natural path order so `app.9.json` loads
/// before `app.10.json`.
///
/// The source's `files` glob is resolved against the session directory.
/// Directories and unreadable matches are skipped.
///
/// # Errors
///
/// `ConfigError::Glob` for a malformed pattern, `ConfigError::NoFiles` when
/// nothing matches.
pub fn source_files(root: &Path, source: &SourceConfig) -> Result<Vec<PathBuf>, ConfigError> {
    let pattern = root.join(&source.files).to_string_lossy().into_owned();
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .map_err(|e| ConfigError::Glob {
            pattern: pattern.clone(),
            source: e,
        })?
        .filter_map(Result::ok)
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        return Err(ConfigError::NoFiles {
            name: source.name.clone(),
            pattern: source.files.clone(),
        });
    }

    files.sort_by(|a, b| natural_cmp(&a.to_string_lossy(), &b.to_string_lossy()));
    Ok(files)
}
