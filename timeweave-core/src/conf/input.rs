use crate::conf::error::ConfigError;
use crate::event::Event;
use std::fs;
use std::path::Path;

/// Reads the records of one input file.
///
/// A file whose first non-blank character is `[` is one JSON array; any
/// other file holds one JSON record per line. Blank lines are skipped.
pub fn read_events(path: &Path) -> Result<Vec<Event>, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(&raw).map_err(|e| ConfigError::input_file(path, e));
    }

    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| ConfigError::InputLine {
                path: path.to_path_buf(),
                line: i + 1,
                source: e,
            })
        })
        .collect()
}
