use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use timeweave_core::conf::SESSION_FILE;

/// Path of a checked-in session under `integration-tests/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

/// A session directory built on the fly in a temp dir.
pub struct TestSession {
    dir: TempDir,
}

impl TestSession {
    pub fn new(config: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SESSION_FILE), config).unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes one input file, one JSON record per entry in `records`.
    pub fn write_records(&self, name: &str, records: &[serde_json::Value]) -> &Self {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let lines: Vec<String> = records.iter().map(|r| r.to_string()).collect();
        fs::write(path, lines.join("\n")).unwrap();
        self
    }
}
