use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    //-------------------------------------------------------------------------
    // IO / Discovery
    //-------------------------------------------------------------------------
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("glob pattern error: {pattern}: {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("source '{name}' matched no files with '{pattern}'")]
    NoFiles { name: String, pattern: String },

    //-------------------------------------------------------------------------
    // Parsing
    //-------------------------------------------------------------------------
    #[error("invalid configuration file: {path}\n\n{source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: hcl::Error,
    },

    #[error("invalid input file {path}: {source}")]
    InputFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid record on line {line} of {path}: {source}")]
    InputLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    //-------------------------------------------------------------------------
    // Structure
    //-------------------------------------------------------------------------
    #[error("no sources defined")]
    NoSources,

    #[error("duplicate source definition: {name}")]
    DuplicateSource { name: String },

    #[error("source name must not be empty")]
    EmptySourceName,
}

impl ConfigError {
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: hcl::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn input_file(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::InputFile {
            path: path.into(),
            source,
        }
    }
}
