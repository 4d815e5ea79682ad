//! Session Configuration
//!
//! A session directory holds `timeweave.hcl`, which names the log sources to
//! load and where their files live:
//!
//! ```text
//! timeweave.hcl
//!   load_session_config (parse + validate)
//!   SessionConfig
//!   source_files (glob per source)
//!   read_events (JSON array or JSON lines per file)
//!   LoadedSession (catalog entries)
//! ```

mod discover;
pub mod error;
mod input;
mod loader;
pub mod types;


pub use error::ConfigError;
pub use input::read_events;
pub use loader::{LoadedSession, SESSION_FILE, load_session, load_session_config};
pub use types::{SessionConfig, SourceConfig};
