mod check;
mod dump;

pub use check::*;
use clap::Subcommand;
pub use dump::*;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate the session configuration and exit
    Check {
        /// Path to the session directory
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Print the resolved session configuration
    Dump {
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },
}

pub fn run(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { path } => check(path),
        ConfigCmd::Dump { path, json, yaml } => dump(path, json, yaml),
    }
}
