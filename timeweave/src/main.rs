use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timeweave_core::cli;
use timeweave_core::logging::{self, OutputMode, init_logging};

#[derive(Parser, Debug)]
#[command(
    name = "timeweave",
    version,
    about = "Timeweave: unified timelines from many log sources"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reconstruct and print the session timeline
    Show {
        /// Path to the session directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output as JSON
        #[arg(long, conflicts_with = "pretty")]
        json: bool,

        /// Output as a colored listing
        #[arg(long)]
        pretty: bool,
    },

    /// Session configuration tooling
    Config {
        #[command(subcommand)]
        cmd: cli::conf::ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Show { path, json, pretty } => {
            let mode = if json {
                OutputMode::Json
            } else if pretty {
                OutputMode::Pretty
            } else {
                logging::default_output_mode()
            };
            cli::show::run_show(path, mode)
        }

        Command::Config { cmd } => cli::conf::run(cmd),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("timeweave error: {e:#}");
        std::process::exit(1);
    }
}
