//! CLI command implementations.

pub mod config;
pub mod render;
pub mod script;
pub mod simulate;

use clap::{Args, Subcommand};

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Output file (default: stdout).
    #[arg(short, long)]
    pub out: Option<String>,

    /// Thumbnail to select before rendering.
    #[arg(long)]
    pub select: Option<usize>,

    /// Script steps to apply before rendering (see `simulate`).
    #[arg(long = "step", value_name = "STEP")]
    pub steps: Vec<String>,
}

/// Arguments for the simulate command.
#[derive(Args)]
pub struct SimulateArgs {
    /// Steps: select:N, inc, dec, add, wait:MS, fail-main, fail-thumb:N, unmount.
    #[arg(required = true, value_name = "STEP")]
    pub steps: Vec<String>,

    /// Run timers on the real clock instead of the virtual one.
    #[arg(long)]
    pub realtime: bool,

    /// Also write the final HTML snapshot to this file.
    #[arg(long)]
    pub html: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
