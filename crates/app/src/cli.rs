//! Command-line interface

use clap::{Args, Parser, Subcommand};

/// Pick a pixel color from any monitor
#[derive(Parser, Debug)]
#[command(name = "colorpick", version, about = "Pick a pixel color from any monitor")]
pub struct Cli {
    /// Show debug logging on the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the overlay on every monitor and pick a color (default)
    Pick(PickArgs),
    /// Show or change the color format
    Format {
        /// Format name, see `colorpick formats`
        name: Option<String>,
    },
    /// List the available color formats
    Formats,
}

#[derive(Args, Debug, Default)]
pub struct PickArgs {
    /// Select and remember a color format before picking
    #[arg(short, long, value_name = "NAME")]
    pub format: Option<String>,

    /// Also print the picked color to stdout
    #[arg(short, long)]
    pub print: bool,
}
