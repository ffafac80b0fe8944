use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::validate::parse_assignment;

#[derive(Parser)]
#[command(name = "signup", version, about = "User info form with live validation")]
pub struct Cli {
    /// Directory holding config.json5 / config.toml (overrides the platform default)
    #[arg(long, global = true, value_name = "DIR")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Run interactive TUI (default)
    Run,
    /// Validate values without a terminal UI; exits non-zero when the form is invalid
    Validate {
        /// `path=value` assignment, e.g. `firstName=Ann` or `phoneNumbers.1=0123456789`
        #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}
