use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "fpxref",
    version,
    about = "Build path/attribute cross-reference tables from metadata files"
)]
pub struct Cli {
    /// TOML config file; a missing default file is ignored.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Select metadata files, assign identifiers and write the lookup tables.
    Build {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Fail instead of creating a missing output directory.
        #[arg(long = "no-create-output", action = ArgAction::SetTrue)]
        no_create_output: bool,
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Show which files fit the size budget without building anything.
    Select {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Re-read written lookup tables and check that they agree.
    Stats {
        output_dir: PathBuf,
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Cumulative size budget: bytes, or a K/M/G suffixed value such as 500M.
    #[arg(long)]
    pub budget: Option<String>,
}
