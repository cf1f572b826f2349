mod cli;
mod config;
mod logging;
mod run;

use std::io;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::{EnvOverrides, Resolver};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose || logging::env_flag());

    let file_config = config::load(cli.config.as_deref())?;
    let env = EnvOverrides::from_env();
    let resolver = Resolver {
        file: &file_config,
        env: &env,
    };
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Build {
            source,
            output,
            no_create_output,
            json,
        } => {
            let cfg = resolver.index_config(&source, output, no_create_output)?;
            run::build(&cfg, json, &mut stdout)
        }
        Command::Select { source, json } => {
            let input = resolver.input_dir(&source)?;
            let budget = resolver.size_budget(&source)?;
            run::select(&input, budget, json, &mut stdout)
        }
        Command::Stats { output_dir, json } => run::stats(&output_dir, json, &mut stdout),
    }
}
