use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use std::io;
use std::process;
use unburnt::cli::{Cli, Commands};
use unburnt::config::Config;
use unburnt::{logging, output};

fn main() {
    if let Err(e) = run() {
        output::error(&format!("{e:#}"));
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        print_completions(shell, &mut Cli::command());
        return Ok(());
    }

    let verbosity = cli.verbosity();
    output::set_verbosity(verbosity);
    if let Err(e) = logging::init(verbosity) {
        output::warning(&format!("Logging disabled: {e}"));
    }

    let config = Config::discover(cli.config.as_deref())?;
    let settings = cli.settings(&config)?;
    let summary = unburnt::run(settings)?;
    output::summary(&summary);

    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
