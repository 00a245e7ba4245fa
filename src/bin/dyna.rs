use anyhow::Result;
use clap::CommandFactory;
use hans_dyna::cli::{self, Cli};
use std::io;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let Some(command) = &cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let stdout = io::stdout();
    cli::run(command, cli.policy(), &mut stdout.lock())
}
