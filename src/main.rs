use std::error::Error;

use ado_mirror::{
    cli::{
        args::{CliArgs, Command},
        command_handlers::{do_connection, do_fetch, do_icon},
    },
    config::MirrorConfig,
};
use clap::Parser;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli_args: CliArgs = CliArgs::parse();

    match cli_args.cmd {
        Command::Fetch(args) => {
            let config = MirrorConfig::load(cli_args.config)?;
            do_fetch(args, config)
        }
        Command::Connection => do_connection(),
        Command::Icon => do_icon(),
    }
}
