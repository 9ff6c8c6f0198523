//! luaflow command-line entry point.

use clap::Parser;

use luaflow::cli::commands;
use luaflow::cli::{Cli, Commands};
use luaflow::{FlowError, Settings, logging};

fn main() {
    let cli = Cli::parse();

    // A missing input is reported before any settings file is read.
    if cli.command.is_none() && cli.render.input.is_none() {
        let e = FlowError::MissingArgument;
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code() as i32);
    }

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code() as i32);
        }
    };

    logging::init_with_config(&settings.logging);

    let result = match cli.command {
        Some(Commands::Init { force }) => commands::init::run_init(force),
        Some(Commands::Config) => commands::init::run_config(&settings),
        Some(Commands::Parse { file, output }) => commands::parse::run(&file, output),
        Some(Commands::Audit { file }) => commands::audit::run(&file),
        None => commands::render::run(&cli.render, settings).map(|_| ()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

/// Exit code of the first [`FlowError`] in the chain, 1 otherwise.
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<FlowError>())
        .map_or(1, |e| e.exit_code() as i32)
}
