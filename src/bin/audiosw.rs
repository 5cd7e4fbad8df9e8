//! audiosw binary entry point
//!
//! Runs the hotkey controller when called without a subcommand, otherwise
//! dispatches to a one-shot command.

use audiosw::{cli::Args, cli::Command, commands, config::Config, daemon, logging};
use clap::Parser;
use color_eyre::eyre::Result;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    match args.command {
        // No subcommand - hotkey controller
        None => {
            let config = Config::load()?;
            // Keep the file writer alive until the controller stops
            let _log_guard = logging::init_controller(&config.settings)?;
            daemon::run(config).await
        }

        Some(Command::List { json }) => {
            logging::init_cli();
            let config = Config::load()?;
            commands::list_devices(&config, json)
        }

        Some(Command::Switch { slot }) => {
            logging::init_cli();
            let config = Config::load()?;
            commands::switch(&config, slot)
        }

        Some(Command::ShowHelp) => {
            logging::init_cli();
            let config = Config::load()?;
            commands::show_help(&config)
        }

        Some(Command::Validate) => {
            logging::init_cli();
            let config = Config::load()?;
            config.print_summary();
            Ok(())
        }
    }
}
