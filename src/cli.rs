//! Command-line interface definitions
//!
//! Uses clap for argument parsing with derive macros.

use clap::{Parser, Subcommand};

/// audiosw - Audio Switcher
///
/// Switch the default audio output device with global hotkeys.
#[derive(Parser)]
#[command(name = "audiosw")]
#[command(version)]
#[command(about = "Audio Switcher - Switch the default audio output device with global hotkeys")]
#[command(after_help = "\
BEHAVIOR:
  Run without a subcommand to register the hotkeys and wait for presses.
  The hotkey help window opens once at startup.

HOTKEYS:
  Ctrl+Alt+1 .. Ctrl+Alt+9   Switch to the 1st .. 9th output device
  Ctrl+Alt+H                 Show which device each hotkey selects

  Device order is whatever SoundVolumeView reports at the moment a key is
  pressed, so numbers can shift when devices are plugged in or removed.

SOUNDVOLUMEVIEW:
  Looked up next to audiosw.exe unless tool_path is set in config.toml.
  Devices are listed with /scomma and switched with /SetDefault <id> 0.")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Command {
    /// List output devices and their hotkey numbers
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Switch to the device bound to a hotkey number, once
    Switch {
        /// Hotkey number (1-9)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=9))]
        slot: u8,
    },

    /// Open the hotkey help window
    ShowHelp,

    /// Validate config file and print a summary
    Validate,
}
