//! `audiosw` - Audio Switcher
//!
//! Switches the Windows default audio output device with global hotkeys.
//! Uses NirSoft `SoundVolumeView` for device discovery and switching.
//!
//! # Features
//! - `Ctrl+Alt+1`..`Ctrl+Alt+9` switch to the Nth output device
//! - `Ctrl+Alt+H` opens a help window listing the current bindings
//! - Device order is read fresh on every key press, never cached
//! - One-shot `list`, `switch` and `show-help` commands for scripting

pub mod cli;
pub mod config;
pub mod tool;
pub mod directory;
pub mod switcher;
pub mod hotkey;
pub mod help;
pub mod controller;
pub mod notification;
pub mod commands;
pub mod daemon;
pub mod logging;
pub mod style;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types for convenience
pub use cli::Args;
pub use config::Config;
pub use directory::Device;
