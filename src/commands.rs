//! CLI commands
//!
//! One-shot versions of what the hotkeys do, for scripting and for checking
//! which number a device has before pressing anything.

use color_eyre::eyre::Result;
use crossterm::style::Stylize;

use crate::config::Config;
use crate::directory::{self, Device};
use crate::help::{self, TerminalViewer};
use crate::hotkey::SWITCH_SLOTS;
use crate::style::AudioswStyle;
use crate::switcher;
use crate::tool::SoundVolumeView;

/// List render devices with their hotkey numbers
///
/// # Errors
/// Returns an error if JSON serialization fails. An unreachable tool just
/// yields an empty list.
pub fn list_devices(config: &Config, json_output: bool) -> Result<()> {
    let tool = SoundVolumeView::new(config.tool_path());
    let devices = directory::enumerate(&tool);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&devices)?);
        return Ok(());
    }

    print!("{}", format_device_list(&devices));

    if devices.is_empty() && !tool.path().exists() {
        println!(
            "\n{} {}",
            "SoundVolumeView not found:".error(),
            tool.path().display()
        );
    }

    Ok(())
}

/// Human-readable device table
fn format_device_list(devices: &[Device]) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "{}", "OUTPUT DEVICES:".header());
    let _ = writeln!(out, "{}", "-".repeat(15));

    if devices.is_empty() {
        let _ = writeln!(out, "  {}", "(none)".dim());
        return out;
    }

    for (i, device) in devices.iter().enumerate() {
        let hotkey = if i < SWITCH_SLOTS as usize {
            format!("Ctrl+Alt+{}", i + 1)
        } else {
            "(no hotkey)".to_string()
        };
        let _ = writeln!(out, "  {:<12}{}", hotkey, device.name.as_str().bold());
        let _ = writeln!(out, "              {}", device.id.as_str().technical());
    }
    out
}

/// Switch to the device at hotkey number `slot` (1-based)
///
/// # Errors
/// Never fails today; returns `Result` for symmetry with the other commands.
pub fn switch(config: &Config, slot: u8) -> Result<()> {
    let tool = SoundVolumeView::new(config.tool_path());
    let index = usize::from(slot.saturating_sub(1));

    match switcher::switch_by_ordinal(&tool, index) {
        Some(device) => println!("{} {}", "Switched to:".success(), device.name.as_str().bold()),
        None => println!("{}", format!("No device at position {slot}").warning()),
    }

    Ok(())
}

/// Open the hotkey help window once
///
/// # Errors
/// Returns an error if the help file cannot be written or the window cannot
/// be opened.
pub fn show_help(config: &Config) -> Result<()> {
    let tool = SoundVolumeView::new(config.tool_path());
    let path = help::show_help(&tool, &TerminalViewer)?;
    println!("{} {}", "Help file:".dim(), path.display());
    Ok(())
}
