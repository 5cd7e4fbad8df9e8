//! Help overlay
//!
//! Writes the current hotkey → device table to a temp file and opens it in a
//! separate console window that stays up until the user presses Enter. The
//! caller never waits for the window.

use color_eyre::eyre::{Context, Result};
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

use crate::directory::{self, Device};
use crate::hotkey::{Combo, HELP_KEY, SWITCH_SLOTS};
use crate::tool::ToolRunner;

const TITLE: &str = "Audio Switcher Hotkeys";
const SEPARATOR_WIDTH: usize = 30;
const CLOSE_PROMPT: &str = "Press Enter to close";

// ============================================================================
// Rendering
// ============================================================================

/// Render the help block for `devices`
///
/// Only the first nine devices get a hotkey; the rest are not listed.
#[must_use]
pub fn render(devices: &[Device]) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);
    let mut text = String::with_capacity(64 * (devices.len().min(9) + 4));

    let _ = writeln!(text, "{TITLE}");
    let _ = writeln!(text, "{separator}");
    for (i, device) in devices.iter().take(SWITCH_SLOTS as usize).enumerate() {
        let key = char::from_digit((i + 1) as u32, 10).unwrap_or('?');
        let _ = writeln!(text, "{} : {}", Combo::ctrl_alt(key), device.name);
    }
    let _ = writeln!(text, "{} : Show this help", Combo::ctrl_alt(HELP_KEY));
    let _ = writeln!(text, "{separator}");
    text.push('\n');
    text
}

// ============================================================================
// Viewer
// ============================================================================

/// Fire-and-forget display of a text file
pub trait Viewer {
    /// Start showing `path`; returns once the viewer process is launched
    ///
    /// # Errors
    /// Returns an error if the viewer process cannot be started.
    fn launch(&self, path: &Path) -> Result<()>;
}

/// Opens the file in a new terminal window
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalViewer;

impl TerminalViewer {
    /// PowerShell snippet that prints `path` and waits for Enter
    #[cfg_attr(not(windows), allow(dead_code))]
    fn powershell_script(path: &Path) -> String {
        // Single-quoted PowerShell literal: quotes are escaped by doubling
        let literal = path.display().to_string().replace('\'', "''");
        format!(
            "Get-Content -LiteralPath '{literal}' -Encoding UTF8; \
             Write-Host ''; \
             Read-Host '{CLOSE_PROMPT}'"
        )
    }

    /// `start` opens PowerShell in its own console, which supplies its stdio.
    /// Only the short-lived `cmd` gets null handles and no window.
    #[cfg(windows)]
    fn command(path: &Path) -> Command {
        use std::os::windows::process::CommandExt;

        const CREATE_NO_WINDOW: u32 = 0x0800_0000;

        let script = Self::powershell_script(path);
        let mut command = Command::new("cmd");
        command
            .raw_arg(format!("/C start \"\" powershell -NoProfile -Command \"{script}\""))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .creation_flags(CREATE_NO_WINDOW);
        command
    }

    /// The terminal emulator opens its own window, so our stdio is not shared
    #[cfg(not(windows))]
    fn command(path: &Path) -> Command {
        let script = format!("cat -- \"$1\"; echo; printf '%s' '{CLOSE_PROMPT}'; read -r _");

        let mut command = Command::new("x-terminal-emulator");
        command
            .args(["-e", "sh", "-c", &script, "sh"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

impl Viewer for TerminalViewer {
    fn launch(&self, path: &Path) -> Result<()> {
        let child = Self::command(path)
            .spawn()
            .context("Failed to open help window")?;

        debug!("Help window started (pid {})", child.id());
        Ok(())
    }
}

// ============================================================================
// Presenter
// ============================================================================

/// Write `text` to a new temp file that outlives this process
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_temp_file(text: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("audiosw-help-")
        .suffix(".txt")
        .tempfile()
        .context("Failed to create help file")?;

    file.write_all(text.as_bytes())
        .context("Failed to write help file")?;

    // Closed here; the viewer reads it after we return
    let (_file, path) = file.keep().context("Failed to keep help file")?;
    Ok(path)
}

/// Query devices, render the help block and open it in `viewer`
///
/// Returns the path of the temp file handed to the viewer. The file is
/// intentionally left behind for the viewer to read.
///
/// # Errors
/// Returns an error if the temp file cannot be written or the viewer fails to
/// start. Device discovery itself never fails.
pub fn show_help(tool: &impl ToolRunner, viewer: &impl Viewer) -> Result<PathBuf> {
    let devices = directory::enumerate(tool);
    let path = write_temp_file(&render(&devices))?;
    viewer.launch(&path)?;
    info!("Showing hotkey help ({} devices)", devices.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FakeTool, FakeViewer};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn devices(count: usize) -> Vec<Device> {
        (1..=count)
            .map(|i| Device {
                name: format!("Output {i}"),
                id: format!("out{i}"),
            })
            .collect()
    }

    fn device_lines(text: &str) -> Vec<&str> {
        text.lines()
            .filter(|l| l.starts_with("Ctrl+Alt+") && !l.starts_with("Ctrl+Alt+H"))
            .collect()
    }

    #[test]
    fn test_render_layout() {
        let text = render(&devices(2));
        assert_eq!(
            text,
            "Audio Switcher Hotkeys\n\
             ==============================\n\
             Ctrl+Alt+1 : Output 1\n\
             Ctrl+Alt+2 : Output 2\n\
             Ctrl+Alt+H : Show this help\n\
             ==============================\n\
             \n"
        );
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(9, 9)]
    #[case(10, 9)]
    #[case(25, 9)]
    fn test_render_caps_at_nine(#[case] count: usize, #[case] expected: usize) {
        let text = render(&devices(count));
        assert_eq!(device_lines(&text).len(), expected);
    }

    #[test]
    fn test_render_keeps_empty_names() {
        let list = vec![Device {
            name: String::new(),
            id: "x".to_string(),
        }];
        assert_eq!(device_lines(&render(&list)), vec!["Ctrl+Alt+1 : "]);
    }

    #[test]
    fn test_write_temp_file_persists_utf8() {
        let path = write_temp_file("スピーカー\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "スピーカー\n");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_show_help_launches_viewer_with_file() {
        let tool = FakeTool::with_output(
            "Type,Direction,Device Name,Command-Line Friendly ID\n\
             Device,Render,Speakers,spk1\n\
             Device,Render,Headphones,hp1\n",
        );
        let viewer = FakeViewer::default();

        let path = show_help(&tool, &viewer).unwrap();

        assert_eq!(viewer.launched(), vec![path.clone()]);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            device_lines(&text),
            vec!["Ctrl+Alt+1 : Speakers", "Ctrl+Alt+2 : Headphones"]
        );
        assert!(tool.runs().is_empty(), "help must not switch devices");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_powershell_script_escapes_quotes() {
        let script = TerminalViewer::powershell_script(Path::new("C:\\Users\\O'Brien\\help.txt"));
        assert!(script.contains("-LiteralPath 'C:\\Users\\O''Brien\\help.txt'"));
        assert!(script.contains("Read-Host"));
        assert!(!script.contains('"'));
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_viewer_runs_in_its_own_console() {
        let command = TerminalViewer::command(Path::new("C:\\Temp\\help.txt"));
        assert_eq!(command.get_program(), "cmd");

        let args: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let line = args.join(" ");
        assert!(line.starts_with("/C start \"\" powershell"), "{line}");
        assert!(line.contains("'C:\\Temp\\help.txt'"), "{line}");
    }

    #[cfg(not(windows))]
    #[test]
    fn test_terminal_viewer_passes_path_as_argument() {
        let command = TerminalViewer::command(Path::new("/tmp/it's help.txt"));
        assert_eq!(command.get_program(), "x-terminal-emulator");

        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args.last().copied(), Some(std::ffi::OsStr::new("/tmp/it's help.txt")));
        assert_eq!(args[..3], ["-e", "sh", "-c"]);
    }

    #[test]
    fn test_show_help_reports_viewer_failure() {
        let tool = FakeTool::unreachable();
        let viewer = FakeViewer::failing();

        assert!(show_help(&tool, &viewer).is_err());
    }
}
