//! `SoundVolumeView` integration
//!
//! All audio control goes through NirSoft's `SoundVolumeView.exe`:
//! - `/scomma ""`: comma-delimited dump of every sound item to stdout
//! - `/SetDefault <id> 0`: make a device the default for the console role
//!
//! The tool is treated as fire-and-forget. A missing executable or a failing
//! run degrades to "no output" instead of an error.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, trace};

// ============================================================================
// Constants
// ============================================================================

/// File name of the tool, looked up next to our own executable by default
pub const TOOL_FILE_NAME: &str = "SoundVolumeView.exe";

/// Arguments for a comma-delimited dump of all items to stdout
pub const ENUMERATE_ARGS: [&str; 2] = ["/scomma", ""];

/// Flag for setting the default device
pub const SET_DEFAULT_FLAG: &str = "/SetDefault";

/// Console role (0 = console, 1 = multimedia, 2 = communications)
pub const CONSOLE_ROLE: &str = "0";

// ============================================================================
// Runner Abstraction
// ============================================================================

/// Runs the external audio tool
///
/// Both methods swallow failures: `capture` returns `None` when nothing could
/// be captured, `run` only waits for the process to exit.
pub trait ToolRunner {
    /// Run the tool and capture its stdout as text
    fn capture(&self, args: &[&str]) -> Option<String>;

    /// Run the tool with stdout and stderr discarded
    fn run(&self, args: &[&str]);
}

/// The real `SoundVolumeView.exe`
#[derive(Debug, Clone)]
pub struct SoundVolumeView {
    path: PathBuf,
}

impl SoundVolumeView {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default location: next to the running executable, or bare file name
    /// (resolved through `PATH`) if our own location is unknown
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(TOOL_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(TOOL_FILE_NAME))
    }
}

impl ToolRunner for SoundVolumeView {
    fn capture(&self, args: &[&str]) -> Option<String> {
        let output = match Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                debug!("Could not start {}: {}", self.path.display(), e);
                return None;
            }
        };

        if !output.status.success() {
            // Still parse whatever was written before the failure
            debug!("{} exited with {}", self.path.display(), output.status);
        }

        trace!("{} wrote {} bytes", self.path.display(), output.stdout.len());
        Some(decode_lossy(&output.stdout))
    }

    fn run(&self, args: &[&str]) {
        let result = Command::new(&self.path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match result {
            Ok(status) if !status.success() => {
                debug!("{} {:?} exited with {}", self.path.display(), args, status);
            }
            Ok(_) => {}
            Err(e) => debug!("Could not start {}: {}", self.path.display(), e),
        }
    }
}

/// Decode tool output as UTF-8, dropping invalid bytes and a leading BOM
#[must_use]
pub fn decode_lossy(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}')
        .unwrap_or(&*text)
        .chars()
        .filter(|&c| c != char::REPLACEMENT_CHARACTER)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_lossy_drops_invalid_bytes() {
        let bytes = b"Type,Direction\nDevice,Ren\xffder\n";
        assert_eq!(decode_lossy(bytes), "Type,Direction\nDevice,Render\n");
    }

    #[test]
    fn test_decode_lossy_strips_bom() {
        let bytes = "\u{feff}Name,Type".as_bytes();
        assert_eq!(decode_lossy(bytes), "Name,Type");
    }

    #[test]
    fn test_missing_tool_captures_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let tool = SoundVolumeView::new(dir.path().join(TOOL_FILE_NAME));

        assert_eq!(tool.capture(&ENUMERATE_ARGS), None);
        // No panic, no error path
        tool.run(&[SET_DEFAULT_FLAG, "spk1", CONSOLE_ROLE]);
    }

    #[cfg(unix)]
    #[test]
    fn test_output_of_failing_run_is_still_parsed() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("svv.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\n\
             echo 'Type,Direction,Device Name,Command-Line Friendly ID'\n\
             echo 'Device,Render,Speakers,spk1'\n\
             exit 3\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let tool = SoundVolumeView::new(&script);

        assert_eq!(
            crate::directory::enumerate(&tool),
            vec![crate::directory::Device {
                name: "Speakers".to_string(),
                id: "spk1".to_string(),
            }]
        );
    }

    #[test]
    fn test_default_path_ends_with_tool_name() {
        assert!(SoundVolumeView::default_path().ends_with(TOOL_FILE_NAME));
    }
}
