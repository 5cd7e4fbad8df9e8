//! Logging setup
//!
//! One-shot commands log to stderr at `warn` unless `RUST_LOG` says otherwise.
//! The hotkey controller logs at the configured level and can additionally
//! write to `<local data dir>/audiosw/audiosw.log`, rotated at 1 MB.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::{ContextCompat, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer as _;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Settings;

/// Log file name inside the log directory
pub const LOG_FILE_NAME: &str = "audiosw.log";

/// Rotate once the log file reaches this size
pub const MAX_LOG_BYTES: u64 = 1_000_000;

/// Where the controller writes its log file
#[must_use]
pub fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("audiosw"))
}

/// [`log_dir`], or an error when the platform has no local data directory
///
/// # Errors
/// Returns an error if the local data directory is unknown.
pub fn require_log_dir() -> Result<PathBuf> {
    log_dir().context("Could not determine local data directory for log file")
}

/// Initialize logging for one-shot commands
pub fn init_cli() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Initialize logging for the hotkey controller
///
/// Returns the guard of the background file writer, which must be kept alive
/// for as long as logs should reach the file.
///
/// # Errors
/// Returns an error if file logging is enabled but no log directory exists.
pub fn init_controller(settings: &Settings) -> Result<Option<WorkerGuard>> {
    // "audiosw=LEVEL" keeps dependency noise out of the log
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("audiosw={}", settings.log_level)))
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(filter());

    if !settings.log_file {
        tracing_subscriber::registry().with(stderr_layer).init();
        return Ok(None);
    }

    let dir = require_log_dir()?;
    let appender = RotatingFileAppender::new(dir, LOG_FILE_NAME, MAX_LOG_BYTES);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(Some(guard))
}

/// A file appender that rotates logs based on size.
///
/// Keeps the active file plus one `.old` backup. The file is re-created if it
/// is deleted while the controller runs.
pub struct RotatingFileAppender {
    path: PathBuf,
    backup_path: PathBuf,
    max_size_bytes: u64,
    file: Mutex<Option<File>>,
}

impl RotatingFileAppender {
    /// Create an appender writing `dir/filename`, rotating at `max_size_bytes`
    pub fn new(dir: impl Into<PathBuf>, filename: &str, max_size_bytes: u64) -> Self {
        let dir = dir.into();
        Self {
            path: dir.join(filename),
            backup_path: dir.join(format!("{filename}.old")),
            max_size_bytes,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(path: &Path, append: bool) -> io::Result<File> {
        let mut options = fs::OpenOptions::new();
        options.create(true).write(true).append(append).truncate(!append);

        // Owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        options.open(path)
    }

    /// Current file, opened (and its directory created) on demand
    fn current<'a>(&self, slot: &'a mut Option<File>) -> io::Result<&'a mut File> {
        if !self.path.exists() {
            *slot = None;
        }

        if slot.is_none() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            *slot = Some(Self::open(&self.path, true)?);
        }

        slot.as_mut()
            .ok_or_else(|| io::Error::other("log file not open"))
    }

    /// current -> backup, then start an empty current file
    fn rotate(&self, slot: &mut Option<File>) -> io::Result<()> {
        *slot = None;
        if self.path.exists() {
            fs::rename(&self.path, &self.backup_path)?;
        }
        *slot = Some(Self::open(&self.path, false)?);
        Ok(())
    }
}

impl Write for RotatingFileAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut slot = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("Log mutex poisoned: {e}")))?;

        let size = match self.current(&mut *slot) {
            Ok(file) => file.metadata()?.len(),
            Err(_) => 0,
        };

        if size >= self.max_size_bytes
            && let Err(e) = self.rotate(&mut *slot)
        {
            eprintln!("Failed to rotate log file: {e}");
        }

        self.current(&mut *slot)?.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut slot = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("Log mutex poisoned: {e}")))?;

        if let Some(file) = slot.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appender_creates_missing_directory() {
        let temp = tempfile::tempdir().unwrap();
        let mut appender = RotatingFileAppender::new(temp.path().join("logs"), LOG_FILE_NAME, 1024);

        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        assert_eq!(fs::read_to_string(appender.path()).unwrap(), "hello\n");
    }

    #[test]
    fn test_appender_rotates_at_limit() {
        let temp = tempfile::tempdir().unwrap();
        let mut appender = RotatingFileAppender::new(temp.path(), LOG_FILE_NAME, 8);

        appender.write_all(b"0123456789\n").unwrap();
        appender.write_all(b"second\n").unwrap();
        appender.flush().unwrap();

        let backup = temp.path().join(format!("{LOG_FILE_NAME}.old"));
        assert_eq!(fs::read_to_string(backup).unwrap(), "0123456789\n");
        assert_eq!(fs::read_to_string(appender.path()).unwrap(), "second\n");
    }

    #[test]
    fn test_require_log_dir_matches_log_dir() {
        match log_dir() {
            Some(dir) => {
                assert_eq!(require_log_dir().unwrap(), dir);
                assert!(dir.ends_with("audiosw"));
            }
            None => assert!(require_log_dir().is_err()),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_appender_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let mut appender = RotatingFileAppender::new(temp.path(), LOG_FILE_NAME, 8);

        appender.write_all(b"0123456789\n").unwrap();
        appender.write_all(b"rotated\n").unwrap();

        for path in [appender.path().to_path_buf(), temp.path().join(format!("{LOG_FILE_NAME}.old"))] {
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600, "{}", path.display());
        }
    }

    #[test]
    fn test_appender_recreates_deleted_file() {
        let temp = tempfile::tempdir().unwrap();
        let mut appender = RotatingFileAppender::new(temp.path(), LOG_FILE_NAME, 1024);

        appender.write_all(b"first\n").unwrap();
        fs::remove_file(appender.path()).unwrap();
        appender.write_all(b"again\n").unwrap();
        appender.flush().unwrap();

        assert_eq!(fs::read_to_string(appender.path()).unwrap(), "again\n");
    }
}
