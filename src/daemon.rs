//! Hotkey daemon
//!
//! Runs the controller on a dedicated blocking thread (the Win32 hotkey queue
//! is per-thread) while the async side waits for Ctrl+C. On Ctrl+C the hotkey
//! thread is told to quit, which ends the loop and releases every hotkey.

use color_eyre::eyre::{Context, Result};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::Config;

/// Run the hotkey controller until interrupted
///
/// # Errors
/// Returns an error if a hotkey cannot be registered or the hotkey thread
/// fails.
#[cfg(windows)]
pub async fn run(config: Config) -> Result<()> {
    use tokio::sync::oneshot;

    use crate::controller::Controller;
    use crate::help::TerminalViewer;
    use crate::hotkey::win32::Win32HotkeySource;
    use crate::tool::SoundVolumeView;

    info!("Starting audiosw");
    let tool = SoundVolumeView::new(config.tool_path());
    info!("Using {}", tool.path().display());
    if !tool.path().exists() {
        warn!("{} does not exist; no devices will be found", tool.path().display());
    }

    let notify_switch = config.settings.notify_switch;
    let (quit_tx, quit_rx) = oneshot::channel();

    let mut worker = tokio::task::spawn_blocking(move || {
        let mut source = Win32HotkeySource::new();
        let _ = quit_tx.send(source.quit_handle());

        Controller::new(&tool, &TerminalViewer, notify_switch).run(&mut source)
    });

    let quit = quit_rx
        .await
        .context("Hotkey thread exited before starting")?;

    let finished = tokio::select! {
        result = &mut worker => Some(result),
        _ = signal::ctrl_c() => None,
    };

    match finished {
        Some(result) => result.context("Hotkey thread panicked")?,
        None => stop_worker(|| quit.quit(), worker).await,
    }
}

/// Global hotkeys are only implemented for Windows
///
/// # Errors
/// Always returns an error.
#[cfg(not(windows))]
#[allow(clippy::unused_async)]
pub async fn run(_config: Config) -> Result<()> {
    color_eyre::eyre::bail!(
        "Global hotkeys are only supported on Windows.\n\
         Use 'audiosw list' or 'audiosw switch <N>' instead."
    )
}

/// Ask the hotkey thread to stop and wait for its result
///
/// A failed quit request is logged and the worker is still awaited. A second
/// Ctrl+C stops waiting.
#[cfg_attr(not(windows), allow(dead_code))]
async fn stop_worker(
    quit: impl FnOnce() -> Result<()>,
    mut worker: JoinHandle<Result<()>>,
) -> Result<()> {
    info!("Shutting down");
    if let Err(e) = quit() {
        warn!("{:#}", e);
    }

    tokio::select! {
        result = &mut worker => result.context("Hotkey thread panicked")?,
        _ = signal::ctrl_c() => {
            color_eyre::eyre::bail!("Interrupted again before the hotkey thread finished")
        }
    }
}
