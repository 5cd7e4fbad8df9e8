//! Desktop notifications
//!
//! Confirms hotkey switches via notify-rust, with an icon guessed from the
//! device name using `FreeDesktop` standard icon names. Icon names only apply
//! on Linux/BSD notification servers; Windows toasts show the app icon.

use color_eyre::eyre::{Context, Result};
use notify_rust::Notification;

use crate::directory::Device;

/// Generic audio icon used when no device-specific icon is given
const DEFAULT_ICON: &str = "audio-card";

/// Send a desktop notification
///
/// # Errors
/// Returns an error if the notification cannot be shown.
pub fn send_notification(summary: &str, body: &str, icon: Option<&str>) -> Result<()> {
    let mut notification = Notification::new();
    notification
        .summary(summary)
        .body(body)
        .appname("Audio Switcher")
        .timeout(3000);

    if let Some(icon) = themed_icon(icon) {
        notification.icon(icon);
    }

    notification.show().context("Failed to show notification")?;

    Ok(())
}

/// Icon name to attach, falling back to a generic audio icon
///
/// `None` on platforms whose notifications ignore themed icon names.
fn themed_icon(icon: Option<&str>) -> Option<&str> {
    if cfg!(all(unix, not(target_os = "macos"))) {
        Some(icon.unwrap_or(DEFAULT_ICON))
    } else {
        None
    }
}

/// Pick an icon for a device from its display name
#[must_use]
pub fn get_device_icon(device: &Device) -> &'static str {
    let name = device.name.to_lowercase();

    if name.contains("hdmi")
        || name.contains("tv")
        || name.contains("display")
        || name.contains("monitor")
    {
        "video-display"
    } else if name.contains("headphone")
        || name.contains("headset")
        || name.contains("bluetooth")
        || name.contains("earbuds")
    {
        "audio-headphones"
    } else {
        // Default for speakers, optical, digital, etc.
        "audio-speakers"
    }
}

/// Body text for a switch confirmation
#[must_use]
pub fn switch_message(device: &Device) -> String {
    if device.name.is_empty() {
        device.id.clone()
    } else {
        device.name.clone()
    }
}
