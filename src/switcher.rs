//! Default device switching
//!
//! `/SetDefault` gives no usable feedback, so a failed switch is invisible to
//! callers. Slot lookups past the end of the device list are a no-op.

use tracing::{debug, info};

use crate::directory::{self, Device};
use crate::tool::{CONSOLE_ROLE, SET_DEFAULT_FLAG, ToolRunner};

/// Make `device_id` the default output for the console role
pub fn set_default(tool: &impl ToolRunner, device_id: &str) {
    debug!("Setting default device: {}", device_id);
    tool.run(&[SET_DEFAULT_FLAG, device_id, CONSOLE_ROLE]);
}

/// Switch to the device at `index` (zero-based) in a fresh snapshot
///
/// Returns the device that was switched to, or `None` if the snapshot has no
/// device at `index`.
pub fn switch_by_ordinal(tool: &impl ToolRunner, index: usize) -> Option<Device> {
    let mut devices = directory::enumerate(tool);
    if index >= devices.len() {
        debug!(
            "No device at position {} ({} available), ignoring",
            index + 1,
            devices.len()
        );
        return None;
    }

    let device = devices.swap_remove(index);
    set_default(tool, &device.id);
    info!("Switched to: {}", device.name);
    Some(device)
}
