//! Render device discovery
//!
//! Parses the `SoundVolumeView /scomma` table into the ordered list of output
//! devices. Every call is a fresh snapshot; nothing is cached between hotkey
//! presses, so slot numbers follow whatever order the tool reports right now.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::tool::{ENUMERATE_ARGS, ToolRunner};

// ============================================================================
// SoundVolumeView Table Rows (from /scomma)
// ============================================================================

/// One row of `/scomma` output - uses permissive deserialization
///
/// Only the columns we need are mapped; the tool emits many more.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SvvRow {
    #[serde(rename = "Type")]
    item_type: Option<String>,
    #[serde(rename = "Direction")]
    direction: Option<String>,
    #[serde(rename = "Device Name")]
    device_name: Option<String>,
    #[serde(rename = "Command-Line Friendly ID")]
    command_line_id: Option<String>,
    #[serde(rename = "Item ID")]
    item_id: Option<String>,
}

impl SvvRow {
    fn is_render_device(&self) -> bool {
        self.item_type.as_deref() == Some("Device") && self.direction.as_deref() == Some("Render")
    }

    /// Command-line friendly ID, falling back to the item ID
    fn resolve_id(&self) -> Option<String> {
        [&self.command_line_id, &self.item_id]
            .into_iter()
            .flatten()
            .map(|id| id.trim())
            .find(|id| !id.is_empty())
            .map(String::from)
    }
}

// ============================================================================
// Device Types
// ============================================================================

/// An audio output device, as reported by the tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    /// Display name, may be empty
    pub name: String,
    /// Identifier accepted by `/SetDefault`, never empty
    pub id: String,
}

// ============================================================================
// Discovery
// ============================================================================

/// Query the tool for the current render devices
///
/// Never fails: an unreachable tool or unreadable output yields an empty list.
pub fn enumerate(tool: &impl ToolRunner) -> Vec<Device> {
    let Some(output) = tool.capture(&ENUMERATE_ARGS) else {
        return Vec::new();
    };
    parse_devices(&output)
}

/// Parse `/scomma` output into render devices, keeping the tool's order
#[must_use]
pub fn parse_devices(output: &str) -> Vec<Device> {
    if output.trim().is_empty() {
        return Vec::new();
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(output.as_bytes());

    let devices: Vec<Device> = reader
        .deserialize::<SvvRow>()
        .filter_map(|row| match row {
            Ok(row) => Some(row),
            Err(e) => {
                trace!("Skipping unreadable row: {}", e);
                None
            }
        })
        .filter(SvvRow::is_render_device)
        .filter_map(|row| {
            let id = row.resolve_id()?;
            Some(Device {
                name: row.device_name.unwrap_or_default(),
                id,
            })
        })
        .collect();

    debug!("Found {} render devices", devices.len());
    devices
}
