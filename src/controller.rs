//! Hotkey controller
//!
//! Registers the ten hotkeys, shows the help overlay once, then handles one
//! hotkey press at a time until the source closes. Every action runs to
//! completion before the next press is read, so nothing here needs locking.

use color_eyre::eyre::Result;
use tracing::{debug, error, info, warn};

use crate::help::{self, Viewer};
use crate::hotkey::{Action, BindingTable, HotkeySource, Registrations, Slot};
use crate::notification::{get_device_icon, send_notification, switch_message};
use crate::switcher;
use crate::tool::ToolRunner;

/// Dispatches hotkey presses to device switches and the help overlay
pub struct Controller<'a, T: ToolRunner, V: Viewer> {
    tool: &'a T,
    viewer: &'a V,
    bindings: BindingTable,
    notify_switch: bool,
}

impl<'a, T: ToolRunner, V: Viewer> Controller<'a, T, V> {
    #[must_use]
    pub fn new(tool: &'a T, viewer: &'a V, notify_switch: bool) -> Self {
        Self {
            tool,
            viewer,
            bindings: BindingTable::standard(),
            notify_switch,
        }
    }

    #[must_use]
    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    /// Register hotkeys on `source` and dispatch presses until it closes
    ///
    /// All hotkeys are released when this returns, on every path.
    ///
    /// # Errors
    /// Returns an error if any hotkey cannot be registered. Nothing stays
    /// registered in that case.
    pub fn run<S: HotkeySource>(&self, source: &mut S) -> Result<()> {
        let mut registrations = Registrations::acquire(source, &self.bindings)?;
        info!("Registered {} hotkeys", registrations.len());

        self.show_help();

        info!("Waiting for hotkeys...");
        while let Some(slot) = registrations.next_event() {
            self.dispatch(slot);
        }

        info!("Hotkey source closed");
        Ok(())
    }

    /// Run the action bound to `slot`; unbound slots are ignored
    pub fn dispatch(&self, slot: Slot) {
        match self.bindings.action(slot) {
            Some(Action::Switch(index)) => self.switch(index),
            Some(Action::ShowHelp) => self.show_help(),
            None => debug!("Ignoring unbound hotkey id {}", slot.0),
        }
    }

    fn switch(&self, index: usize) {
        let Some(device) = switcher::switch_by_ordinal(self.tool, index) else {
            return;
        };

        if self.notify_switch
            && let Err(e) = send_notification(
                "Audio Output",
                &switch_message(&device),
                Some(get_device_icon(&device)),
            )
        {
            warn!("Notification failed: {:#}", e);
        }
    }

    fn show_help(&self) {
        if let Err(e) = help::show_help(self.tool, self.viewer) {
            error!("Could not show hotkey help: {:#}", e);
        }
    }
}
