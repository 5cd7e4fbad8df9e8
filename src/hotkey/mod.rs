//! Global hotkey bindings
//!
//! Ten fixed slots: `Ctrl+Alt+1`..`Ctrl+Alt+9` switch to the Nth output device,
//! `Ctrl+Alt+H` shows the help overlay. Slots resolve to devices only when
//! pressed, so the table itself never changes after startup.
//!
//! The OS listener sits behind [`HotkeySource`]; the Windows implementation
//! lives in the `win32` submodule.

#[cfg(windows)]
pub mod win32;

use color_eyre::eyre::{Context, Result};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

// ============================================================================
// Constants
// ============================================================================

/// Number of switch slots (`Ctrl+Alt+1`..`Ctrl+Alt+9`)
pub const SWITCH_SLOTS: u32 = 9;

/// Slot id of the help hotkey
pub const HELP_SLOT: Slot = Slot(10);

/// Key of the help hotkey
pub const HELP_KEY: char = 'H';

// ============================================================================
// Binding Types
// ============================================================================

/// Hotkey slot id as delivered by the OS (1..=10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(pub u32);

/// What a hotkey does when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Switch to the device at this zero-based position
    Switch(usize),
    /// Show the help overlay
    ShowHelp,
}

/// A key combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combo {
    pub ctrl: bool,
    pub alt: bool,
    /// Digit or uppercase ASCII letter
    pub key: char,
}

impl Combo {
    /// `Ctrl+Alt+<key>`
    #[must_use]
    pub const fn ctrl_alt(key: char) -> Self {
        Self {
            ctrl: true,
            alt: true,
            key,
        }
    }

    /// Windows virtual-key code (same as ASCII for digits and uppercase letters)
    #[must_use]
    pub fn virtual_key(&self) -> u32 {
        u32::from(self.key.to_ascii_uppercase())
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// A combo and the action it triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub combo: Combo,
    pub action: Action,
}

/// Immutable slot → binding map, built once at startup
#[derive(Debug, Clone)]
pub struct BindingTable {
    bindings: BTreeMap<Slot, Binding>,
}

impl BindingTable {
    /// The standard ten slots
    #[must_use]
    pub fn standard() -> Self {
        let mut bindings = BTreeMap::new();

        for n in 1..=SWITCH_SLOTS {
            let key = char::from_digit(n, 10).unwrap_or('0');
            bindings.insert(
                Slot(n),
                Binding {
                    combo: Combo::ctrl_alt(key),
                    action: Action::Switch((n - 1) as usize),
                },
            );
        }

        bindings.insert(
            HELP_SLOT,
            Binding {
                combo: Combo::ctrl_alt(HELP_KEY),
                action: Action::ShowHelp,
            },
        );

        Self { bindings }
    }

    /// Action bound to `slot`, if any
    #[must_use]
    pub fn action(&self, slot: Slot) -> Option<Action> {
        self.bindings.get(&slot).map(|b| b.action)
    }

    /// All bindings in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Binding)> {
        self.bindings.iter().map(|(slot, binding)| (*slot, binding))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for BindingTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// Hotkey Source
// ============================================================================

/// OS facility that delivers global hotkey presses
pub trait HotkeySource {
    /// Token returned by `register`, handed back to `unregister`
    type Handle;

    /// Register `combo` so that presses are delivered as `slot`
    ///
    /// # Errors
    /// Returns an error if the combo cannot be registered (typically because
    /// another application already owns it).
    fn register(&mut self, combo: &Combo, slot: Slot) -> Result<Self::Handle>;

    /// Release a registration
    ///
    /// # Errors
    /// Returns an error if the OS refuses to release the registration.
    fn unregister(&mut self, handle: Self::Handle) -> Result<()>;

    /// Block until the next hotkey press
    ///
    /// Returns `None` once the source has been closed.
    fn next_event(&mut self) -> Option<Slot>;
}

/// Hotkeys registered for the lifetime of this guard
///
/// Dropping the guard unregisters every hotkey it registered, including when
/// registration fails halfway or the event loop unwinds.
pub struct Registrations<'s, S: HotkeySource> {
    source: &'s mut S,
    handles: Vec<S::Handle>,
}

impl<'s, S: HotkeySource> Registrations<'s, S> {
    /// Register every binding in `table`
    ///
    /// # Errors
    /// Returns the first registration failure. Hotkeys registered before the
    /// failure are released before returning.
    pub fn acquire(source: &'s mut S, table: &BindingTable) -> Result<Self> {
        let mut registrations = Self {
            source,
            handles: Vec::with_capacity(table.len()),
        };

        for (slot, binding) in table.iter() {
            let handle = registrations
                .source
                .register(&binding.combo, slot)
                .wrap_err_with(|| format!("Failed to register hotkey {}", binding.combo))?;
            debug!("Registered {} as slot {}", binding.combo, slot.0);
            registrations.handles.push(handle);
        }

        Ok(registrations)
    }

    /// Number of hotkeys currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Block until the next hotkey press
    pub fn next_event(&mut self) -> Option<Slot> {
        self.source.next_event()
    }
}

impl<S: HotkeySource> Drop for Registrations<'_, S> {
    fn drop(&mut self) {
        let count = self.handles.len();
        while let Some(handle) = self.handles.pop() {
            if let Err(e) = self.source.unregister(handle) {
                warn!("Failed to unregister hotkey: {:#}", e);
            }
        }
        debug!("Released {} hotkeys", count);
    }
}
