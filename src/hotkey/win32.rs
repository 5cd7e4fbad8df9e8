//! Win32 hotkey source
//!
//! Uses `RegisterHotKey` with no window, so `WM_HOTKEY` lands in the calling
//! thread's message queue. Registration, `GetMessageW` and unregistration must
//! all happen on the thread that created the source.

use color_eyre::eyre::{Context, Result};
use std::marker::PhantomData;
use tracing::{debug, error};
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    HOT_KEY_MODIFIERS, MOD_ALT, MOD_CONTROL, RegisterHotKey, UnregisterHotKey,
};
use windows::Win32::UI::WindowsAndMessaging::{
    GetMessageW, MSG, PM_NOREMOVE, PeekMessageW, PostThreadMessageW, WM_HOTKEY, WM_QUIT, WM_USER,
};

use super::{Combo, HotkeySource, Slot};

/// Hotkey source bound to the current thread's message queue
pub struct Win32HotkeySource {
    thread_id: u32,
    // Thread-affine: must not leave the thread that created it
    _not_send: PhantomData<*const ()>,
}

/// Wakes a blocked [`Win32HotkeySource`] from another thread
#[derive(Debug, Clone, Copy)]
pub struct QuitHandle {
    thread_id: u32,
}

impl Win32HotkeySource {
    /// Create a source on the current thread
    #[must_use]
    pub fn new() -> Self {
        // Force creation of the thread message queue so a quit request posted
        // before the first GetMessageW is not lost
        let mut msg = MSG::default();
        unsafe {
            let _ = PeekMessageW(&mut msg, None, WM_USER, WM_USER, PM_NOREMOVE);
        }

        let thread_id = unsafe { GetCurrentThreadId() };
        debug!("Hotkey message queue on thread {}", thread_id);

        Self {
            thread_id,
            _not_send: PhantomData,
        }
    }

    #[must_use]
    pub fn quit_handle(&self) -> QuitHandle {
        QuitHandle {
            thread_id: self.thread_id,
        }
    }
}

impl Default for Win32HotkeySource {
    fn default() -> Self {
        Self::new()
    }
}

impl QuitHandle {
    /// Make the source's `next_event` return `None`
    ///
    /// # Errors
    /// Returns an error if the message cannot be posted (the thread is gone).
    pub fn quit(&self) -> Result<()> {
        unsafe { PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }
            .context("Failed to post quit message to hotkey thread")
    }
}

fn modifiers(combo: &Combo) -> HOT_KEY_MODIFIERS {
    let mut modifiers = HOT_KEY_MODIFIERS(0);
    if combo.ctrl {
        modifiers = modifiers | MOD_CONTROL;
    }
    if combo.alt {
        modifiers = modifiers | MOD_ALT;
    }
    modifiers
}

impl HotkeySource for Win32HotkeySource {
    type Handle = i32;

    fn register(&mut self, combo: &Combo, slot: Slot) -> Result<i32> {
        let id = i32::try_from(slot.0).context("Hotkey slot out of range")?;

        unsafe { RegisterHotKey(None, id, modifiers(combo), combo.virtual_key()) }
            .with_context(|| format!("{combo} is already in use by another application"))?;

        Ok(id)
    }

    fn unregister(&mut self, handle: i32) -> Result<()> {
        unsafe { UnregisterHotKey(None, handle) }
            .with_context(|| format!("UnregisterHotKey failed for id {handle}"))
    }

    fn next_event(&mut self) -> Option<Slot> {
        let mut msg = MSG::default();
        loop {
            let ret = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            match ret.0 {
                0 => {
                    debug!("Hotkey thread received WM_QUIT");
                    return None;
                }
                -1 => {
                    error!("GetMessageW failed: {}", windows::core::Error::from_win32());
                    return None;
                }
                _ => {}
            }

            if msg.message == WM_HOTKEY {
                return u32::try_from(msg.wParam.0).ok().map(Slot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_alt_modifiers() {
        let m = modifiers(&Combo::ctrl_alt('1'));
        assert_eq!(m, MOD_CONTROL | MOD_ALT);
    }

    #[test]
    fn test_quit_wakes_source() {
        let mut source = Win32HotkeySource::new();
        source.quit_handle().quit().unwrap();
        assert_eq!(source.next_event(), None);
    }
}
