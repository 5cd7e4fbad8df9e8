#![allow(dead_code)]
//! In-crate test doubles for the external tool, the help viewer and the OS
//! hotkey listener.

use color_eyre::eyre::{self, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::help::Viewer;
use crate::hotkey::{Combo, HotkeySource, Slot};
use crate::tool::{SET_DEFAULT_FLAG, ToolRunner};

/// Scripted `SoundVolumeView` that records every invocation
pub(crate) struct FakeTool {
    output: RefCell<Option<String>>,
    captures: RefCell<Vec<Vec<String>>>,
    runs: RefCell<Vec<Vec<String>>>,
}

impl FakeTool {
    /// Tool whose `/scomma` dump prints `output`
    pub fn with_output(output: &str) -> Self {
        Self {
            output: RefCell::new(Some(output.to_string())),
            captures: RefCell::default(),
            runs: RefCell::default(),
        }
    }

    /// Tool that cannot be started
    pub fn unreachable() -> Self {
        Self {
            output: RefCell::new(None),
            captures: RefCell::default(),
            runs: RefCell::default(),
        }
    }

    /// Replace the dump returned by later captures
    pub fn set_output(&self, output: &str) {
        *self.output.borrow_mut() = Some(output.to_string());
    }

    pub fn captures(&self) -> Vec<Vec<String>> {
        self.captures.borrow().clone()
    }

    pub fn runs(&self) -> Vec<Vec<String>> {
        self.runs.borrow().clone()
    }

    /// Device ids passed to `/SetDefault`, in order
    pub fn switched_to(&self) -> Vec<String> {
        self.runs
            .borrow()
            .iter()
            .filter(|args| args.first().map(String::as_str) == Some(SET_DEFAULT_FLAG))
            .filter_map(|args| args.get(1).cloned())
            .collect()
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

impl ToolRunner for FakeTool {
    fn capture(&self, args: &[&str]) -> Option<String> {
        self.captures.borrow_mut().push(owned(args));
        self.output.borrow().clone()
    }

    fn run(&self, args: &[&str]) {
        // An unreachable tool still "runs" as far as the caller can tell
        self.runs.borrow_mut().push(owned(args));
    }
}

/// Viewer that records the files it was asked to show
#[derive(Default)]
pub(crate) struct FakeViewer {
    fail: bool,
    launched: RefCell<Vec<PathBuf>>,
}

impl FakeViewer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            launched: RefCell::default(),
        }
    }

    pub fn launched(&self) -> Vec<PathBuf> {
        self.launched.borrow().clone()
    }
}

impl Viewer for FakeViewer {
    fn launch(&self, path: &Path) -> Result<()> {
        if self.fail {
            eyre::bail!("no terminal available");
        }
        self.launched.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

/// Hotkey source replaying a fixed list of presses, then closing
pub(crate) struct FakeSource {
    events: VecDeque<Slot>,
    fail_on: Option<Slot>,
    registered: Vec<Slot>,
    combos: Vec<Combo>,
    unregistered: Vec<Slot>,
}

impl FakeSource {
    pub fn new(events: Vec<Slot>) -> Self {
        Self {
            events: events.into(),
            fail_on: None,
            registered: Vec::new(),
            combos: Vec::new(),
            unregistered: Vec::new(),
        }
    }

    /// Refuse to register `slot`, as if another application owned it
    #[must_use]
    pub fn failing_on(mut self, slot: Slot) -> Self {
        self.fail_on = Some(slot);
        self
    }

    pub fn registered(&self) -> Vec<Slot> {
        self.registered.clone()
    }

    pub fn combos(&self) -> Vec<Combo> {
        self.combos.clone()
    }

    pub fn unregistered(&self) -> Vec<Slot> {
        self.unregistered.clone()
    }

    /// Slots registered and not yet released
    pub fn active(&self) -> Vec<Slot> {
        self.registered
            .iter()
            .filter(|slot| !self.unregistered.contains(slot))
            .copied()
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl HotkeySource for FakeSource {
    type Handle = Slot;

    fn register(&mut self, combo: &Combo, slot: Slot) -> Result<Slot> {
        if self.fail_on == Some(slot) {
            eyre::bail!("{combo} is already in use by another application");
        }
        self.registered.push(slot);
        self.combos.push(*combo);
        Ok(slot)
    }

    fn unregister(&mut self, handle: Slot) -> Result<()> {
        self.unregistered.push(handle);
        Ok(())
    }

    fn next_event(&mut self) -> Option<Slot> {
        self.events.pop_front()
    }
}
