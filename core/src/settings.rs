//! Persisted UI settings: sidebar collapse and dark mode.
//!
//! # Design
//! Settings are an explicit value owned by a `SettingsController` and handed
//! to whatever renders, not ambient global state. They are read once when the
//! controller opens and written back on every change through a
//! `SettingsStore`.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Viewports narrower than this are treated as mobile.
pub const MOBILE_BREAKPOINT: u32 = 768;

pub fn is_mobile(viewport_width: u32) -> bool {
    viewport_width < MOBILE_BREAKPOINT
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sidebar_collapsed: bool,
    pub dark_mode: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// Key-value persistence for `Settings`.
pub trait SettingsStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Settings>, SettingsError>;

    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Settings kept as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(settings)?)?;
        Ok(())
    }
}

/// In-process store, for tests and hosts without a filesystem.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    saved: RefCell<Option<Settings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Option<Settings> {
        *self.saved.borrow()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<Settings>, SettingsError> {
        Ok(*self.saved.borrow())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self.saved.borrow_mut() = Some(*settings);
        Ok(())
    }
}

/// Owns the current `Settings` and writes every change through its store.
#[derive(Debug)]
pub struct SettingsController<S> {
    store: S,
    current: Settings,
}

impl<S: SettingsStore> SettingsController<S> {
    /// Read stored settings once. A narrow viewport forces the sidebar
    /// collapsed; an unreadable store falls back to defaults.
    pub fn open(store: S, viewport_width: u32) -> Self {
        let mut current = match store.load() {
            Ok(stored) => stored.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable settings");
                Settings::default()
            }
        };
        current.sidebar_collapsed |= is_mobile(viewport_width);
        Self { store, current }
    }

    pub fn settings(&self) -> Settings {
        self.current
    }

    pub fn toggle_sidebar(&mut self) -> Result<Settings, SettingsError> {
        self.commit(Settings {
            sidebar_collapsed: !self.current.sidebar_collapsed,
            ..self.current
        })
    }

    pub fn toggle_dark_mode(&mut self) -> Result<Settings, SettingsError> {
        self.commit(Settings {
            dark_mode: !self.current.dark_mode,
            ..self.current
        })
    }

    /// Follow the viewport: collapse on mobile, expand on desktop.
    pub fn resize(&mut self, viewport_width: u32) -> Result<Settings, SettingsError> {
        let collapsed = is_mobile(viewport_width);
        if collapsed == self.current.sidebar_collapsed {
            return Ok(self.current);
        }
        self.commit(Settings {
            sidebar_collapsed: collapsed,
            ..self.current
        })
    }

    /// Adopt `next` only once the store has accepted it.
    fn commit(&mut self, next: Settings) -> Result<Settings, SettingsError> {
        self.store.save(&next)?;
        self.current = next;
        Ok(next)
    }
}
