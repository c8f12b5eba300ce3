//! Persistence boundaries: document storage and the autosave slot.
//!
//! The store serializes documents to JSON text and hands them to these
//! traits; what sits behind them (a file, a browser download, a test
//! buffer) is the embedder's business. Autosave is best-effort — failures
//! are logged and swallowed, never surfaced to the user.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no file selected")]
    NoFile,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Document save/load boundary.
pub trait Storage {
    /// Save to the current target, or fall through to `save_as_text` when
    /// no target has been chosen yet.
    fn save_text(&mut self, text: &str) -> Result<(), StorageError>;
    /// Save to a (newly chosen) target, remembering it for future saves.
    fn save_as_text(&mut self, text: &str) -> Result<(), StorageError>;
    /// Load the document text from the current target.
    fn load_text(&mut self) -> Result<String, StorageError>;
}

/// Fixed-slot autosave boundary. Best-effort by contract.
pub trait Autosave {
    fn get(&self) -> Option<String>;
    fn set(&self, text: &str);
}

// ─── File-backed implementations ─────────────────────────────────────────

/// Storage against a single file path, remembered after the first
/// save-as so later saves overwrite without re-prompting.
pub struct FileStorage {
    path: Option<PathBuf>,
}

impl FileStorage {
    pub fn new() -> Self {
        Self { path: None }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// The embedder's file picker lands here.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for FileStorage {
    fn save_text(&mut self, text: &str) -> Result<(), StorageError> {
        match &self.path {
            Some(path) => Ok(fs::write(path, text)?),
            None => Err(StorageError::NoFile),
        }
    }

    fn save_as_text(&mut self, text: &str) -> Result<(), StorageError> {
        // Without a picker (out of scope) save-as needs a pre-set path.
        self.save_text(text)
    }

    fn load_text(&mut self) -> Result<String, StorageError> {
        match &self.path {
            Some(path) => Ok(fs::read_to_string(path)?),
            None => Err(StorageError::NoFile),
        }
    }
}

/// Autosave into a fixed slot file. All failures are swallowed.
pub struct FileAutosave {
    slot: PathBuf,
}

impl FileAutosave {
    pub fn new(slot: impl Into<PathBuf>) -> Self {
        Self { slot: slot.into() }
    }
}

impl Autosave for FileAutosave {
    fn get(&self) -> Option<String> {
        fs::read_to_string(&self.slot).ok()
    }

    fn set(&self, text: &str) {
        if let Err(err) = fs::write(&self.slot, text) {
            log::warn!("autosave write failed: {err}");
        }
    }
}

// ─── In-memory implementations (tests, embedding without a filesystem) ───

#[derive(Default)]
pub struct MemoryStorage {
    pub saved: Option<String>,
}

impl Storage for MemoryStorage {
    fn save_text(&mut self, text: &str) -> Result<(), StorageError> {
        self.saved = Some(text.to_string());
        Ok(())
    }

    fn save_as_text(&mut self, text: &str) -> Result<(), StorageError> {
        self.save_text(text)
    }

    fn load_text(&mut self) -> Result<String, StorageError> {
        self.saved.clone().ok_or(StorageError::NoFile)
    }
}

#[derive(Default)]
pub struct MemoryAutosave {
    slot: RefCell<Option<String>>,
}

impl Autosave for MemoryAutosave {
    fn get(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn set(&self, text: &str) {
        *self.slot.borrow_mut() = Some(text.to_string());
    }
}
