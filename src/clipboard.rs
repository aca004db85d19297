//! Clipboard backends.
//!
//! The command handlers read and write whole strings through the
//! [`Clipboard`] trait. [`SystemClipboard`] talks to the desktop clipboard
//! via `arboard`; [`FileClipboard`] and [`MemoryClipboard`] serve headless
//! sessions and tests.

use crate::error::{ClipboardError, IoError, Result};
use std::path::{Path, PathBuf};

/// Whole-string clipboard access.
pub trait Clipboard {
    /// Reads the clipboard text. An empty clipboard reads as `""`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&mut self) -> Result<String>;

    /// Replaces the clipboard text.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Connects to the desktop clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if no clipboard is available (e.g. no display).
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().map_err(ClipboardError::from)?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn read(&mut self) -> Result<String> {
        match self.inner.get_text() {
            Ok(text) => Ok(text),
            // Images or nothing at all.
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ClipboardError::from(e).into()),
        }
    }

    fn write(&mut self, text: &str) -> Result<()> {
        self.inner
            .set_text(text)
            .map_err(|e| ClipboardError::from(e).into())
    }
}

/// A clipboard kept in a plain text file. A missing file reads as empty.
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    /// Uses the file at `path` as the clipboard.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Clipboard for FileClipboard {
    fn read(&mut self) -> Result<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(IoError::ReadFailed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
            .into()),
        }
    }

    fn write(&mut self, text: &str) -> Result<()> {
        std::fs::write(&self.path, text).map_err(|e| {
            IoError::WriteFailed {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// An in-process clipboard.
///
/// # Examples
///
/// ```
/// use replclip::clipboard::{Clipboard, MemoryClipboard};
///
/// let mut clip = MemoryClipboard::default();
/// clip.write("hello").unwrap();
/// assert_eq!(clip.contents(), "hello");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    text: String,
    writes: usize,
}

impl MemoryClipboard {
    /// Creates a clipboard holding `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            writes: 0,
        }
    }

    /// Returns the current text.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.text
    }

    /// Returns how many times the clipboard has been written.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl Clipboard for MemoryClipboard {
    fn read(&mut self) -> Result<String> {
        Ok(self.text.clone())
    }

    fn write(&mut self, text: &str) -> Result<()> {
        text.clone_into(&mut self.text);
        self.writes += 1;
        Ok(())
    }
}
