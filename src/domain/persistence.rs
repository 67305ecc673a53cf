// SPDX-License-Identifier: MIT OR Apache-2.0

//! The binding between a profile and the file it was loaded from.

use crate::domain::{IniError, Result};
use std::path::{Path, PathBuf};

/// Remembers which file a profile belongs to.
///
/// Binding is pure bookkeeping: no file is opened, created or checked. The
/// binding is consulted only when a load or store is asked to reuse it.
///
/// # Examples
///
/// ```
/// use hexini::domain::PersistenceHandle;
///
/// let mut handle = PersistenceHandle::default();
/// assert!(handle.current().is_none());
///
/// handle.bind("/etc/app.ini");
/// assert_eq!(handle.current().unwrap().to_str(), Some("/etc/app.ini"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistenceHandle {
    file: Option<PathBuf>,
}

impl PersistenceHandle {
    /// Creates a handle already bound to `path`.
    pub fn bound_to(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Some(path.into()),
        }
    }

    /// Binds the handle to `path`, replacing any previous binding.
    pub fn bind(&mut self, path: impl Into<PathBuf>) {
        self.file = Some(path.into());
    }

    /// Removes the binding.
    pub fn unbind(&mut self) -> Option<PathBuf> {
        self.file.take()
    }

    /// Returns the bound file, if any.
    pub fn current(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Returns the bound file or [`IniError::UnboundSource`].
    pub fn require_for_load(&self) -> Result<&Path> {
        self.current().ok_or(IniError::UnboundSource)
    }

    /// Returns the bound file or [`IniError::UnboundSink`].
    pub fn require_for_store(&self) -> Result<&Path> {
        self.current().ok_or(IniError::UnboundSink)
    }
}
