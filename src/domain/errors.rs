// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for INI loading and storing.
//!
//! Every fallible operation in the crate returns [`IniError`]. Callers that
//! need to branch on the failure category should match on [`IniError::kind`]
//! rather than on the individual variants, which carry context and may grow.

use std::io;
use thiserror::Error;

/// The broad category of an [`IniError`].
///
/// # Examples
///
/// ```
/// use hexini::domain::errors::{ErrorKind, IniError};
///
/// let error = IniError::UnboundSource;
/// assert_eq!(error.kind(), ErrorKind::Unbound);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A zero-argument load or store found no bound file.
    Unbound,
    /// The underlying stream, file or locator failed.
    Transport,
    /// The input does not follow the INI grammar.
    MalformedStructure,
    /// An encoding name could not be resolved or a character could not be encoded.
    Encoding,
    /// A locator uses a scheme that no resolver handles.
    UnsupportedLocator,
    /// A setting override could not be interpreted.
    InvalidSetting,
}

/// The main error type for INI operations.
///
/// It is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IniError {
    /// `load` was asked to reuse the bound file but none is bound.
    #[error("No file is bound to load from")]
    UnboundSource,

    /// `store` was asked to reuse the bound file but none is bound.
    #[error("No file is bound to store to")]
    UnboundSink,

    /// An I/O error occurred while reading or writing.
    #[error("I/O error while {context}: {source}")]
    Transport {
        /// What the crate was doing when the error occurred
        context: String,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The grammar engine rejected the input.
    #[error("Malformed INI input at line {line}: {message}")]
    MalformedStructure {
        /// One-based line number where parsing failed
        line: usize,
        /// The error message
        message: String,
    },

    /// An encoding name did not resolve to a supported charset.
    #[error("Unsupported character encoding: {name}")]
    UnsupportedEncoding {
        /// The name that was requested
        name: String,
    },

    /// A character cannot be represented in the configured output encoding.
    #[error("Character {character:?} cannot be encoded as {charset}")]
    Unmappable {
        /// Canonical name of the target charset
        charset: &'static str,
        /// The offending character
        character: char,
    },

    /// No resolver exists for the locator's scheme.
    #[error("Unsupported locator: {url}")]
    UnsupportedLocator {
        /// The locator as given
        url: String,
    },

    /// A setting override has a value of the wrong shape.
    #[error("Invalid value {value:?} for setting {setting}: expected {expected}")]
    InvalidSetting {
        /// The setting being overridden
        setting: String,
        /// The rejected value
        value: String,
        /// What the setting accepts
        expected: &'static str,
    },

    /// A character sink refused a write.
    #[error("Failed to write formatted output")]
    Format(#[from] std::fmt::Error),
}

impl IniError {
    /// Creates a `Transport` error with a short description of the failed step.
    pub fn transport(context: impl Into<String>, source: io::Error) -> Self {
        IniError::Transport {
            context: context.into(),
            source,
        }
    }

    /// Creates a `MalformedStructure` error.
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        IniError::MalformedStructure {
            line,
            message: message.into(),
        }
    }

    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IniError::UnboundSource | IniError::UnboundSink => ErrorKind::Unbound,
            IniError::Transport { .. } | IniError::Format(_) => ErrorKind::Transport,
            IniError::MalformedStructure { .. } => ErrorKind::MalformedStructure,
            IniError::UnsupportedEncoding { .. } | IniError::Unmappable { .. } => {
                ErrorKind::Encoding
            }
            IniError::UnsupportedLocator { .. } => ErrorKind::UnsupportedLocator,
            IniError::InvalidSetting { .. } => ErrorKind::InvalidSetting,
        }
    }
}

impl From<io::Error> for IniError {
    fn from(err: io::Error) -> Self {
        IniError::transport("performing I/O", err)
    }
}

/// A specialized Result type for INI operations.
pub type Result<T> = std::result::Result<T, IniError>;
