// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encoding-aware loading and storing of INI files.
//!
//! This crate reads INI data from byte streams, text, files and locators into
//! an in-memory profile and writes it back out. Byte streams of unknown
//! encoding are probed for a byte-order mark (UTF-8, UTF-16BE, UTF-16LE) so
//! that they are decoded exactly once with the right encoding.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types (`Config`, `Charset`, `Profile`, `PersistenceHandle`, errors)
//! - **Ports**: Trait definitions for the collaborators (`IniParser`, `IniHandler`)
//! - **Adapters**: The default parser and formatter, and locator resolution
//! - **Service**: `Ini`, which runs the load and store pipeline
//!
//! # Feature Flags
//!
//! - `http`: Load from `http:` and `https:` locators
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hexini::prelude::*;
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! // Files are decoded with the configured encoding
//! let mut ini = Ini::open("/etc/myapp/settings.ini")?;
//! ini.put("server", "port", Some("8080"));
//! ini.save()?;
//!
//! // Load bytes of unknown encoding; a byte-order mark selects the decoder
//! let bytes: &[u8] = b"\xEF\xBB\xBF[server]\nport = 8080\n";
//! let ini = Ini::from_reader(bytes)?;
//! assert_eq!(ini.config().file_encoding(), Charset::Utf8);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{DefaultIniParser, IniFormatter};
    pub use crate::domain::{
        Charset, Config, ErrorKind, IniError, PersistenceHandle, Profile, Result, Section,
    };
    pub use crate::ports::{IniHandler, IniParser};
    pub use crate::service::{ByteStream, Ini, Sink, Source};
}
