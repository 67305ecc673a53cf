// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module contains the types the rest of the crate is built from:
//! settings, character encodings, errors, the in-memory profile and the file
//! binding. It performs no I/O of its own beyond what the encoding adapters
//! are handed.

pub mod charset;
pub mod config;
pub mod errors;
pub mod persistence;
pub mod profile;

// Re-export commonly used types
pub use charset::Charset;
pub use config::Config;
pub use errors::{ErrorKind, IniError, Result};
pub use persistence::PersistenceHandle;
pub use profile::{Profile, ProfileBuilder, Section};
