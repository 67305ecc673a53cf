// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that connect the load
//! and store pipeline to its collaborators: the parser that reads INI text and
//! the handlers that receive its structure.

pub mod handler;
pub mod parser;

// Re-export commonly used types
pub use handler::IniHandler;
pub use parser::IniParser;
