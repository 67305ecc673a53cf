// SPDX-License-Identifier: MIT OR Apache-2.0

//! INI parser trait definition.
//!
//! This module defines the `IniParser` trait, which provides an interface for
//! turning decoded text into structural events. Byte decoding is finished by
//! the time a parser sees the input: it always reads UTF-8.

use crate::domain::Result;
use crate::ports::IniHandler;
use std::io::BufRead;

/// A trait for parsing INI text into structural events.
///
/// The parser reads from an already decoded character stream and pushes
/// events to `handler` as it goes, so a failure part way through leaves the
/// events before it applied. Grammar violations are reported as
/// [`IniError::MalformedStructure`](crate::domain::IniError::MalformedStructure);
/// read failures as [`IniError::Transport`](crate::domain::IniError::Transport).
///
/// # Examples
///
/// ```rust
/// use hexini::ports::{IniHandler, IniParser};
/// use hexini::domain::Result;
/// use std::io::BufRead;
///
/// /// Treats every non-empty line as an option of a single section.
/// struct LineParser;
///
/// impl IniParser for LineParser {
///     fn parse(&self, input: &mut dyn BufRead, handler: &mut dyn IniHandler) -> Result<()> {
///         handler.start_ini()?;
///         handler.start_section("lines")?;
///         for line in input.lines() {
///             let line = line?;
///             if !line.is_empty() {
///                 handler.handle_option(&line, None)?;
///             }
///         }
///         handler.end_section()?;
///         handler.end_ini()
///     }
/// }
/// ```
pub trait IniParser {
    /// Parses `input`, reporting its structure to `handler`.
    ///
    /// # Arguments
    ///
    /// * `input` - Decoded UTF-8 text
    /// * `handler` - Receiver of the structural events
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The whole input was parsed and `end_ini` was delivered
    /// * `Err(IniError)` - Parsing stopped at the first error
    fn parse(&self, input: &mut dyn BufRead, handler: &mut dyn IniHandler) -> Result<()>;
}
