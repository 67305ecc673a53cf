// SPDX-License-Identifier: MIT OR Apache-2.0

//! INI text output.

use crate::domain::Result;
use crate::ports::IniHandler;
use std::fmt::Write;

/// Writes structural events as INI text.
///
/// Sections are separated by a blank line, options are written as
/// `name = value` (or just `name` when there is no value) and comments as
/// `# comment`. Lines end with `\n`.
///
/// # Examples
///
/// ```rust
/// use hexini::adapters::IniFormatter;
/// use hexini::ports::IniHandler;
///
/// let mut formatter = IniFormatter::new(String::new());
/// formatter.start_section("db").unwrap();
/// formatter.handle_option("host", Some("localhost")).unwrap();
/// formatter.end_section().unwrap();
/// assert_eq!(formatter.into_inner(), "[db]\nhost = localhost\n");
/// ```
#[derive(Debug)]
pub struct IniFormatter<W> {
    output: W,
    sections: usize,
}

impl<W: Write> IniFormatter<W> {
    /// Creates a formatter writing to `output`.
    pub fn new(output: W) -> Self {
        Self { output, sections: 0 }
    }

    /// Returns the character sink.
    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> IniHandler for IniFormatter<W> {
    fn start_section(&mut self, name: &str) -> Result<()> {
        if self.sections > 0 {
            writeln!(self.output)?;
        }
        writeln!(self.output, "[{name}]")?;
        self.sections += 1;
        Ok(())
    }

    fn handle_option(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => writeln!(self.output, "{name} = {value}")?,
            None => writeln!(self.output, "{name}")?,
        }
        Ok(())
    }

    fn handle_comment(&mut self, comment: &str) -> Result<()> {
        writeln!(self.output, "# {comment}")?;
        Ok(())
    }
}
