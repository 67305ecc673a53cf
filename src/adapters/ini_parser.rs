// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-oriented INI parser.
//!
//! This module provides the default [`IniParser`] implementation.

use crate::domain::{IniError, Result};
use crate::ports::{IniHandler, IniParser};
use std::io::BufRead;

const COMMENT_MARKERS: [char; 2] = ['#', ';'];
const OPTION_SEPARATORS: [char; 2] = ['=', ':'];
const CONTINUATION: char = '\\';

/// The default INI grammar.
///
/// - `[name]` starts a section; whitespace around the name is ignored.
/// - `name = value` or `name: value` adds an option value; the first
///   separator on the line wins. A line with no separator is an option
///   without a value.
/// - Lines starting with `#` or `;` are comments.
/// - A line ending in `\` continues on the next line.
/// - Blank lines are ignored.
///
/// Every option must follow a section header.
///
/// # Examples
///
/// ```rust
/// use hexini::adapters::DefaultIniParser;
/// use hexini::domain::{Config, Profile, ProfileBuilder};
/// use hexini::ports::IniParser;
/// use std::io::Cursor;
///
/// let mut profile = Profile::new();
/// let mut builder = ProfileBuilder::new(&mut profile, &Config::default());
/// DefaultIniParser::new()
///     .parse(&mut Cursor::new("[db]\nhost = localhost\n"), &mut builder)
///     .unwrap();
/// assert_eq!(profile.get("db", "host"), Some("localhost"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DefaultIniParser;

impl DefaultIniParser {
    /// Creates a new parser.
    pub fn new() -> Self {
        DefaultIniParser
    }
}

impl IniParser for DefaultIniParser {
    fn parse(&self, input: &mut dyn BufRead, handler: &mut dyn IniHandler) -> Result<()> {
        let mut lines = LogicalLines::new(input);
        let mut in_section = false;

        handler.start_ini()?;
        while let Some((line_number, raw)) = lines.next_line()? {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(comment) = line.strip_prefix(COMMENT_MARKERS) {
                handler.handle_comment(comment.trim())?;
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| IniError::malformed(line_number, "unterminated section header"))?
                    .trim();
                if name.is_empty() {
                    return Err(IniError::malformed(line_number, "empty section name"));
                }
                if in_section {
                    handler.end_section()?;
                }
                handler.start_section(name)?;
                in_section = true;
                continue;
            }

            if !in_section {
                return Err(IniError::malformed(
                    line_number,
                    format!("option {line:?} appears before any section header"),
                ));
            }

            let (name, value) = split_option(line);
            if name.is_empty() {
                return Err(IniError::malformed(line_number, "option without a name"));
            }
            handler.handle_option(name, value)?;
        }

        if in_section {
            handler.end_section()?;
        }
        handler.end_ini()
    }
}

fn split_option(line: &str) -> (&str, Option<&str>) {
    match line.find(OPTION_SEPARATORS) {
        Some(index) => (line[..index].trim(), Some(line[index + 1..].trim())),
        None => (line, None),
    }
}

/// Joins continued physical lines and tracks line numbers.
struct LogicalLines<'a> {
    input: &'a mut dyn BufRead,
    line_number: usize,
    buffer: String,
}

impl<'a> LogicalLines<'a> {
    fn new(input: &'a mut dyn BufRead) -> Self {
        Self {
            input,
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Returns the next logical line and the number of its first physical line.
    fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        let mut logical = String::new();
        let mut first_line = None;

        loop {
            self.buffer.clear();
            let read = self.input.read_line(&mut self.buffer).map_err(|e| {
                IniError::transport(format!("reading line {}", self.line_number + 1), e)
            })?;
            if read == 0 {
                return Ok(first_line.map(|number| (number, logical)));
            }
            self.line_number += 1;
            first_line.get_or_insert(self.line_number);

            let physical = self.buffer.trim_end_matches(['\n', '\r']);
            match physical.strip_suffix(CONTINUATION) {
                Some(head) => logical.push_str(head),
                None => {
                    logical.push_str(physical);
                    return Ok(first_line.map(|number| (number, logical)));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl IniHandler for Recorder {
        fn start_ini(&mut self) -> Result<()> {
            self.0.push("begin".to_string());
            Ok(())
        }

        fn end_ini(&mut self) -> Result<()> {
            self.0.push("end".to_string());
            Ok(())
        }

        fn start_section(&mut self, name: &str) -> Result<()> {
            self.0.push(format!("[{name}]"));
            Ok(())
        }

        fn end_section(&mut self) -> Result<()> {
            self.0.push("[/]".to_string());
            Ok(())
        }

        fn handle_option(&mut self, name: &str, value: Option<&str>) -> Result<()> {
            match value {
                Some(value) => self.0.push(format!("{name}={value}")),
                None => self.0.push(name.to_string()),
            }
            Ok(())
        }

        fn handle_comment(&mut self, comment: &str) -> Result<()> {
            self.0.push(format!("#{comment}"));
            Ok(())
        }
    }

    fn parse(text: &str) -> Result<Vec<String>> {
        let mut recorder = Recorder::default();
        DefaultIniParser::new().parse(&mut Cursor::new(text), &mut recorder)?;
        Ok(recorder.0)
    }

    #[test]
    fn test_sections_and_options() {
        let events = parse("[a]\nx = 1\ny: two words \n\n[b]\nz=\n").unwrap();
        assert_eq!(
            events,
            vec!["begin", "[a]", "x=1", "y=two words", "[/]", "[b]", "z=", "[/]", "end"]
        );
    }

    #[test]
    fn test_first_separator_wins() {
        let events = parse("[urls]\nhome = http://example.com\n").unwrap();
        assert_eq!(events[2], "home=http://example.com");
    }

    #[test]
    fn test_comments() {
        let events = parse("# top\n[a]\n; inside\nk=v\n").unwrap();
        assert_eq!(events, vec!["begin", "#top", "[a]", "#inside", "k=v", "[/]", "end"]);
    }

    #[test]
    fn test_option_without_value() {
        let events = parse("[flags]\nverbose\n").unwrap();
        assert_eq!(events[2], "verbose");
    }

    #[test]
    fn test_continuation_lines() {
        let events = parse("[a]\nlist = one, \\\n  two\nnext = 1\n").unwrap();
        assert_eq!(events[2], "list=one,   two");
        assert_eq!(events[3], "next=1");
    }

    #[test]
    fn test_crlf_line_endings() {
        let events = parse("[a]\r\nk = v\r\n").unwrap();
        assert_eq!(events[2], "k=v");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("").unwrap(), vec!["begin", "end"]);
    }

    #[test]
    fn test_option_before_section() {
        let err = parse("\n\nk = v\n").unwrap_err();
        assert!(matches!(err, IniError::MalformedStructure { line: 3, .. }));
    }

    #[test]
    fn test_unterminated_header() {
        let err = parse("[a]\nk=v\n[broken\n").unwrap_err();
        assert!(matches!(err, IniError::MalformedStructure { line: 3, .. }));
    }

    #[test]
    fn test_empty_header() {
        let err = parse("[  ]\n").unwrap_err();
        assert!(matches!(err, IniError::MalformedStructure { line: 1, .. }));
    }

    #[test]
    fn test_option_without_name() {
        let err = parse("[a]\n= orphan\n").unwrap_err();
        assert!(matches!(err, IniError::MalformedStructure { line: 2, .. }));
    }

    #[test]
    fn test_error_line_is_start_of_continued_line() {
        let err = parse("[a]\n\\\n[b\n").unwrap_err();
        assert!(matches!(err, IniError::MalformedStructure { line: 2, .. }));
    }

    #[test]
    fn test_invalid_utf8_is_transport_error() {
        let mut recorder = Recorder::default();
        let err = DefaultIniParser::new()
            .parse(&mut Cursor::new(vec![b'[', 0xFF, b']']), &mut recorder)
            .unwrap_err();
        assert!(matches!(err, IniError::Transport { .. }));
    }
}
