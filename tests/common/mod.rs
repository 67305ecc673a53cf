// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers shared by the integration tests.

use hexini::domain::Result;
use hexini::ports::IniHandler;
use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

/// Records structural events as strings.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct RecordingHandler {
    pub events: Vec<String>,
}

impl IniHandler for RecordingHandler {
    fn start_section(&mut self, name: &str) -> Result<()> {
        self.events.push(format!("[{name}]"));
        Ok(())
    }

    fn handle_option(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        self.events.push(format!("{name}={}", value.unwrap_or("<none>")));
        Ok(())
    }
}

/// A writer that accepts `budget` bytes, then fails, and reports when it is dropped.
#[allow(dead_code)]
pub struct FailingWriter {
    budget: usize,
    dropped: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl FailingWriter {
    /// Creates the writer and the flag that is set when it is dropped.
    pub fn new(budget: usize) -> (Self, Rc<Cell<bool>>) {
        let dropped = Rc::new(Cell::new(false));
        let writer = Self {
            budget,
            dropped: Rc::clone(&dropped),
        };
        (writer, dropped)
    }
}

impl Write for FailingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.budget {
            return Err(io::Error::other("simulated disk failure"));
        }
        self.budget -= buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for FailingWriter {
    fn drop(&mut self) {
        self.dropped.set(true);
    }
}

/// Encodes `text` as UTF-16 with the given byte order, optionally prefixed with its mark.
#[allow(dead_code)]
pub fn utf16(text: &str, big_endian: bool, with_bom: bool) -> Vec<u8> {
    let mut bytes = Vec::new();
    let units = with_bom
        .then_some(0xFEFF_u16)
        .into_iter()
        .chain(text.encode_utf16());
    for unit in units {
        if big_endian {
            bytes.extend_from_slice(&unit.to_be_bytes());
        } else {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
    }
    bytes
}

/// Prefixes `text` with the UTF-8 byte-order mark.
#[allow(dead_code)]
pub fn utf8_with_bom(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

/// Installs a test subscriber so `tracing` output shows up with `--nocapture`.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
