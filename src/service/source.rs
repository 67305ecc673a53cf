// SPDX-License-Identifier: MIT OR Apache-2.0

//! Where INI data is loaded from and stored to.

use std::fmt;
use std::io::{BufRead, Read, Write};
use std::path::{Path, PathBuf};
use url::Url;

/// A raw byte reader of unknown encoding.
///
/// A stream created with [`ByteStream::new`] is rewindable: its first bytes
/// can be probed for a byte-order mark and handed back if there is none. A
/// stream created with [`ByteStream::forward_only`] is decoded as-is with the
/// configured encoding.
pub struct ByteStream<'a> {
    reader: Box<dyn Read + 'a>,
    rewindable: bool,
}

impl<'a> ByteStream<'a> {
    /// Wraps a reader whose leading bytes may be probed.
    pub fn new(reader: impl Read + 'a) -> Self {
        Self {
            reader: Box::new(reader),
            rewindable: true,
        }
    }

    /// Wraps a reader that must be decoded without probing.
    pub fn forward_only(reader: impl Read + 'a) -> Self {
        Self {
            reader: Box::new(reader),
            rewindable: false,
        }
    }

    /// Returns whether the stream may be probed.
    pub fn is_rewindable(&self) -> bool {
        self.rewindable
    }

    /// Returns the wrapped reader.
    pub fn into_reader(self) -> Box<dyn Read + 'a> {
        self.reader
    }
}

impl fmt::Debug for ByteStream<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream")
            .field("rewindable", &self.rewindable)
            .finish_non_exhaustive()
    }
}

/// The input of a load.
///
/// # Examples
///
/// ```rust,no_run
/// use hexini::service::{ByteStream, Ini, Source};
/// use std::path::Path;
///
/// # fn main() -> hexini::domain::Result<()> {
/// let mut ini = Ini::new();
/// ini.load(Path::new("/etc/app.ini"))?;
/// ini.load(Source::text("[extra]\nkey = value\n"))?;
/// ini.load(ByteStream::new(std::io::stdin()))?;
/// ini.load(Source::Bound)?;
/// # Ok(())
/// # }
/// ```
pub enum Source<'a> {
    /// Raw bytes; probed for a byte-order mark when rewindable.
    Bytes(ByteStream<'a>),
    /// Text that is already decoded.
    Text(Box<dyn BufRead + 'a>),
    /// A locator, decoded with the configured encoding.
    Locator(Url),
    /// A file, decoded with the configured encoding. The file becomes bound.
    File(PathBuf),
    /// The file the profile is bound to.
    Bound,
}

impl<'a> Source<'a> {
    /// Creates a source over decoded text.
    pub fn text(text: &'a str) -> Self {
        Source::Text(Box::new(text.as_bytes()))
    }

    /// Returns a short name for the source kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Source::Bytes(_) => "bytes",
            Source::Text(_) => "text",
            Source::Locator(_) => "locator",
            Source::File(_) => "file",
            Source::Bound => "bound file",
        }
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Bytes(stream) => f.debug_tuple("Bytes").field(stream).finish(),
            Source::Text(_) => f.write_str("Text(..)"),
            Source::Locator(url) => f.debug_tuple("Locator").field(&url.as_str()).finish(),
            Source::File(path) => f.debug_tuple("File").field(path).finish(),
            Source::Bound => f.write_str("Bound"),
        }
    }
}

impl<'a> From<ByteStream<'a>> for Source<'a> {
    fn from(stream: ByteStream<'a>) -> Self {
        Source::Bytes(stream)
    }
}

impl From<Url> for Source<'_> {
    fn from(url: Url) -> Self {
        Source::Locator(url)
    }
}

impl From<PathBuf> for Source<'_> {
    fn from(path: PathBuf) -> Self {
        Source::File(path)
    }
}

impl From<&Path> for Source<'_> {
    fn from(path: &Path) -> Self {
        Source::File(path.to_path_buf())
    }
}

/// The output of a store.
pub enum Sink<'a> {
    /// Raw bytes, encoded with the configured encoding. No byte-order mark is written.
    Bytes(Box<dyn Write + 'a>),
    /// A character sink.
    Text(&'a mut dyn fmt::Write),
    /// A file, created or truncated, encoded with the configured encoding.
    File(PathBuf),
    /// The file the profile is bound to.
    Bound,
}

impl<'a> Sink<'a> {
    /// Creates a sink over a byte writer.
    pub fn bytes(writer: impl Write + 'a) -> Self {
        Sink::Bytes(Box::new(writer))
    }

    /// Returns a short name for the sink kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Sink::Bytes(_) => "bytes",
            Sink::Text(_) => "text",
            Sink::File(_) => "file",
            Sink::Bound => "bound file",
        }
    }
}

impl fmt::Debug for Sink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Bytes(_) => f.write_str("Bytes(..)"),
            Sink::Text(_) => f.write_str("Text(..)"),
            Sink::File(path) => f.debug_tuple("File").field(path).finish(),
            Sink::Bound => f.write_str("Bound"),
        }
    }
}

impl From<PathBuf> for Sink<'_> {
    fn from(path: PathBuf) -> Self {
        Sink::File(path)
    }
}

impl From<&Path> for Sink<'_> {
    fn from(path: &Path) -> Self {
        Sink::File(path.to_path_buf())
    }
}

impl<'a> From<&'a mut String> for Sink<'a> {
    fn from(output: &'a mut String) -> Self {
        Sink::Text(output)
    }
}
