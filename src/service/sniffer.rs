// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte-order-mark detection.
//!
//! A byte stream of unknown encoding is probed for one of three marks:
//!
//! | Bytes      | Encoding  |
//! |------------|-----------|
//! | `FE FF`    | UTF-16BE  |
//! | `FF FE`    | UTF-16LE  |
//! | `EF BB BF` | UTF-8     |
//!
//! A recognised mark is consumed and becomes the configured file encoding.
//! Anything else leaves the stream at its first byte and the configured
//! encoding is used. Probing goes through [`Lookahead`], which keeps probed
//! bytes until they are committed, so nothing is lost when there is no mark.

use crate::domain::charset::Decoder;
use crate::domain::{Charset, Config, IniError, Result};
use crate::service::source::ByteStream;
use std::io::{self, Read};

/// The longest mark that is recognised.
const MAX_BOM_LEN: usize = 3;

/// A reader with an owned lookahead buffer.
///
/// [`probe`](Lookahead::probe) reads ahead without consuming;
/// [`commit`](Lookahead::commit) consumes probed bytes. Uncommitted bytes are
/// served again by [`Read`] before anything new is read from the inner
/// reader, which is what rewinding amounts to.
///
/// # Examples
///
/// ```
/// use hexini::service::sniffer::Lookahead;
/// use std::io::Read;
///
/// let mut stream = Lookahead::new(&b"abcdef"[..]);
/// assert_eq!(stream.probe(3).unwrap(), b"abc");
/// stream.commit(1);
///
/// let mut rest = String::new();
/// stream.read_to_string(&mut rest).unwrap();
/// assert_eq!(rest, "bcdef");
/// ```
#[derive(Debug)]
pub struct Lookahead<R> {
    inner: R,
    buffer: Vec<u8>,
    pos: usize,
}

impl<R: Read> Lookahead<R> {
    /// Wraps `inner` with an empty lookahead buffer.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buffer: Vec::new(),
            pos: 0,
        }
    }

    /// Returns up to `n` upcoming bytes without consuming them.
    ///
    /// Fewer than `n` bytes are returned only at end of input.
    pub fn probe(&mut self, n: usize) -> io::Result<&[u8]> {
        while self.buffer.len() - self.pos < n {
            let mut chunk = [0u8; MAX_BOM_LEN];
            let want = (n - (self.buffer.len() - self.pos)).min(chunk.len());
            let read = match self.inner.read(&mut chunk[..want]) {
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if read == 0 {
                break;
            }
            self.buffer.extend_from_slice(&chunk[..read]);
        }
        let end = (self.pos + n).min(self.buffer.len());
        Ok(&self.buffer[self.pos..end])
    }

    /// Consumes up to `n` probed bytes.
    pub fn commit(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.buffer.len());
        if self.pos == self.buffer.len() {
            self.buffer.clear();
            self.pos = 0;
        }
    }

    /// Returns the probed bytes that have not been committed.
    pub fn pending(&self) -> &[u8] {
        &self.buffer[self.pos..]
    }
}

impl<R: Read> Read for Lookahead<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let pending = self.pending();
        if pending.is_empty() {
            return self.inner.read(buf);
        }
        let n = pending.len().min(buf.len());
        buf[..n].copy_from_slice(&pending[..n]);
        self.commit(n);
        Ok(n)
    }
}

/// Outcome of probing a stream for a byte-order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionResult {
    /// The encoding named by the mark, if one was found
    pub resolved_encoding: Option<Charset>,
    /// Number of mark bytes consumed: 0, 2 or 3
    pub bytes_consumed: usize,
    /// Whether probed bytes were handed back so decoding starts at the first byte
    pub stream_repositioned: bool,
}

impl DetectionResult {
    /// The result for a stream that was not probed.
    pub const NOT_PROBED: DetectionResult = DetectionResult {
        resolved_encoding: None,
        bytes_consumed: 0,
        stream_repositioned: false,
    };
}

/// Classifies the leading bytes of a stream.
///
/// # Examples
///
/// ```
/// use hexini::domain::Charset;
/// use hexini::service::sniffer::classify;
///
/// assert_eq!(classify(&[0xEF, 0xBB, 0xBF, b'[']), Some(Charset::Utf8));
/// assert_eq!(classify(&[0xEF, 0xBB, b'[']), None);
/// ```
pub fn classify(head: &[u8]) -> Option<Charset> {
    match head {
        [0xFE, 0xFF, ..] => Some(Charset::Utf16Be),
        [0xFF, 0xFE, ..] => Some(Charset::Utf16Le),
        [0xEF, 0xBB, 0xBF, ..] => Some(Charset::Utf8),
        _ => None,
    }
}

/// Probes `stream` for a byte-order mark and consumes it if present.
pub fn sniff<R: Read>(stream: &mut Lookahead<R>) -> io::Result<DetectionResult> {
    let head = stream.probe(MAX_BOM_LEN)?;
    tracing::trace!("Probed leading bytes {:02X?}", head);

    match classify(head) {
        Some(charset) => {
            let bytes_consumed = charset.bom().map_or(0, <[u8]>::len);
            stream.commit(bytes_consumed);
            Ok(DetectionResult {
                resolved_encoding: Some(charset),
                bytes_consumed,
                stream_repositioned: false,
            })
        }
        None => Ok(DetectionResult {
            resolved_encoding: None,
            bytes_consumed: 0,
            stream_repositioned: true,
        }),
    }
}

/// A decoded character stream produced from a [`ByteStream`].
pub type CharStream<'a> = Decoder<Lookahead<Box<dyn Read + 'a>>>;

/// Turns a byte stream into a character stream with the right encoding.
///
/// A rewindable stream is probed; a recognised mark is skipped and its
/// encoding is written to `config`. A forward-only stream is not probed at
/// all and is decoded with the configured encoding from its first byte, so a
/// mark at its start is decoded as content.
pub fn open_reader<'a>(
    stream: ByteStream<'a>,
    config: &mut Config,
) -> Result<(CharStream<'a>, DetectionResult)> {
    let rewindable = stream.is_rewindable();
    let mut lookahead = Lookahead::new(stream.into_reader());

    let detection = if rewindable {
        sniff(&mut lookahead)
            .map_err(|e| IniError::transport("probing for a byte-order mark", e))?
    } else {
        tracing::debug!(
            "Stream cannot rewind, decoding as {} without probing",
            config.file_encoding()
        );
        DetectionResult::NOT_PROBED
    };

    if let Some(charset) = detection.resolved_encoding {
        tracing::debug!(
            "Detected {} byte-order mark ({} bytes)",
            charset,
            detection.bytes_consumed
        );
        config.set_file_encoding(charset);
    } else if rewindable {
        tracing::debug!(
            "No byte-order mark, decoding as {}",
            config.file_encoding()
        );
    }

    Ok((Decoder::new(lookahead, config.file_encoding()), detection))
}
