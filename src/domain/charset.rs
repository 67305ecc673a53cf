// SPDX-License-Identifier: MIT OR Apache-2.0

//! Character encodings understood by the loader and the storer.
//!
//! [`Charset`] is a closed set, so a configured encoding is always resolvable.
//! Text crosses the byte boundary in exactly two places: [`Decoder`] turns a
//! byte reader into a UTF-8 [`BufRead`], and [`Encoder`] turns formatted text
//! back into bytes for a [`Write`].

use crate::domain::{IniError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufRead, Read, Write};
use std::str::FromStr;

/// Read size used when pulling raw bytes from the wrapped reader.
const CHUNK_SIZE: usize = 8 * 1024;

/// A supported character encoding.
///
/// # Examples
///
/// ```
/// use hexini::domain::Charset;
///
/// let charset: Charset = "utf-16le".parse().unwrap();
/// assert_eq!(charset, Charset::Utf16Le);
/// assert_eq!(charset.name(), "UTF-16LE");
/// assert_eq!(charset.bom(), Some(&[0xFF, 0xFE][..]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Charset {
    /// UTF-8
    #[default]
    Utf8,
    /// UTF-16, big-endian byte order
    Utf16Be,
    /// UTF-16, little-endian byte order
    Utf16Le,
    /// ISO-8859-1 (Latin-1)
    Latin1,
    /// 7-bit US-ASCII
    UsAscii,
}

impl Charset {
    /// Every supported charset.
    pub const ALL: [Charset; 5] = [
        Charset::Utf8,
        Charset::Utf16Be,
        Charset::Utf16Le,
        Charset::Latin1,
        Charset::UsAscii,
    ];

    /// Returns the canonical name of the charset.
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Latin1 => "ISO-8859-1",
            Charset::UsAscii => "US-ASCII",
        }
    }

    /// Resolves a charset from its name or a common alias, ignoring case.
    pub fn for_name(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_uppercase().replace('_', "-");
        match normalized.as_str() {
            "UTF-8" | "UTF8" => Ok(Charset::Utf8),
            "UTF-16BE" | "UTF16BE" => Ok(Charset::Utf16Be),
            "UTF-16LE" | "UTF16LE" => Ok(Charset::Utf16Le),
            "ISO-8859-1" | "ISO8859-1" | "LATIN1" | "LATIN-1" => Ok(Charset::Latin1),
            "US-ASCII" | "ASCII" => Ok(Charset::UsAscii),
            _ => Err(IniError::UnsupportedEncoding {
                name: name.to_string(),
            }),
        }
    }

    /// Returns the byte-order mark that identifies this charset, if it has one.
    pub fn bom(&self) -> Option<&'static [u8]> {
        match self {
            Charset::Utf8 => Some(&[0xEF, 0xBB, 0xBF]),
            Charset::Utf16Be => Some(&[0xFE, 0xFF]),
            Charset::Utf16Le => Some(&[0xFF, 0xFE]),
            Charset::Latin1 | Charset::UsAscii => None,
        }
    }

    /// Appends the encoded form of `text` to `out`.
    ///
    /// Fails with [`IniError::Unmappable`] on the first character the charset
    /// cannot represent; bytes for the characters before it are kept in `out`.
    pub fn encode_into(&self, text: &str, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Charset::Utf8 => out.extend_from_slice(text.as_bytes()),
            Charset::Utf16Be => text
                .encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_be_bytes())),
            Charset::Utf16Le => text
                .encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_le_bytes())),
            Charset::Latin1 | Charset::UsAscii => {
                let limit = if *self == Charset::Latin1 { 0xFF } else { 0x7F };
                for character in text.chars() {
                    let code = u32::from(character);
                    if code > limit {
                        return Err(IniError::Unmappable {
                            charset: self.name(),
                            character,
                        });
                    }
                    out.push(code as u8);
                }
            }
        }
        Ok(())
    }

    /// Encodes `text` into a new byte vector.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(text.len());
        self.encode_into(text, &mut out)?;
        Ok(out)
    }

    /// Decodes a complete byte slice.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        let mut text = String::new();
        Decoder::new(bytes, *self)
            .read_to_string(&mut text)
            .map_err(|e| IniError::transport(format!("decoding {}", self.name()), e))?;
        Ok(text)
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = IniError;

    fn from_str(s: &str) -> Result<Self> {
        Charset::for_name(s)
    }
}

impl TryFrom<String> for Charset {
    type Error = IniError;

    fn try_from(value: String) -> Result<Self> {
        Charset::for_name(&value)
    }
}

impl From<Charset> for String {
    fn from(charset: Charset) -> Self {
        charset.name().to_string()
    }
}

fn invalid_data(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

fn push_char(out: &mut Vec<u8>, character: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(character.encode_utf8(&mut buf).as_bytes());
}

/// A character stream over a byte reader.
///
/// The decoder reads raw bytes from the wrapped reader, transcodes them from
/// its charset and serves the result as UTF-8 through [`Read`] and
/// [`BufRead`]. Multi-byte sequences split across reads are carried over to
/// the next read. Malformed input is reported as
/// [`io::ErrorKind::InvalidData`].
///
/// # Examples
///
/// ```
/// use hexini::domain::charset::{Charset, Decoder};
/// use std::io::Read;
///
/// let bytes: &[u8] = &[0x00, b'a', 0x00, b'='];
/// let mut text = String::new();
/// Decoder::new(bytes, Charset::Utf16Be).read_to_string(&mut text).unwrap();
/// assert_eq!(text, "a=");
/// ```
#[derive(Debug)]
pub struct Decoder<R> {
    inner: R,
    charset: Charset,
    /// Raw bytes not yet decoded (an incomplete trailing sequence)
    pending: Vec<u8>,
    /// Decoded UTF-8 waiting to be consumed
    decoded: Vec<u8>,
    pos: usize,
    eof: bool,
}

impl<R: Read> Decoder<R> {
    /// Wraps `inner`, decoding its bytes with `charset`.
    pub fn new(inner: R, charset: Charset) -> Self {
        Self {
            inner,
            charset,
            pending: Vec::new(),
            decoded: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    /// Returns the charset this decoder reads.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Returns the wrapped reader, discarding anything buffered.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn decode_pending(&mut self) -> io::Result<()> {
        match self.charset {
            Charset::Utf8 => match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    self.decoded.extend_from_slice(text.as_bytes());
                    self.pending.clear();
                }
                Err(e) => {
                    if e.error_len().is_some() {
                        return Err(invalid_data(format!(
                            "invalid UTF-8 sequence after {} valid bytes",
                            e.valid_up_to()
                        )));
                    }
                    let valid = e.valid_up_to();
                    self.decoded.extend_from_slice(&self.pending[..valid]);
                    self.pending.drain(..valid);
                }
            },
            Charset::Latin1 => {
                for &byte in &self.pending {
                    push_char(&mut self.decoded, char::from(byte));
                }
                self.pending.clear();
            }
            Charset::UsAscii => {
                if let Some(byte) = self.pending.iter().find(|b| !b.is_ascii()) {
                    return Err(invalid_data(format!("byte 0x{byte:02X} is not US-ASCII")));
                }
                self.decoded.extend_from_slice(&self.pending);
                self.pending.clear();
            }
            Charset::Utf16Be | Charset::Utf16Le => self.decode_utf16()?,
        }
        Ok(())
    }

    fn decode_utf16(&mut self) -> io::Result<()> {
        let big_endian = self.charset == Charset::Utf16Be;
        let unit_at = |bytes: &[u8], i: usize| {
            let pair = [bytes[i], bytes[i + 1]];
            if big_endian {
                u16::from_be_bytes(pair)
            } else {
                u16::from_le_bytes(pair)
            }
        };

        let mut i = 0;
        while i + 1 < self.pending.len() {
            let unit = unit_at(&self.pending, i);
            match unit {
                0xD800..=0xDBFF => {
                    if i + 3 >= self.pending.len() {
                        // the low surrogate has not arrived yet
                        break;
                    }
                    let low = unit_at(&self.pending, i + 2);
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(invalid_data(format!(
                            "unpaired high surrogate 0x{unit:04X} in {}",
                            self.charset
                        )));
                    }
                    let code =
                        0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    let character = char::from_u32(code).ok_or_else(|| {
                        invalid_data(format!("invalid code point 0x{code:X}"))
                    })?;
                    push_char(&mut self.decoded, character);
                    i += 4;
                }
                0xDC00..=0xDFFF => {
                    return Err(invalid_data(format!(
                        "unpaired low surrogate 0x{unit:04X} in {}",
                        self.charset
                    )));
                }
                _ => {
                    // non-surrogate units are always valid scalar values
                    if let Some(character) = char::from_u32(u32::from(unit)) {
                        push_char(&mut self.decoded, character);
                    }
                    i += 2;
                }
            }
        }
        self.pending.drain(..i);
        Ok(())
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<R: Read> BufRead for Decoder<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        while self.pos >= self.decoded.len() && !self.eof {
            self.decoded.clear();
            self.pos = 0;

            let mut chunk = [0u8; CHUNK_SIZE];
            let n = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if n == 0 {
                self.eof = true;
                if !self.pending.is_empty() {
                    return Err(invalid_data(format!(
                        "input ends inside a {} sequence ({} trailing bytes)",
                        self.charset,
                        self.pending.len()
                    )));
                }
            } else {
                self.pending.extend_from_slice(&chunk[..n]);
                self.decode_pending()?;
            }
        }
        Ok(&self.decoded[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.decoded.len());
    }
}

/// A character sink over a byte writer.
///
/// `Encoder` implements [`fmt::Write`] so formatters can write text to it;
/// each string is encoded with the configured charset and written through.
/// Because [`fmt::Write`] can only report [`fmt::Error`], the real cause of
/// a failure is kept and can be recovered with [`Encoder::take_error`].
#[derive(Debug)]
pub struct Encoder<W> {
    inner: W,
    charset: Charset,
    scratch: Vec<u8>,
    error: Option<IniError>,
}

impl<W: Write> Encoder<W> {
    /// Wraps `inner`, encoding text with `charset`.
    pub fn new(inner: W, charset: Charset) -> Self {
        Self {
            inner,
            charset,
            scratch: Vec::new(),
            error: None,
        }
    }

    /// Returns the error behind the most recent [`fmt::Error`], if any.
    pub fn take_error(&mut self) -> Option<IniError> {
        self.error.take()
    }

    /// Flushes the wrapped writer and returns it.
    pub fn finish(mut self) -> Result<W> {
        self.inner
            .flush()
            .map_err(|e| IniError::transport("flushing encoded output", e))?;
        Ok(self.inner)
    }
}

impl<W: Write> fmt::Write for Encoder<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.scratch.clear();
        if let Err(e) = self.charset.encode_into(s, &mut self.scratch) {
            self.error = Some(e);
            return Err(fmt::Error);
        }
        if let Err(e) = self.inner.write_all(&self.scratch) {
            self.error = Some(IniError::transport("writing encoded output", e));
            return Err(fmt::Error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    /// Hands out its data one byte per read call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((first, rest)) if !buf.is_empty() => {
                    buf[0] = *first;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    fn decode_all<R: Read>(reader: R, charset: Charset) -> io::Result<String> {
        let mut text = String::new();
        Decoder::new(reader, charset).read_to_string(&mut text)?;
        Ok(text)
    }

    #[test]
    fn test_for_name_aliases() {
        assert_eq!(Charset::for_name("utf8").unwrap(), Charset::Utf8);
        assert_eq!(Charset::for_name(" UTF-16BE ").unwrap(), Charset::Utf16Be);
        assert_eq!(Charset::for_name("utf_16le").unwrap(), Charset::Utf16Le);
        assert_eq!(Charset::for_name("latin1").unwrap(), Charset::Latin1);
        assert_eq!(Charset::for_name("ascii").unwrap(), Charset::UsAscii);
    }

    #[test]
    fn test_for_name_unknown() {
        let result = Charset::for_name("EBCDIC");
        assert!(matches!(
            result,
            Err(IniError::UnsupportedEncoding { ref name }) if name == "EBCDIC"
        ));
    }

    #[test]
    fn test_name_round_trips_through_for_name() {
        for charset in Charset::ALL {
            assert_eq!(Charset::for_name(charset.name()).unwrap(), charset);
        }
    }

    #[test]
    fn test_bom_table() {
        assert_eq!(Charset::Utf8.bom(), Some(&[0xEF, 0xBB, 0xBF][..]));
        assert_eq!(Charset::Utf16Be.bom(), Some(&[0xFE, 0xFF][..]));
        assert_eq!(Charset::Utf16Le.bom(), Some(&[0xFF, 0xFE][..]));
        assert_eq!(Charset::Latin1.bom(), None);
        assert_eq!(Charset::UsAscii.bom(), None);
    }

    #[test]
    fn test_decode_utf16_split_across_reads() {
        // "k=😀" in UTF-16LE, the emoji is a surrogate pair
        let bytes = [0x6B, 0x00, 0x3D, 0x00, 0x3D, 0xD8, 0x00, 0xDE];
        let text = decode_all(Trickle(&bytes), Charset::Utf16Le).unwrap();
        assert_eq!(text, "k=😀");
    }

    #[test]
    fn test_decode_utf8_split_across_reads() {
        let source = "name=Zoë ☃";
        let text = decode_all(Trickle(source.as_bytes()), Charset::Utf8).unwrap();
        assert_eq!(text, source);
    }

    #[test]
    fn test_decoder_reports_charset() {
        let decoder = Decoder::new(&b""[..], Charset::Utf16Be);
        assert_eq!(decoder.charset(), Charset::Utf16Be);
        assert!(decoder.into_inner().is_empty());
    }

    #[test]
    fn test_decode_latin1() {
        let text = decode_all(&[b'c', b'a', b'f', 0xE9][..], Charset::Latin1).unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = decode_all(&[b'a', 0xFF, b'b'][..], Charset::Utf8).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_decode_truncated_utf8() {
        let err = decode_all(&[b'a', 0xE2, 0x98][..], Charset::Utf8).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_decode_odd_utf16_length() {
        let err = decode_all(&[0x00, b'a', 0x00][..], Charset::Utf16Be).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_decode_unpaired_surrogate() {
        let err = decode_all(&[0xDC, 0x00, 0x00, b'a'][..], Charset::Utf16Be).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_decode_non_ascii_byte() {
        let err = decode_all(&[b'a', 0x80][..], Charset::UsAscii).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_encode_utf16() {
        assert_eq!(Charset::Utf16Be.encode("a").unwrap(), vec![0x00, b'a']);
        assert_eq!(Charset::Utf16Le.encode("a").unwrap(), vec![b'a', 0x00]);
    }

    #[test]
    fn test_encode_unmappable() {
        let err = Charset::Latin1.encode("price=5€").unwrap_err();
        assert!(matches!(
            err,
            IniError::Unmappable {
                charset: "ISO-8859-1",
                character: '€'
            }
        ));
        assert!(Charset::UsAscii.encode("é").is_err());
        assert_eq!(Charset::Latin1.encode("é").unwrap(), vec![0xE9]);
    }

    #[test]
    fn test_encoder_keeps_the_real_error() {
        let mut encoder = Encoder::new(Vec::new(), Charset::UsAscii);
        encoder.write_str("ok").unwrap();
        assert!(encoder.write_str("naïve").is_err());
        assert!(matches!(
            encoder.take_error(),
            Some(IniError::Unmappable { character: 'ï', .. })
        ));
        assert_eq!(encoder.finish().unwrap(), b"ok".to_vec());
    }

    #[test]
    fn test_charset_serde_uses_canonical_name() {
        let json = serde_json::to_string(&Charset::Utf16Le).unwrap();
        assert_eq!(json, "\"UTF-16LE\"");
        let parsed: Charset = serde_json::from_str("\"latin1\"").unwrap();
        assert_eq!(parsed, Charset::Latin1);
        assert!(serde_json::from_str::<Charset>("\"KOI8-R\"").is_err());
    }
}
