// SPDX-License-Identifier: MIT OR Apache-2.0

//! The INI profile with load and store.
//!
//! Every way of loading ends up as one decoded character stream handed to a
//! parser, and every way of storing ends up as one character sink driven by
//! the profile's replay.

use crate::adapters::{default_location, open_locator, DefaultIniParser, IniFormatter};
use crate::domain::charset::{Decoder, Encoder};
use crate::domain::{Config, IniError, PersistenceHandle, Profile, ProfileBuilder, Result, Section};
use crate::ports::IniParser;
use crate::service::sniffer;
use crate::service::source::{ByteStream, Sink, Source};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufWriter, Read, Write};
use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::str::FromStr;
use url::Url;

/// An INI profile bound to its settings and, optionally, to a file.
///
/// `Ini` dereferences to [`Profile`], so sections and options are read and
/// changed directly on it.
///
/// # Examples
///
/// ```rust
/// use hexini::service::{Ini, Sink};
///
/// # fn main() -> hexini::domain::Result<()> {
/// let mut ini: Ini = "[server]\nport = 8080\n".parse()?;
/// assert_eq!(ini.get("server", "port"), Some("8080"));
///
/// ini.put("server", "port", Some("9090"));
/// let mut text = String::new();
/// ini.store(&mut text)?;
/// assert_eq!(text, "[server]\nport = 9090\n");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ini {
    profile: Profile,
    config: Config,
    handle: PersistenceHandle,
}

impl Ini {
    /// Creates an empty profile with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty profile with the given settings.
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Loads a file and binds the profile to it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut ini = Self::new();
        ini.load(path.as_ref())?;
        Ok(ini)
    }

    /// Loads a byte reader, detecting its encoding from a byte-order mark.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut ini = Self::new();
        ini.load(ByteStream::new(reader))?;
        Ok(ini)
    }

    /// Loads an in-memory byte buffer, detecting its encoding from a byte-order mark.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(bytes)
    }

    /// Loads the resource behind a locator.
    pub fn from_url(url: Url) -> Result<Self> {
        let mut ini = Self::new();
        ini.load(url)?;
        Ok(ini)
    }

    /// Binds a profile to `filename` in the OS-appropriate configuration
    /// directory and loads it if it exists.
    ///
    /// A missing file yields an empty profile that [`Ini::save`] will create.
    pub fn from_default_location(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let path = default_location(app_name, qualifier, filename)?;
        let mut ini = Self::new();
        if path.is_file() {
            ini.load(path)?;
        } else {
            tracing::debug!("No file at {} yet, starting empty", path.display());
            ini.set_file(path);
        }
        Ok(ini)
    }

    /// Returns the settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the settings for modification.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Replaces the settings.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Returns the profile.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Returns the profile for modification.
    pub fn profile_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }

    /// Returns the bound file, if any.
    pub fn file(&self) -> Option<&Path> {
        self.handle.current()
    }

    /// Binds the profile to a file without touching it.
    pub fn set_file(&mut self, path: impl Into<std::path::PathBuf>) {
        self.handle.bind(path);
    }

    /// Returns the file binding.
    pub fn handle(&self) -> &PersistenceHandle {
        &self.handle
    }

    /// Returns the file binding for modification.
    pub fn handle_mut(&mut self) -> &mut PersistenceHandle {
        &mut self.handle
    }

    /// Loads INI data, adding it to the current contents.
    ///
    /// Rewindable byte streams are probed for a byte-order mark, and a mark
    /// that is found becomes the configured encoding. Files and locators are
    /// decoded with the configured encoding as-is. Loading a file binds the
    /// profile to it. [`Source::Bound`] fails with [`IniError::UnboundSource`]
    /// before any I/O when no file is bound.
    pub fn load<'a>(&mut self, source: impl Into<Source<'a>>) -> Result<()> {
        self.load_with(source, &DefaultIniParser)
    }

    /// Like [`Ini::load`] with a custom parser.
    pub fn load_with<'a>(
        &mut self,
        source: impl Into<Source<'a>>,
        parser: &dyn IniParser,
    ) -> Result<()> {
        let source = source.into();
        tracing::debug!("Loading from {}", source.kind());

        match source {
            Source::Bytes(stream) => {
                let (mut reader, _) = sniffer::open_reader(stream, &mut self.config)?;
                self.parse(&mut reader, parser)
            }
            Source::Text(mut reader) => self.parse(&mut *reader, parser),
            Source::Locator(url) => {
                let raw = open_locator(&url)?;
                let mut reader = Decoder::new(raw, self.config.file_encoding());
                self.parse(&mut reader, parser)
            }
            Source::File(path) => {
                self.load_file(&path, parser)?;
                tracing::debug!("Bound profile to {}", path.display());
                self.handle.bind(path);
                Ok(())
            }
            Source::Bound => {
                let path = self.handle.require_for_load()?.to_path_buf();
                self.load_file(&path, parser)
            }
        }
    }

    /// Replaces the contents with those of the bound file.
    ///
    /// The contents are kept if the file cannot be opened.
    pub fn reload(&mut self) -> Result<()> {
        let path = self.handle.require_for_load()?.to_path_buf();
        let mut reader = self.open_file(&path)?;
        self.profile.clear();
        self.parse(&mut reader, &DefaultIniParser)
    }

    /// Writes the profile out.
    ///
    /// Empty sections and repeated options are written according to the
    /// settings. Byte sinks and files use the configured encoding.
    /// [`Sink::Bound`] fails with [`IniError::UnboundSink`] before any I/O
    /// when no file is bound. A file opened here is closed before this
    /// returns, whether or not writing succeeded.
    pub fn store<'a>(&self, sink: impl Into<Sink<'a>>) -> Result<()> {
        let sink = sink.into();
        tracing::debug!("Storing to {}", sink.kind());

        match sink {
            Sink::Bytes(writer) => self.store_bytes(writer).map(drop),
            Sink::Text(output) => self.store_text(output),
            Sink::File(path) => self.store_file(&path),
            Sink::Bound => {
                let path = self.handle.require_for_store()?;
                self.store_file(path)
            }
        }
    }

    /// Writes the profile to the bound file.
    pub fn save(&self) -> Result<()> {
        self.store(Sink::Bound)
    }

    /// Returns the nearest existing ancestor section in tree mode.
    ///
    /// Always `None` when tree mode is off.
    pub fn parent(&self, name: &str) -> Option<&Section> {
        if !self.config.is_tree() {
            return None;
        }
        self.profile.parent(name, self.config.path_separator())
    }

    /// Returns the direct child sections in tree mode.
    ///
    /// Always empty when tree mode is off.
    pub fn children<'a>(&'a self, name: &'a str) -> Vec<&'a Section> {
        if !self.config.is_tree() {
            return Vec::new();
        }
        self.profile
            .children(name, self.config.path_separator())
            .collect()
    }

    fn parse(&mut self, reader: &mut dyn BufRead, parser: &dyn IniParser) -> Result<()> {
        let mut builder = ProfileBuilder::new(&mut self.profile, &self.config);
        parser.parse(reader, &mut builder)
    }

    fn open_file(&self, path: &Path) -> Result<Decoder<File>> {
        let file = File::open(path)
            .map_err(|e| IniError::transport(format!("opening {}", path.display()), e))?;
        Ok(Decoder::new(file, self.config.file_encoding()))
    }

    fn load_file(&mut self, path: &Path, parser: &dyn IniParser) -> Result<()> {
        let mut reader = self.open_file(path)?;
        self.parse(&mut reader, parser)
    }

    fn store_text(&self, output: &mut dyn fmt::Write) -> Result<()> {
        let mut formatter = IniFormatter::new(output);
        self.profile.replay(&mut formatter, &self.config)
    }

    /// Encodes the profile into `writer`, flushes it and hands it back.
    ///
    /// On failure the writer is dropped before the error is returned.
    fn store_bytes<W: Write>(&self, writer: W) -> Result<W> {
        let mut formatter = IniFormatter::new(Encoder::new(writer, self.config.file_encoding()));
        let replayed = self.profile.replay(&mut formatter, &self.config);
        let mut encoder = formatter.into_inner();
        if let Err(err) = replayed {
            // a bare fmt::Error hides the encoder's real failure
            return Err(encoder.take_error().unwrap_or(err));
        }
        encoder.finish()
    }

    fn store_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| IniError::transport(format!("creating {}", path.display()), e))?;
        let result = self
            .store_bytes(BufWriter::new(file))
            .and_then(|writer| {
                writer.into_inner().map(drop).map_err(|e| {
                    IniError::transport(format!("writing {}", path.display()), e.into_error())
                })
            });
        tracing::debug!(
            "Released {} after {}",
            path.display(),
            if result.is_ok() { "store" } else { "failed store" }
        );
        result
    }
}

impl Deref for Ini {
    type Target = Profile;

    fn deref(&self) -> &Profile {
        &self.profile
    }
}

impl DerefMut for Ini {
    fn deref_mut(&mut self) -> &mut Profile {
        &mut self.profile
    }
}

impl FromStr for Ini {
    type Err = IniError;

    fn from_str(s: &str) -> Result<Self> {
        let mut ini = Self::new();
        ini.load(Source::text(s))?;
        Ok(ini)
    }
}

impl fmt::Display for Ini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store_text(f).map_err(|_| fmt::Error)
    }
}
