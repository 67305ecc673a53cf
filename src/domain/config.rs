// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings that shape how INI data is read and written.
//!
//! There is no process-wide instance. Applications build a [`Config`] once
//! (usually [`Config::default`] or [`Config::from_env`]) and hand a copy to
//! each [`Ini`](crate::service::Ini); the copy may then be changed freely.

use crate::domain::{Charset, IniError, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Default prefix for environment overrides read by [`Config::from_env`].
pub const ENV_PREFIX: &str = "HEXINI_";

/// Default separator between the components of a hierarchical section name.
pub const DEFAULT_PATH_SEPARATOR: char = '/';

/// Load and store settings for an INI profile.
///
/// # Examples
///
/// ```
/// use hexini::domain::{Charset, Config};
///
/// let config = Config::default()
///     .with_file_encoding(Charset::Latin1)
///     .with_multi_option(false);
///
/// assert_eq!(config.file_encoding(), Charset::Latin1);
/// assert!(!config.is_multi_option());
/// assert!(config.is_empty_section());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct Config {
    /// Encoding used for byte input without a byte-order mark and for byte output
    file_encoding: Charset,
    /// Whether sections without options are written out
    empty_section: bool,
    /// Whether every value of a repeated option is kept on output
    multi_option: bool,
    /// Whether section names are treated as paths
    tree: bool,
    /// Separator between path components when `tree` is set
    path_separator: char,
    /// Whether option names are stored with an upper-case first letter
    property_first_upper: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_encoding: Charset::Utf8,
            empty_section: true,
            multi_option: true,
            tree: false,
            path_separator: DEFAULT_PATH_SEPARATOR,
            property_first_upper: false,
        }
    }
}

impl Config {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration from the defaults overlaid with `HEXINI_*`
    /// environment variables.
    ///
    /// Recognised variables are `HEXINI_FILE_ENCODING`, `HEXINI_EMPTY_SECTION`,
    /// `HEXINI_MULTI_OPTION`, `HEXINI_TREE`, `HEXINI_PATH_SEPARATOR` and
    /// `HEXINI_PROPERTY_FIRST_UPPER`. Unset variables keep their default.
    pub fn from_env() -> Result<Self> {
        Self::from_env_prefix(ENV_PREFIX)
    }

    /// Like [`Config::from_env`] but with a custom variable prefix.
    pub fn from_env_prefix(prefix: &str) -> Result<Self> {
        Self::default().overlay(|name| env::var(format!("{prefix}{name}")).ok())
    }

    /// Applies overrides produced by `lookup`, keyed by upper-case setting name.
    fn overlay<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("FILE_ENCODING") {
            self.file_encoding = Charset::for_name(&name)?;
        }
        if let Some(value) = lookup("EMPTY_SECTION") {
            self.empty_section = parse_flag("EMPTY_SECTION", &value)?;
        }
        if let Some(value) = lookup("MULTI_OPTION") {
            self.multi_option = parse_flag("MULTI_OPTION", &value)?;
        }
        if let Some(value) = lookup("TREE") {
            self.tree = parse_flag("TREE", &value)?;
        }
        if let Some(value) = lookup("PATH_SEPARATOR") {
            let mut chars = value.chars();
            self.path_separator = match (chars.next(), chars.next()) {
                (Some(separator), None) => separator,
                _ => {
                    return Err(IniError::InvalidSetting {
                        setting: "PATH_SEPARATOR".to_string(),
                        value,
                        expected: "a single character",
                    })
                }
            };
        }
        if let Some(value) = lookup("PROPERTY_FIRST_UPPER") {
            self.property_first_upper = parse_flag("PROPERTY_FIRST_UPPER", &value)?;
        }
        Ok(self)
    }

    /// Returns the encoding used for byte streams.
    pub fn file_encoding(&self) -> Charset {
        self.file_encoding
    }

    /// Sets the encoding used for byte streams.
    pub fn set_file_encoding(&mut self, charset: Charset) {
        self.file_encoding = charset;
    }

    /// Returns a copy with a different byte-stream encoding.
    pub fn with_file_encoding(mut self, charset: Charset) -> Self {
        self.file_encoding = charset;
        self
    }

    /// Returns whether sections without options are written out.
    pub fn is_empty_section(&self) -> bool {
        self.empty_section
    }

    /// Sets whether sections without options are written out.
    pub fn set_empty_section(&mut self, enabled: bool) {
        self.empty_section = enabled;
    }

    /// Returns a copy with a different empty-section policy.
    pub fn with_empty_section(mut self, enabled: bool) -> Self {
        self.empty_section = enabled;
        self
    }

    /// Returns whether every value of a repeated option is written out.
    ///
    /// When disabled only the last value of each option is written.
    pub fn is_multi_option(&self) -> bool {
        self.multi_option
    }

    /// Sets whether every value of a repeated option is written out.
    pub fn set_multi_option(&mut self, enabled: bool) {
        self.multi_option = enabled;
    }

    /// Returns a copy with a different multi-option policy.
    pub fn with_multi_option(mut self, enabled: bool) -> Self {
        self.multi_option = enabled;
        self
    }

    /// Returns whether section names are hierarchical paths.
    pub fn is_tree(&self) -> bool {
        self.tree
    }

    /// Sets whether section names are hierarchical paths.
    pub fn set_tree(&mut self, enabled: bool) {
        self.tree = enabled;
    }

    /// Returns a copy with tree mode switched on or off.
    pub fn with_tree(mut self, enabled: bool) -> Self {
        self.tree = enabled;
        self
    }

    /// Returns the path separator used in tree mode.
    pub fn path_separator(&self) -> char {
        self.path_separator
    }

    /// Sets the path separator used in tree mode.
    pub fn set_path_separator(&mut self, separator: char) {
        self.path_separator = separator;
    }

    /// Returns a copy with a different path separator.
    pub fn with_path_separator(mut self, separator: char) -> Self {
        self.path_separator = separator;
        self
    }

    /// Returns whether option names get an upper-case first letter on load.
    pub fn is_property_first_upper(&self) -> bool {
        self.property_first_upper
    }

    /// Sets whether option names get an upper-case first letter on load.
    pub fn set_property_first_upper(&mut self, enabled: bool) {
        self.property_first_upper = enabled;
    }

    /// Returns a copy with a different option-name normalization.
    pub fn with_property_first_upper(mut self, enabled: bool) -> Self {
        self.property_first_upper = enabled;
        self
    }
}

fn parse_flag(setting: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(IniError::InvalidSetting {
            setting: setting.to_string(),
            value: value.to_string(),
            expected: "a boolean",
        }),
    }
}
