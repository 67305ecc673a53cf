// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory INI profile.
//!
//! A [`Profile`] is an ordered list of uniquely named [`Section`]s; each
//! section is an ordered list of options, and each option keeps every value
//! it was given. Loading fills a profile through [`ProfileBuilder`]; storing
//! walks it with [`Profile::replay`].

use crate::domain::{Config, IniError, Result};
use crate::ports::IniHandler;
use std::borrow::Cow;

#[derive(Debug, Clone, PartialEq, Eq)]
struct OptionEntry {
    name: String,
    /// Never empty
    values: Vec<Option<String>>,
}

/// A named group of options.
///
/// # Examples
///
/// ```
/// use hexini::domain::Section;
///
/// let mut section = Section::new("server");
/// section.add("listen", Some("127.0.0.1:80"));
/// section.add("listen", Some("[::1]:80"));
///
/// assert_eq!(section.get("listen"), Some("[::1]:80"));
/// assert_eq!(section.length("listen"), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    options: Vec<OptionEntry>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    /// Returns the section name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of distinct options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Returns true if the section has no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Returns true if the option is present.
    pub fn contains(&self, option: &str) -> bool {
        self.entry(option).is_some()
    }

    /// Returns the last value of an option.
    pub fn get(&self, option: &str) -> Option<&str> {
        self.entry(option)
            .and_then(|entry| entry.values.last())
            .and_then(|value| value.as_deref())
    }

    /// Returns every value of an option, in load order.
    pub fn values(&self, option: &str) -> &[Option<String>] {
        self.entry(option)
            .map(|entry| entry.values.as_slice())
            .unwrap_or(&[])
    }

    /// Returns how many values an option has.
    pub fn length(&self, option: &str) -> usize {
        self.values(option).len()
    }

    /// Appends a value to an option, creating the option if needed.
    pub fn add(&mut self, option: &str, value: Option<&str>) {
        let value = value.map(str::to_string);
        match self.options.iter_mut().find(|entry| entry.name == option) {
            Some(entry) => entry.values.push(value),
            None => self.options.push(OptionEntry {
                name: option.to_string(),
                values: vec![value],
            }),
        }
    }

    /// Replaces every value of an option with a single value.
    pub fn put(&mut self, option: &str, value: Option<&str>) {
        let value = value.map(str::to_string);
        match self.options.iter_mut().find(|entry| entry.name == option) {
            Some(entry) => entry.values = vec![value],
            None => self.options.push(OptionEntry {
                name: option.to_string(),
                values: vec![value],
            }),
        }
    }

    /// Removes an option and returns its values.
    pub fn remove(&mut self, option: &str) -> Option<Vec<Option<String>>> {
        let index = self.options.iter().position(|entry| entry.name == option)?;
        Some(self.options.remove(index).values)
    }

    /// Iterates over option names and their values, in load order.
    pub fn options(&self) -> impl Iterator<Item = (&str, &[Option<String>])> {
        self.options
            .iter()
            .map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    fn entry(&self, option: &str) -> Option<&OptionEntry> {
        self.options.iter().find(|entry| entry.name == option)
    }
}

/// An ordered collection of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    sections: Vec<Section>,
}

impl Profile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns true if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Removes every section.
    pub fn clear(&mut self) {
        self.sections.clear();
    }

    /// Returns the named section, creating it at the end if it does not exist.
    pub fn add_section(&mut self, name: &str) -> &mut Section {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    /// Returns the named section.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.name == name)
    }

    /// Returns the named section mutably.
    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|section| section.name == name)
    }

    /// Removes the named section.
    pub fn remove_section(&mut self, name: &str) -> Option<Section> {
        let index = self.position(name)?;
        Some(self.sections.remove(index))
    }

    /// Iterates over sections in load order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    /// Returns the last value of an option.
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(option))
    }

    /// Returns every value of an option, empty if the section or option is missing.
    pub fn get_all(&self, section: &str, option: &str) -> &[Option<String>] {
        self.section(section)
            .map(|s| s.values(option))
            .unwrap_or(&[])
    }

    /// Appends a value to an option, creating the section if needed.
    pub fn add(&mut self, section: &str, option: &str, value: Option<&str>) {
        self.add_section(section).add(option, value);
    }

    /// Replaces an option's values, creating the section if needed.
    pub fn put(&mut self, section: &str, option: &str, value: Option<&str>) {
        self.add_section(section).put(option, value);
    }

    /// Returns the nearest existing ancestor of a hierarchical section name.
    ///
    /// With separator `/`, the parent of `a/b/c` is `a/b` if that section
    /// exists, otherwise `a`.
    pub fn parent(&self, name: &str, separator: char) -> Option<&Section> {
        let mut path = name;
        while let Some(index) = path.rfind(separator) {
            path = &path[..index];
            if let Some(section) = self.section(path) {
                return Some(section);
            }
        }
        None
    }

    /// Returns the sections exactly one level below `name`.
    pub fn children<'a>(
        &'a self,
        name: &'a str,
        separator: char,
    ) -> impl Iterator<Item = &'a Section> + 'a {
        self.sections.iter().filter(move |section| {
            section
                .name
                .strip_prefix(name)
                .and_then(|rest| rest.strip_prefix(separator))
                .is_some_and(|rest| !rest.is_empty() && !rest.contains(separator))
        })
    }

    /// Replays the profile as structural events.
    ///
    /// Sections without options are skipped unless the configuration keeps
    /// empty sections, and repeated options are reduced to their last value
    /// unless it keeps multi-valued options.
    pub fn replay(&self, handler: &mut dyn IniHandler, config: &Config) -> Result<()> {
        handler.start_ini()?;
        for section in &self.sections {
            if section.is_empty() && !config.is_empty_section() {
                continue;
            }
            handler.start_section(&section.name)?;
            for entry in &section.options {
                let last = entry.values.len() - 1;
                for (index, value) in entry.values.iter().enumerate() {
                    if config.is_multi_option() || index == last {
                        handler.handle_option(&entry.name, value.as_deref())?;
                    }
                }
            }
            handler.end_section()?;
        }
        handler.end_ini()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|section| section.name == name)
    }
}

/// Fills a [`Profile`] from structural events.
#[derive(Debug)]
pub struct ProfileBuilder<'a> {
    profile: &'a mut Profile,
    current: Option<String>,
    property_first_upper: bool,
}

impl<'a> ProfileBuilder<'a> {
    /// Creates a builder that appends to `profile`.
    pub fn new(profile: &'a mut Profile, config: &Config) -> Self {
        Self {
            profile,
            current: None,
            property_first_upper: config.is_property_first_upper(),
        }
    }

    fn option_name<'n>(&self, name: &'n str) -> Cow<'n, str> {
        if !self.property_first_upper {
            return Cow::Borrowed(name);
        }
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if !first.is_uppercase() => {
                Cow::Owned(first.to_uppercase().chain(chars).collect())
            }
            _ => Cow::Borrowed(name),
        }
    }
}

impl IniHandler for ProfileBuilder<'_> {
    fn start_section(&mut self, name: &str) -> Result<()> {
        self.profile.add_section(name);
        self.current = Some(name.to_string());
        Ok(())
    }

    fn end_section(&mut self) -> Result<()> {
        self.current = None;
        Ok(())
    }

    fn handle_option(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let option = self.option_name(name).into_owned();
        let section = self.current.as_deref().ok_or_else(|| {
            IniError::malformed(0, format!("option '{option}' is outside of any section"))
        })?;
        self.profile.add(section, &option, value);
        Ok(())
    }
}
