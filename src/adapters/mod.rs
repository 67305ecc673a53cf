// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing the default collaborators.
//!
//! This module contains concrete implementations of the ports: the INI
//! parser, the INI formatter, and resolution of locators and default file
//! locations.

pub mod ini_formatter;
pub mod ini_parser;
pub mod locator;

pub use ini_formatter::IniFormatter;
pub use ini_parser::DefaultIniParser;
pub use locator::{default_location, open_locator};
