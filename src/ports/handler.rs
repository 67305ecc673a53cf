// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural event handler trait definition.
//!
//! This module defines the `IniHandler` trait, the push-style interface that
//! connects a parser to whatever consumes INI structure. A profile builder
//! implements it to fill a profile from parsed input, and a formatter
//! implements it to turn a profile back into text.

use crate::domain::Result;

/// A receiver of INI structural events.
///
/// Events arrive in document order:
///
/// ```text
/// start_ini
///   (handle_comment)*
///   ( start_section (handle_option | handle_comment)* end_section )*
/// end_ini
/// ```
///
/// Returning an error from any event stops the producer, which propagates
/// the error unchanged.
///
/// # Examples
///
/// ```rust
/// use hexini::ports::IniHandler;
/// use hexini::domain::Result;
///
/// #[derive(Default)]
/// struct OptionCounter(usize);
///
/// impl IniHandler for OptionCounter {
///     fn start_section(&mut self, _name: &str) -> Result<()> {
///         Ok(())
///     }
///
///     fn handle_option(&mut self, _name: &str, _value: Option<&str>) -> Result<()> {
///         self.0 += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait IniHandler {
    /// Called once before any other event.
    fn start_ini(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once after every other event.
    fn end_ini(&mut self) -> Result<()> {
        Ok(())
    }

    /// Opens a section. Options that follow belong to it.
    fn start_section(&mut self, name: &str) -> Result<()>;

    /// Closes the section opened by the last `start_section`.
    fn end_section(&mut self) -> Result<()> {
        Ok(())
    }

    /// Reports one option value. A repeated option produces one event per value.
    ///
    /// `value` is `None` for an option written without a separator.
    fn handle_option(&mut self, name: &str, value: Option<&str>) -> Result<()>;

    /// Reports a comment, without its leading marker.
    fn handle_comment(&mut self, _comment: &str) -> Result<()> {
        Ok(())
    }
}

impl<H: IniHandler + ?Sized> IniHandler for &mut H {
    fn start_ini(&mut self) -> Result<()> {
        (**self).start_ini()
    }

    fn end_ini(&mut self) -> Result<()> {
        (**self).end_ini()
    }

    fn start_section(&mut self, name: &str) -> Result<()> {
        (**self).start_section(name)
    }

    fn end_section(&mut self) -> Result<()> {
        (**self).end_section()
    }

    fn handle_option(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        (**self).handle_option(name, value)
    }

    fn handle_comment(&mut self, comment: &str) -> Result<()> {
        (**self).handle_comment(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl IniHandler for Recorder {
        fn start_section(&mut self, name: &str) -> Result<()> {
            self.events.push(format!("start:{name}"));
            Ok(())
        }

        fn handle_option(&mut self, name: &str, value: Option<&str>) -> Result<()> {
            self.events.push(format!("{name}={}", value.unwrap_or("<none>")));
            Ok(())
        }
    }

    fn drive<H: IniHandler>(mut handler: H) -> Result<()> {
        handler.start_ini()?;
        handler.handle_comment("ignored by default")?;
        handler.start_section("server")?;
        handler.handle_option("port", Some("8080"))?;
        handler.handle_option("verbose", None)?;
        handler.end_section()?;
        handler.end_ini()
    }

    #[test]
    fn test_default_events_are_no_ops() {
        let mut recorder = Recorder::default();
        drive(&mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec!["start:server", "port=8080", "verbose=<none>"]
        );
    }

    #[test]
    fn test_handler_through_trait_object() {
        let mut recorder = Recorder::default();
        {
            let dynamic: &mut dyn IniHandler = &mut recorder;
            drive(dynamic).unwrap();
        }
        assert_eq!(recorder.events.len(), 3);
    }
}
