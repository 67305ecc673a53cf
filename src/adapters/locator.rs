// SPDX-License-Identifier: MIT OR Apache-2.0

//! Locator and file-location resolution.
//!
//! `file:` locators are always available. `http:` and `https:` locators
//! need the `http` feature.

use crate::domain::{IniError, Result};
use directories::ProjectDirs;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use url::Url;

/// Opens the resource behind a locator as a byte reader.
///
/// # Examples
///
/// ```rust,no_run
/// use hexini::adapters::locator::open_locator;
/// use url::Url;
///
/// let url = Url::parse("file:///etc/app/settings.ini").unwrap();
/// let reader = open_locator(&url).unwrap();
/// ```
pub fn open_locator(url: &Url) -> Result<Box<dyn Read>> {
    match url.scheme() {
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|()| IniError::UnsupportedLocator {
                    url: url.to_string(),
                })?;
            let file = File::open(&path)
                .map_err(|e| IniError::transport(format!("opening {}", path.display()), e))?;
            tracing::debug!("Opened locator {} as {}", url, path.display());
            Ok(Box::new(file))
        }
        #[cfg(feature = "http")]
        "http" | "https" => {
            let response = reqwest::blocking::get(url.clone())
                .and_then(|response| response.error_for_status())
                .map_err(|e| {
                    IniError::transport(format!("fetching {url}"), std::io::Error::other(e))
                })?;
            tracing::debug!("Fetched locator {} ({})", url, response.status());
            Ok(Box::new(response))
        }
        _ => Err(IniError::UnsupportedLocator {
            url: url.to_string(),
        }),
    }
}

/// Returns the path of `filename` in the OS-appropriate configuration
/// directory for an application.
///
/// Nothing is created or checked on disk.
///
/// # Arguments
///
/// * `app_name` - The application name (e.g., "myapp")
/// * `qualifier` - The organization/qualifier (e.g., "com.example")
/// * `filename` - The file name (e.g., "settings.ini")
pub fn default_location(app_name: &str, qualifier: &str, filename: &str) -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
        IniError::transport(
            "determining the configuration directory",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no home directory"),
        )
    })?;
    Ok(proj_dirs.config_dir().join(filename))
}
