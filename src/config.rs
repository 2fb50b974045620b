//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! We look for a calloutline.toml in the working directory and load settings from there if
//! present. This provides the preview wrapping width and the document extensions to scan.

use facet::Facet;
use std::fs;

/// File the configuration is read from.
pub const CONFIG_FILE: &str = "calloutline.toml";

#[derive(Facet, Clone, Debug, PartialEq, Eq)]
/// User preferences loaded from calloutline.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 100)]
    /// Maximum line width for wrapping in the block preview.
    pub wrap_width: usize,
    #[facet(default = vec!["md".to_string()])]
    /// File suffixes treated as documents with callouts.
    pub file_extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wrap_width: 100,
            file_extensions: vec!["md".to_string()],
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from calloutline.toml if present.
    pub fn load() -> Self {
        match fs::read_to_string(CONFIG_FILE) {
            Ok(contents) => Self::parse(&contents),
            Err(_) => Self::default(),
        }
    }

    #[must_use]
    /// Parse configuration text, keeping defaults for missing fields.
    ///
    /// Malformed text is reported and the defaults are used instead.
    pub fn parse(contents: &str) -> Self {
        facet_toml::from_str::<Self>(contents).unwrap_or_else(|e| {
            tracing::warn!(error = %e, file = CONFIG_FILE, "ignoring malformed configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
