//! Theme mode enumeration
//!
//! A theme mode names a palette of token values. The wire strings (`"light"`,
//! `"dark"`, `"contrast"`) are stable: they are what gets persisted in the
//! host key-value store, mirrored onto the root element's `data-theme`
//! attribute, and matched by the generated stylesheet.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Named visual mode selecting the active token palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Standard light palette. Also the fallback when nothing else resolves.
    #[default]
    Light,
    /// Standard dark palette.
    Dark,
    /// High-contrast palette, selected when the OS forces contrast colors.
    Contrast,
}

impl ThemeMode {
    /// Stable wire string for persistence and the `data-theme` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Contrast => "contrast",
        }
    }

    /// Full mode list.
    pub fn all() -> &'static [ThemeMode] {
        const MODES: [ThemeMode; 3] = [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Contrast];
        &MODES
    }

    /// Lenient parse for values read back from the host (persisted store,
    /// pre-set DOM markup). Anything other than the three wire strings is
    /// treated as absent rather than an error.
    pub fn parse(value: &str) -> Option<ThemeMode> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "contrast" => Some(Self::Contrast),
            _ => None,
        }
    }
}

impl Display for ThemeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the three theme modes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized theme mode: {value:?} (expected \"light\", \"dark\", or \"contrast\")")]
pub struct ThemeModeParseError {
    /// The rejected input.
    pub value: String,
}

impl FromStr for ThemeMode {
    type Err = ThemeModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeMode::parse(s).ok_or_else(|| ThemeModeParseError {
            value: s.to_string(),
        })
    }
}
