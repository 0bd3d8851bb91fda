//! Winden Core Vocabulary
//!
//! Foundational types shared by the winden design-token runtime:
//!
//! - [`ThemeMode`]: the three-valued theme enumeration (`light`, `dark`,
//!   `contrast`) with stable wire strings
//! - Token paths: mapping between dotted token paths and the CSS custom
//!   properties the generated stylesheet exposes
//!
//! # Example
//!
//! ```rust
//! use winden_core::{css_variable_name, ThemeMode};
//!
//! let mode: ThemeMode = "dark".parse().unwrap();
//! assert_eq!(mode.as_str(), "dark");
//!
//! assert_eq!(
//!     css_variable_name("color.text.primary"),
//!     "--color-text-primary"
//! );
//! ```

pub mod mode;
pub mod token_path;

pub use mode::{ThemeMode, ThemeModeParseError};
pub use token_path::{css_variable_name, css_variable_reference};
