//! Dotted token paths and their CSS custom property names
//!
//! The build-time flattening step turns the nested token tree into CSS custom
//! properties: `color.text.primary` becomes `--color-text-primary`. The
//! runtime uses the same mapping when reading or writing live token values on
//! the root element.

/// Convert a dotted token path into its CSS custom property name.
///
/// # Example
///
/// ```rust
/// use winden_core::css_variable_name;
///
/// assert_eq!(css_variable_name("elevation.raised"), "--elevation-raised");
/// ```
pub fn css_variable_name(path: &str) -> String {
    format!("--{}", path.replace('.', "-"))
}

/// Convert a dotted token path into a `var(--…)` reference, usable directly
/// in a CSS value position.
pub fn css_variable_reference(path: &str) -> String {
    format!("var({})", css_variable_name(path))
}
